use clap::Parser;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "models/gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "qa-cache")]
#[command(about = "Question answering form with a persistent answer cache in front of Gemini")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    // Postgres connection string, in-memory store when absent
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    // Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    // Store connection timeout in seconds
    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value_t = 5)]
    pub store_timeout: u64,

    // Generator request timeout in seconds
    #[arg(long, env = "GENERATOR_TIMEOUT_SECS", default_value_t = 60)]
    pub generator_timeout: u64,
}

impl Args {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout)
    }

    pub fn generator_timeout(&self) -> Duration {
        Duration::from_secs(self.generator_timeout)
    }

    /// API key with blank values treated as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let args = Args::try_parse_from(["qa-cache"]).unwrap();
        assert_eq!(args.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(args.store_timeout(), Duration::from_secs(5));
        assert_eq!(args.generator_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let args = Args::try_parse_from(["qa-cache", "--gemini-api-key", "   "]).unwrap();
        assert_eq!(args.api_key(), None);

        let args = Args::try_parse_from(["qa-cache", "--gemini-api-key", "abc"]).unwrap();
        assert_eq!(args.api_key(), Some("abc"));
    }
}
