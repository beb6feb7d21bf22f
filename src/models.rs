use serde::{Deserialize, Serialize};

// One cached question/answer pair, question is the normalized key
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
}

impl QaRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

// Form body posted by the page
#[derive(Debug, Deserialize, Default)]
pub struct AskForm {
    #[serde(default)]
    pub question: Option<String>,
}

// JSON answer for fetch-based clients
#[derive(Debug, Deserialize, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

// Generator model as exposed by /list-models
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct ApiTestResponse {
    pub status: &'static str,
    pub response: String,
    pub message: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct StoreTestResponse {
    pub status: &'static str,
    pub message: String,
    pub documents: u64,
    pub sample: Vec<QaRecord>,
}

#[derive(Debug, Serialize)]
pub struct ViewDbResponse {
    pub total: u64,
    pub data: Vec<QaRecord>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    pub status: &'static str,
    pub available_models: Vec<ModelInfo>,
}
