//! HTML form page with the question and its answer.

/// Embedded page template
pub const INDEX_HTML: &str = include_str!("index.html");

/// Chat script loaded by the page, posts with `Accept: application/json`
pub const SCRIPT_JS: &str = include_str!("script.js");

// Minimal escaping for text placed in element bodies and attribute values
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(question: Option<&str>, answer: Option<&str>) -> String {
    let question_block = question
        .filter(|q| !q.trim().is_empty())
        .map(|q| format!(r#"<div class="question"><strong>Q:</strong> {}</div>"#, escape_html(q)))
        .unwrap_or_default();
    let answer_block = answer
        .map(|a| {
            format!(
                r#"{question_block}<div class="answer-text">{}</div>"#,
                escape_html(a)
            )
        })
        .unwrap_or_default();

    INDEX_HTML.replace("{{answer_block}}", &answer_block)
}
