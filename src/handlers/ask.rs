use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use crate::answer::lookup_or_generate;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{AskForm, AskResponse};
use crate::page::{SCRIPT_JS, render_page};
use crate::state::AppState;

// Browser navigation asks for text/html; fetch() defaults to */* and gets JSON.
// No Accept header at all gets the page.
fn wants_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    accept.contains("application/json") || !accept.contains("text/html")
}

pub async fn index_handler() -> Html<String> {
    Html(render_page(None, None))
}

pub async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<AskForm>, FormRejection>,
) -> Response {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    // an unreadable body is the same as no question
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!(error = %e, "no form body, treating question as missing");
            AskForm::default()
        }
    };

    let question = form.question.as_deref();
    let answer = lookup_or_generate(state.store.as_ref(), state.generator.as_ref(), question).await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    if wants_json(&headers) {
        return Json(AskResponse {
            answer: answer.into_text(),
        })
        .into_response();
    }
    Html(render_page(question, Some(answer.text()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn negotiation_follows_accept() {
        assert!(!wants_json(&HeaderMap::new()));
        assert!(wants_json(&accept("*/*")));
        assert!(wants_json(&accept("application/json")));
        assert!(!wants_json(&accept(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
        )));
    }
}
