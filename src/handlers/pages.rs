use axum::{http::StatusCode, response::Html};

static INDEX_HTML: &str = include_str!("../../templates/index.html");

/// GET / — the static upload form.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Any unmatched route.
pub async fn fallback_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}
