//! Static HTML pages, embedded at compile time.

use axum::response::Html;

const INDEX: &str = include_str!("../../static/index.html");
const LOGIN: &str = include_str!("../../static/login.html");
const SUPPORT: &str = include_str!("../../static/support.html");

/// GET / and /index.html
pub async fn index() -> Html<&'static str> {
    Html(INDEX)
}

/// GET /login and /login.html
pub async fn login() -> Html<&'static str> {
    Html(LOGIN)
}

/// GET /support and /support.html
pub async fn support() -> Html<&'static str> {
    Html(SUPPORT)
}
