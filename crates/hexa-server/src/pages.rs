//! Server-rendered HTML pages.

use crate::{error::GatewayError, AppState};
use axum::{extract::Extension, response::Html};
use hexa_types::ChatRecord;
use minijinja::{context, Environment, HtmlEscape, Value};
use std::sync::Arc;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const HISTORY_TEMPLATE: &str = include_str!("../templates/history.html");

/// Compiled page templates.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    /// Builds the template environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled template fails to parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_filter("strong_only", strong_only);
        env.add_template("index.html", INDEX_TEMPLATE)?;
        env.add_template("history.html", HISTORY_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render_index(&self) -> Result<String, minijinja::Error> {
        self.env
            .get_template("index.html")?
            .render(context! { version => env!("CARGO_PKG_VERSION") })
    }

    /// Renders the stored history. `available = false` shows an empty list
    /// with a notice instead of an error page.
    pub fn render_history(
        &self,
        records: &[ChatRecord],
        available: bool,
    ) -> Result<String, minijinja::Error> {
        self.env
            .get_template("history.html")?
            .render(context! { records => records, available => available })
    }
}

/// Escapes all markup except the `<strong>` tags produced by answer
/// normalization.
fn strong_only(value: String) -> Value {
    let escaped = HtmlEscape(&value)
        .to_string()
        .replace("&lt;strong&gt;", "<strong>")
        .replace("&lt;&#x2f;strong&gt;", "</strong>");
    Value::from_safe_string(escaped)
}

/// Handler for `GET /`.
pub async fn index_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, GatewayError> {
    Ok(Html(state.pages.render_index()?))
}

/// Handler for `GET /history-page`.
pub async fn history_page_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, GatewayError> {
    let history = state
        .gateway
        .persisted_history(state.history_page_limit)
        .await;
    let available = history.is_available();
    Ok(Html(state.pages.render_history(&history.history, available)?))
}
