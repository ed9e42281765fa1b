use crate::config::Config;
use crate::error::{map_status_to_error, ResolveError, ResolveResult};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub fn build_client(cfg: &Config) -> ResolveResult<Client> {
    let mut default_headers = HeaderMap::new();
    let ua = HeaderValue::from_str(&cfg.user_agent)
        .map_err(|e| ResolveError::Unexpected(format!("invalid user agent: {}", e)))?;
    default_headers.insert(USER_AGENT, ua);
    Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls()
        .build()
        .map_err(|e| ResolveError::Unexpected(format!("failed to build HTTP client: {}", e)))
}

fn auth_header(token: &str) -> ResolveResult<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        ResolveError::Unexpected("token contains characters not allowed in a header".into())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>, // standard GraphQL errors
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// GraphQL error messages joined with "; ", if the server sent any.
    pub fn error_summary(&self) -> Option<String> {
        let errors = self.errors.as_ref().filter(|e| !e.is_empty())?;
        Some(
            errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Single-shot GraphQL POST. Non-2xx is a transport failure; a body that is
/// not JSON is unexpected. GraphQL `errors` are returned to the caller, which
/// decides whether the data it needs is still present.
pub async fn graphql_post<TVars: Serialize>(
    client: &Client,
    cfg: &Config,
    query: &str,
    variables: &TVars,
) -> ResolveResult<GraphQlResponse<Value>> {
    let body = serde_json::json!({ "query": query, "variables": variables });
    debug!("POST {} variables={}", cfg.graphql_url, body["variables"]);
    let res = client
        .post(&cfg.graphql_url)
        .header(AUTHORIZATION, auth_header(&cfg.token)?)
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .json(&body)
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        return Err(map_status_to_error(status, text));
    }

    let parsed: GraphQlResponse<Value> = serde_json::from_str(&text)
        .map_err(|e| ResolveError::Unexpected(format!("invalid JSON in response: {}", e)))?;
    if let Some(msg) = parsed.error_summary() {
        debug!("GraphQL errors: {}", msg);
    }
    Ok(parsed)
}
