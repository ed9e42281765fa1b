use url::Url;

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the GraphQL client.
/// Everything comes from CLI flags; the token has no environment fallback.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub graphql_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Configuration against the public GitHub endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            user_agent: format!("gh-project-fields/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Point the client at a different GraphQL endpoint (GHES host, mock server).
    pub fn with_graphql_url(mut self, url: &Url) -> Self {
        self.graphql_url = url.as_str().to_string();
        self
    }
}
