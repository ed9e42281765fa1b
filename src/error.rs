use reqwest::StatusCode;
use thiserror::Error;

/// The three failure categories reported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    DataShape,
    Unexpected,
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{code}: {message}")]
    Transport { code: String, message: String },

    #[error("missing `{path}` in response{}", graphql_suffix(.graphql_errors))]
    DataShape {
        path: String,
        graphql_errors: Option<String>,
    },

    #[error("{0}")]
    Unexpected(String),
}

fn graphql_suffix(errors: &Option<String>) -> String {
    match errors {
        Some(msg) => format!(" (GraphQL errors: {})", msg),
        None => String::new(),
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::Transport { .. } => ErrorKind::Transport,
            ResolveError::DataShape { .. } => ErrorKind::DataShape,
            ResolveError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub fn data_shape(path: impl Into<String>, graphql_errors: Option<String>) -> Self {
        ResolveError::DataShape {
            path: path.into(),
            graphql_errors,
        }
    }

    /// One-line message printed by the CLI.
    pub fn diagnostic(&self) -> String {
        let prefix = match self.kind() {
            ErrorKind::Transport => "HTTP request failed",
            ErrorKind::DataShape => "Data processing error",
            ErrorKind::Unexpected => "Unexpected error",
        };
        // Response bodies may span lines; keep the diagnostic on one.
        let detail = self.to_string().split_whitespace().collect::<Vec<_>>().join(" ");
        format!("{}: {}", prefix, detail)
    }
}

pub fn map_status_to_error(status: StatusCode, message: String) -> ResolveError {
    let code = match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::TOO_MANY_REQUESTS => "rate_limited",
        s if s.is_server_error() => "upstream_error",
        _ => "unexpected_status",
    };
    ResolveError::Transport {
        code: code.to_string(),
        message: format!("status {}: {}", status.as_u16(), message),
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(e: reqwest::Error) -> Self {
        ResolveError::Transport {
            code: "upstream_error".into(),
            message: e.to_string(),
        }
    }
}
