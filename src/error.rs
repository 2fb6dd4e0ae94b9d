//! Error types for each layer of the scrape pipeline.

use thiserror::Error;

/// Failures of the headless-browser collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("browser protocol error: {0}")]
    Protocol(String),
}

/// Failures while pulling headlines out of a parsed page.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid page url `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors surfaced by the scrape orchestrator.
///
/// Only [`ScrapeError::Launch`] escapes a run; the others are caught per site
/// and recorded in the summary.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser launch failed: {0}")]
    Launch(#[source] RenderError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_input() {
        let err = ExtractError::InvalidSelector {
            selector: "div[".to_string(),
            reason: "unexpected end of input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid selector `div[`: unexpected end of input"
        );

        let err = RenderError::Timeout {
            url: "https://gsp.ro".to_string(),
            secs: 30,
        };
        assert_eq!(err.to_string(), "navigation to https://gsp.ro timed out after 30s");
    }

    #[test]
    fn test_per_site_errors_are_transparent() {
        let err: ScrapeError = StoreError::Database(sqlx::Error::PoolClosed).into();
        assert!(err.to_string().starts_with("database error:"));

        let err = ScrapeError::Launch(RenderError::Launch("no chrome".to_string()));
        assert_eq!(
            err.to_string(),
            "browser launch failed: failed to launch browser: no chrome"
        );
    }
}
