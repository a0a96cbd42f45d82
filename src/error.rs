//! Error and result types shared across the crate.
//!
//! Most plumbing returns the boxed [`DynError`]; the remote fetch has its own
//! typed [`FetchError`] because its message is shown to the user.
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Attach a human-readable context line to an error.
pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[derive(Debug)]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl Display for SimpleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SimpleError {}

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(SimpleError::new(msg))
}

/// Why loading the user list failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("fetch worker exited without a result")]
    Disconnected,
}

impl FetchError {
    /// Single line shown above the table when the fetch fails.
    pub fn user_message(&self) -> String {
        format!("Failed to fetch users: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn context_wraps_source() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.with_ctx(|| "reading settings.conf".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "reading settings.conf: gone");
        assert!(err.source().is_some());
    }

    #[test]
    fn fetch_messages_are_readable() {
        assert_eq!(
            FetchError::Status(503).user_message(),
            "Failed to fetch users: server responded with status 503"
        );
        assert!(FetchError::Disconnected.user_message().starts_with("Failed to fetch users"));
    }
}
