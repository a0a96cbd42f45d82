//! Remote user directory: one read-only HTTP GET, run off the UI thread.
//!
//! The UI loop never blocks on the network. [`spawn_fetch`] runs the request
//! on a worker thread and hands back a [`PendingFetch`] that the loop polls
//! once per tick until the single result arrives.
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use crate::error::FetchError;
use crate::model::User;

pub const DEFAULT_ENDPOINT: &str = "https://random-data-api.com/api/v2/users";
pub const DEFAULT_FETCH_SIZE: usize = 30;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Anything that can produce the user list.
pub trait UserSource: Send + 'static {
    fn fetch_users(&self, size: usize) -> Result<Vec<User>, FetchError>;
}

/// Fetches users from `GET {endpoint}?size={n}`.
#[derive(Debug, Clone)]
pub struct HttpUserSource {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpUserSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Use a preconfigured client, e.g. one with proxies disabled.
    pub fn with_client(client: reqwest::blocking::Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl UserSource for HttpUserSource {
    fn fetch_users(&self, size: usize) -> Result<Vec<User>, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, size, "requesting users");
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("size", size)])
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        let users: Vec<User> = serde_json::from_str(&body)?;
        Ok(users)
    }
}

/// A fetch that is running (or finished) on a worker thread.
#[derive(Debug)]
pub struct PendingFetch {
    rx: Receiver<Result<Vec<User>, FetchError>>,
    done: bool,
}

impl PendingFetch {
    /// A fetch whose outcome is already known, e.g. the client could not be built.
    pub fn ready(result: Result<Vec<User>, FetchError>) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(result);
        Self { rx, done: false }
    }

    /// Take the result if it has arrived. Yields `Some` exactly once.
    pub fn try_take(&mut self) -> Option<Result<Vec<User>, FetchError>> {
        if self.done {
            return None;
        }
        let out = match self.rx.try_recv() {
            Ok(res) => res,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(FetchError::Disconnected),
        };
        self.done = true;
        Some(out)
    }

    /// Block until the result arrives or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Option<Result<Vec<User>, FetchError>> {
        if self.done {
            return None;
        }
        let out = match self.rx.recv_timeout(timeout) {
            Ok(res) => res,
            Err(mpsc::RecvTimeoutError::Timeout) => return None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(FetchError::Disconnected),
        };
        self.done = true;
        Some(out)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Start fetching `size` users from `source` in the background.
pub fn spawn_fetch<S: UserSource>(source: S, size: usize) -> PendingFetch {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let res = source.fetch_users(size);
        match &res {
            Ok(users) => tracing::info!(count = users.len(), "users fetched"),
            Err(e) => tracing::warn!(error = %e, "user fetch failed"),
        }
        // The receiver is gone only if the app already quit.
        let _ = tx.send(res);
    });
    PendingFetch { rx, done: false }
}
