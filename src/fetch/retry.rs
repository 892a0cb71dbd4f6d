use std::time::Duration;

use tracing::{debug, error, warn};

use crate::core::context::RunContext;
use crate::fetch::transport::{Transport, TransportError};

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default pause between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Fixed-delay retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, not extra attempts after the first
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Attempts actually made; a configured zero still makes one request
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// A request the fetcher can repeat
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Get { url: String },
    PostJson { url: String, body: serde_json::Value },
}

impl Endpoint {
    pub fn get(url: impl Into<String>) -> Self {
        Self::Get { url: url.into() }
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self::PostJson {
            url: url.into(),
            body,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Get { url } | Self::PostJson { url, .. } => url,
        }
    }
}

/// Runs requests through a [`Transport`] with bounded, fixed-delay retry.
///
/// Failures are logged and absorbed: callers get `None` once every attempt
/// has failed.
#[derive(Debug, Clone)]
pub struct RetryingFetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingFetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch the response body of `endpoint`.
    ///
    /// `subject` names what is being fetched in log messages, e.g.
    /// `PDB:2BG9`. Non-2xx statuses and transport errors are retried; the
    /// delay is only applied between attempts.
    pub fn fetch_text(&self, ctx: &RunContext, endpoint: &Endpoint, subject: &str) -> Option<String> {
        self.fetch_with(ctx, endpoint, subject, Ok)
    }

    /// Fetch and decode a JSON response. A body that does not decode counts as
    /// a failed attempt.
    pub fn fetch_json(
        &self,
        ctx: &RunContext,
        endpoint: &Endpoint,
        subject: &str,
    ) -> Option<serde_json::Value> {
        self.fetch_with(ctx, endpoint, subject, |body| {
            serde_json::from_str(&body)
                .map_err(|e| TransportError::Request(format!("Invalid JSON response: {e}")))
        })
    }

    fn fetch_with<R>(
        &self,
        ctx: &RunContext,
        endpoint: &Endpoint,
        subject: &str,
        decode: impl Fn(String) -> Result<R, TransportError>,
    ) -> Option<R> {
        let _guard = ctx.enter();
        let attempts = self.policy.attempts();

        for attempt in 1..=attempts {
            debug!("Fetching {subject} from {} (attempt {attempt})", endpoint.url());
            let result = match endpoint {
                Endpoint::Get { url } => self.transport.get(url),
                Endpoint::PostJson { url, body } => self.transport.post_json(url, body),
            }
            .and_then(&decode);

            match result {
                Ok(value) => return Some(value),
                Err(e) => {
                    warn!("Attempt {attempt}/{attempts} failed for {subject}: {e}");
                    if attempt < attempts && !self.policy.retry_delay.is_zero() {
                        std::thread::sleep(self.policy.retry_delay);
                    }
                }
            }
        }

        error!("Failed to fetch {subject} after {attempts} attempts");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::ScriptedTransport;
    use std::time::Instant;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            retry_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_always_failing_makes_exactly_max_attempts() {
        let transport = ScriptedTransport::failing();
        let fetcher = RetryingFetcher::new(&transport, policy(3));
        let result = fetcher.fetch_text(&RunContext::detached(), &Endpoint::get("http://x"), "PDB:2BG9");
        assert!(result.is_none());
        assert_eq!(transport.calls(), 3);
    }

    #[test]
    fn test_success_on_second_attempt() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Status(503)),
            Ok(">1ABC_1\nMKV\n".to_string()),
        ]);
        let fetcher = RetryingFetcher::new(&transport, policy(3));
        let result = fetcher.fetch_text(&RunContext::detached(), &Endpoint::get("http://x"), "PDB:1ABC");
        assert_eq!(result.as_deref(), Some(">1ABC_1\nMKV\n"));
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_zero_retries_still_tries_once() {
        let transport = ScriptedTransport::failing();
        let fetcher = RetryingFetcher::new(&transport, policy(0));
        assert!(fetcher
            .fetch_text(&RunContext::detached(), &Endpoint::get("http://x"), "x")
            .is_none());
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_invalid_json_counts_as_failed_attempt() {
        let transport = ScriptedTransport::new(vec![
            Ok("<html>busy</html>".to_string()),
            Ok(r#"{"result_set": []}"#.to_string()),
        ]);
        let fetcher = RetryingFetcher::new(&transport, policy(3));
        let value = fetcher
            .fetch_json(
                &RunContext::detached(),
                &Endpoint::post_json("http://search", serde_json::json!({"q": 1})),
                "search",
            )
            .unwrap();
        assert!(value["result_set"].as_array().unwrap().is_empty());
        assert_eq!(transport.calls(), 2);
        assert_eq!(transport.posted_bodies(), 2);
    }

    #[test]
    fn test_no_sleep_after_last_attempt() {
        let transport = ScriptedTransport::failing();
        let fetcher = RetryingFetcher::new(
            &transport,
            RetryPolicy {
                max_retries: 2,
                retry_delay: Duration::from_millis(50),
            },
        );
        let start = Instant::now();
        let _ = fetcher.fetch_text(&RunContext::detached(), &Endpoint::get("http://x"), "x");
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(1000));
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(Endpoint::get("http://a").url(), "http://a");
        assert_eq!(
            Endpoint::post_json("http://b", serde_json::Value::Null).url(),
            "http://b"
        );
    }
}
