//! Remote sequence retrieval.
//!
//! - [`transport`]: the [`Transport`] trait and its reqwest implementation
//! - [`retry`]: [`RetryingFetcher`], bounded fixed-delay retry over a transport
//! - [`sources`]: URLs of RCSB and UniProt endpoints
//! - [`search`]: RCSB search queries and Data API entity documents
//!
//! Fetch failures never surface as errors: after the last attempt the fetcher
//! logs and returns `None`, and the calling workflow reports the identifier
//! as failed.

pub mod retry;
pub mod search;
pub mod sources;
pub mod transport;

pub use retry::{Endpoint, RetryPolicy, RetryingFetcher};
pub use sources::SourceUrls;
pub use transport::{HttpTransport, Transport, TransportError};

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use super::transport::{Transport, TransportError};

    /// Replays canned responses in order, then fails with 503
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<String, TransportError>>>,
        urls: RefCell<Vec<String>>,
        calls: Cell<usize>,
        posts: Cell<usize>,
    }

    impl ScriptedTransport {
        pub fn new(responses: Vec<Result<String, TransportError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> usize {
            self.calls.get()
        }

        pub fn posted_bodies(&self) -> usize {
            self.posts.get()
        }

        pub fn urls(&self) -> Vec<String> {
            self.urls.borrow().clone()
        }

        fn next(&self, url: &str) -> Result<String, TransportError> {
            self.calls.set(self.calls.get() + 1);
            self.urls.borrow_mut().push(url.to_string());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(TransportError::Status(503)))
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str) -> Result<String, TransportError> {
            self.next(url)
        }

        fn post_json(&self, url: &str, _body: &serde_json::Value) -> Result<String, TransportError> {
            self.posts.set(self.posts.get() + 1);
            self.next(url)
        }
    }
}
