//! Transfer Gateway
//!
//! Seam between the workflow and the backend. The coordinator only ever
//! submits through this trait, so tests drive the full flow without HTTP.

use async_trait::async_trait;

use crate::api::{ApiClient, ApiResult};

use super::pin::Pin;
use super::types::TransferRequest;

#[async_trait]
pub trait TransferGateway: Send + Sync {
    /// Gateway name for logging
    fn name(&self) -> &'static str;

    /// Submit one transfer. `Ok` carries the backend's message, if any.
    ///
    /// Called at most once per confirm press. Implementations must not retry.
    async fn submit_transfer(&self, request: &TransferRequest, pin: &Pin)
    -> ApiResult<Option<String>>;
}

#[async_trait]
impl TransferGateway for ApiClient {
    fn name(&self) -> &'static str {
        "tesapay-api"
    }

    async fn submit_transfer(
        &self,
        request: &TransferRequest,
        pin: &Pin,
    ) -> ApiResult<Option<String>> {
        self.create_transfer(request, pin).await
    }
}

/// Mock gateway for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::api::ApiError;

    #[derive(Default)]
    pub struct MockGateway {
        submit_count: AtomicUsize,
        /// Requests seen, in order
        submitted: Mutex<Vec<TransferRequest>>,
        /// Next outcome; `None` means success
        fail_with: Mutex<Option<ApiError>>,
        /// Never answer, as a stalled connection would
        hang: AtomicBool,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self::default()
        }

        /// Simulate a transport failure on every submission
        pub fn set_fail_network(&self, fail: bool) {
            *self.fail_with.lock().unwrap() =
                fail.then(|| ApiError::Network("connection reset by peer".to_string()));
        }

        /// Simulate `success: false` with the given message
        pub fn set_reject(&self, message: Option<&str>) {
            *self.fail_with.lock().unwrap() = message.map(|m| ApiError::Backend(m.to_string()));
        }

        pub fn set_hang(&self, hang: bool) {
            self.hang.store(hang, Ordering::SeqCst);
        }

        pub fn submit_count(&self) -> usize {
            self.submit_count.load(Ordering::SeqCst)
        }

        pub fn last_submitted(&self) -> Option<TransferRequest> {
            self.submitted.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl TransferGateway for MockGateway {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn submit_transfer(
            &self,
            request: &TransferRequest,
            _pin: &Pin,
        ) -> ApiResult<Option<String>> {
            self.submit_count.fetch_add(1, Ordering::SeqCst);
            self.submitted.lock().unwrap().push(request.clone());

            if self.hang.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }

            match self.fail_with.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(Some("Transfer successful".to_string())),
            }
        }
    }
}
