//! Recording CDN control plane for tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::cdn::{CdnControl, InvalidationRequest};
use crate::error::{Error, Result};

/// CDN control plane that records requests instead of sending them.
///
/// Can be switched into a failing mode to exercise the invalidation-error
/// paths of the adapter.
#[derive(Debug, Default)]
pub struct MemoryCdn {
    requests: Mutex<Vec<InvalidationRequest>>,
    failure: Mutex<Option<String>>,
}

impl MemoryCdn {
    /// Creates a recorder that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent request fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *lock(&self.failure) = Some(message.into());
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<InvalidationRequest> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl CdnControl for MemoryCdn {
    async fn create_invalidation(&self, request: &InvalidationRequest) -> Result<()> {
        if let Some(message) = lock(&self.failure).clone() {
            return Err(Error::transport_message(message));
        }
        lock(&self.requests).push(request.clone());
        Ok(())
    }
}
