//! Volume error types.

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for volume operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur during volume operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Missing or invalid volume settings.
    ///
    /// Raised during validation, before any remote call is attempted.
    #[error("invalid volume configuration: {0}")]
    Config(String),

    /// The requested object key does not exist.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Network, authentication, or service failure from the object store.
    ///
    /// Not retried internally; a single attempt is made per remote call.
    #[error("transport error: {message}")]
    Transport {
        /// Upstream error message.
        message: String,
        /// Underlying SDK or I/O error, when available.
        #[source]
        source: Option<BoxedError>,
    },

    /// CDN purge failed after the mutation itself succeeded.
    ///
    /// The written or deleted data is already durable; this error means
    /// cached copies of the named path may be stale, not that data was lost.
    #[error("failed to invalidate CDN path {path}")]
    Invalidation {
        /// Volume-relative path whose cached copies could not be purged.
        path: String,
        /// Underlying CDN control-plane error, when available.
        #[source]
        source: Option<BoxedError>,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new not-found error for the given key or path.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Creates a transport error from an underlying error.
    pub fn transport(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a transport error from a bare message.
    pub fn transport_message(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            source: None,
        }
    }

    /// Creates an invalidation error naming the affected path.
    pub fn invalidation(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Invalidation {
            path: path.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns whether this error indicates a configuration issue.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Returns whether this error indicates a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Returns whether this error indicates a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Returns whether this error indicates a failed CDN purge.
    ///
    /// The triggering mutation already succeeded when this returns true.
    pub fn is_invalidation(&self) -> bool {
        matches!(self, Error::Invalidation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_variants() {
        assert!(Error::config("missing bucket").is_config());
        assert!(Error::not_found("a/b.png").is_not_found());
        assert!(Error::transport_message("timed out").is_transport());

        let err = Error::invalidation("a/b.png", std::io::Error::other("denied"));
        assert!(err.is_invalidation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn invalidation_names_the_path() {
        let err = Error::invalidation("photos/img.png", std::io::Error::other("denied"));
        assert!(err.to_string().contains("photos/img.png"));
    }
}
