//! Error types.
//!
//! Construction is the only fallible operation in this crate. A lookup that
//! finds nothing is an ordinary `None`, never an error.

use thiserror::Error;

/// Returned when a cache is built from an invalid configuration.
///
/// No cache is produced when this error is returned.
///
/// # Example
///
/// ```
/// use agecache::config::LruCacheConfig;
/// use agecache::error::ConfigurationError;
/// use agecache::LruCache;
///
/// let err = LruCache::<u64, u64>::init(LruCacheConfig { capacity: 0 }, None).unwrap_err();
/// assert_eq!(err, ConfigurationError::ZeroCapacity);
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The requested capacity was 0.
    #[error("capacity must be at least 1")]
    ZeroCapacity,
    /// The requested LFU aging threshold was 0.
    #[error("aging threshold must be at least 1 (use u64::MAX to disable aging)")]
    ZeroAgingThreshold,
}

/// Result alias for cache construction.
pub type Result<T> = core::result::Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ConfigurationError::ZeroCapacity.to_string(),
            "capacity must be at least 1"
        );
        assert!(ConfigurationError::ZeroAgingThreshold
            .to_string()
            .contains("aging threshold"));
    }

    #[test]
    fn test_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConfigurationError>();
    }
}
