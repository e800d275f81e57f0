//! Payload resolution.
//!
//! # Responsibilities
//! - Map a configured payload reference to raw compressed bytes
//! - Try the bundled registry first, then the filesystem
//! - Collapse every failure into one indistinguishable error
//!
//! # Design Decisions
//! - Filesystem reads go through `tokio::fs` so the blocking work runs on
//!   the blocking pool instead of stalling the request dispatch path
//! - Bytes are opaque: no check that a file actually contains gzip data
//! - No caching; registry bytes are already `'static` and file-backed
//!   references stay observably idempotent by re-reading per hit

use bytes::Bytes;
use thiserror::Error;

use crate::bombs::registry;

/// Opaque resolution failure.
///
/// Deliberately carries no detail: a client receiving the resulting error
/// response must not learn whether the reference missed the registry, the
/// file was absent, or the file was unreadable.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("payload could not be resolved")]
pub struct ResolveError;

/// Resolve a payload reference to its raw compressed bytes.
///
/// A reference naming a registry entry is served from the embedded blob;
/// anything else is treated as a filesystem path and read verbatim.
pub async fn resolve(reference: &str) -> Result<Bytes, ResolveError> {
    if let Some(blob) = registry::read(reference) {
        return Ok(Bytes::from_static(blob));
    }
    tokio::fs::read(reference)
        .await
        .map(Bytes::from)
        .map_err(|_| ResolveError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registry_roundtrip() {
        let bytes = resolve("1M").await.unwrap();
        assert_eq!(&bytes[..], registry::read("1M").unwrap());
    }

    #[tokio::test]
    async fn test_filesystem_fallback() {
        let path = std::env::temp_dir().join("crawler-trap-resolver-test.gz");
        std::fs::write(&path, b"not actually gzip").unwrap();

        let bytes = resolve(path.to_str().unwrap()).await.unwrap();
        assert_eq!(&bytes[..], b"not actually gzip");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_failures_are_indistinguishable() {
        // Registry miss falling through to a nonexistent relative path...
        let registry_miss = resolve("no-such-bomb").await.unwrap_err();
        // ...and a nonexistent absolute path produce the very same error.
        let missing_file = resolve("/definitely/not/here.gz").await.unwrap_err();

        assert_eq!(registry_miss, missing_file);
        assert_eq!(registry_miss.to_string(), missing_file.to_string());
    }
}
