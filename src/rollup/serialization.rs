//! Pluggable batch encoding for transports to the settlement layer.
//!
//! This module provides the [`BatchSerializer`] trait and two built-in
//! implementations:
//!
//! - [`JsonBatchSerializer`]: human-readable JSON (always available)
//! - `BincodeBatchSerializer`: compact binary format (requires the
//!   `bincode` feature)
//!
//! Transports such as [`ChannelBatchReceiver`](crate::rollup::ChannelBatchReceiver)
//! accept any `Arc<dyn BatchSerializer>` so the wire format can be chosen at
//! construction time.
//!
//! # Feature Gate
//!
//! The `BincodeBatchSerializer` requires the `bincode` feature:
//!
//! ```toml
//! [dependencies]
//! rollup-sequencer = { version = "0.1", features = ["bincode"] }
//! ```

use super::batch::Batch;
use super::error::SerializationError;

/// A pluggable serializer for [`Batch`] payloads.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so they can be shared across
/// threads via `Arc<dyn BatchSerializer>`.
pub trait BatchSerializer: Send + Sync + std::fmt::Debug {
    /// Serialize a batch into a byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the batch cannot be serialized.
    fn serialize_batch(&self, batch: &Batch) -> Result<Vec<u8>, SerializationError>;

    /// Deserialize a batch from a byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the bytes are malformed or
    /// incompatible with the expected format.
    fn deserialize_batch(&self, data: &[u8]) -> Result<Batch, SerializationError>;

    /// Returns the MIME-like content type identifier for this format.
    #[must_use]
    fn content_type(&self) -> &'static str;
}

// ─── JSON ───────────────────────────────────────────────────────────────────

/// JSON batch serializer using `serde_json`.
///
/// # Content Type
///
/// `"application/json"`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBatchSerializer;

impl JsonBatchSerializer {
    /// Create a new JSON batch serializer.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl BatchSerializer for JsonBatchSerializer {
    fn serialize_batch(&self, batch: &Batch) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(batch).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }

    fn deserialize_batch(&self, data: &[u8]) -> Result<Batch, SerializationError> {
        serde_json::from_slice(data).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }

    #[inline]
    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

// ─── Bincode ────────────────────────────────────────────────────────────────

/// Bincode batch serializer for compact binary payloads.
///
/// # Content Type
///
/// `"application/x-bincode"`
#[cfg(feature = "bincode")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeBatchSerializer;

#[cfg(feature = "bincode")]
impl BincodeBatchSerializer {
    /// Create a new Bincode batch serializer.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "bincode")]
impl BatchSerializer for BincodeBatchSerializer {
    fn serialize_batch(&self, batch: &Batch) -> Result<Vec<u8>, SerializationError> {
        bincode::serde::encode_to_vec(batch, bincode::config::standard()).map_err(|e| {
            SerializationError {
                message: e.to_string(),
            }
        })
    }

    fn deserialize_batch(&self, data: &[u8]) -> Result<Batch, SerializationError> {
        bincode::serde::decode_from_slice(data, bincode::config::standard())
            .map(|(batch, _)| batch)
            .map_err(|e| SerializationError {
                message: e.to_string(),
            })
    }

    #[inline]
    fn content_type(&self) -> &'static str {
        "application/x-bincode"
    }
}
