//! Engine error type.
//!
//! Most rule questions in this crate never fail: lookups return `Option`,
//! malformed patterns match nothing and duplicate registrations are ignored.
//! `EngineError` covers the remaining cases:
//!
//! - conversions that can be checked by the caller (`HandlingMethod::from_str`,
//!   config parsing, replay decoding) return `Result<_, EngineError>`;
//! - lifecycle violations (a card id the registry never issued, an unknown
//!   handling-method name in content) are fatal and panic with the error's
//!   display text.

use thiserror::Error;

use crate::cards::CardId;

/// Errors raised by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A handling-method name that is not part of the fixed vocabulary.
    #[error("unknown card handling method: {0:?}")]
    UnknownHandlingMethod(String),

    /// A card id outside the registry's issued range.
    #[error("card id {id} out of range (registry holds {count} cards)")]
    CardOutOfRange { id: CardId, count: usize },

    /// Engine configuration could not be parsed.
    #[error("invalid engine config: {0}")]
    Config(#[from] toml::de::Error),

    /// A persisted record could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

impl EngineError {
    /// Whether this error means the registry was used outside its lifecycle
    /// or the loaded content is defective.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownHandlingMethod(_) | Self::CardOutOfRange { .. }
        )
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
