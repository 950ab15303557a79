//! Diagnostic channel and error kinds shared by every module in this crate.
//!
//! Leaf operations return `Result<T, CorpusError>`. Aggregate objects such as
//! [`crate::filter::Filter`] and [`crate::search::Search`] latch the first
//! error they see into a local field and return a clone of it on every
//! subsequent call, mirroring the `CHECK_ERROR` sticky-failure discipline of
//! the C engine this crate is modeled on.

use thiserror::Error;

/// A diagnostic, keyed to an error kind and (where applicable) a byte offset.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CorpusError {
    /// Malformed UTF-8, an invalid escape, an unrecognized stemmer name, or
    /// an attempt to mutate a filter mid-scan.
    #[error("invalid input at byte {offset}: {message}")]
    InvalidInput { offset: usize, message: String },

    /// An allocation failure. Rust's global allocator aborts the process on
    /// real OOM rather than returning an error, so this variant exists to
    /// mirror the C library's error kinds but is not currently constructed.
    #[error("out of memory: {message}")]
    OutOfMemory { message: String },

    /// A capacity request would exceed a platform or data-structure limit,
    /// e.g. a `usize` overflow while growing one of the crate's golden-ratio
    /// id arrays. None of this crate's collections approach that limit in
    /// ordinary use, but the check is real.
    #[error("capacity overflow: {message}")]
    Overflow { message: String },

    /// A violated invariant; should be unreachable under correct use.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CorpusError {
    pub fn invalid_input(offset: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        log::warn!("invalid input at byte {offset}: {message}");
        CorpusError::InvalidInput { offset, message: message }
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("capacity overflow: {message}");
        CorpusError::Overflow { message }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("internal error: {message}");
        CorpusError::Internal { message }
    }
}

pub type Result<T> = std::result::Result<T, CorpusError>;
