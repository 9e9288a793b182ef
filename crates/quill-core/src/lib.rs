//! # Quill Core
//!
//! Everything around the buffer: configuration, the spell-check
//! dictionary, and the session that ties a buffer to a file.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │                 Session                   │
//! │  ┌──────────┐  ┌──────────┐  ┌─────────┐  │
//! │  │  Config  │  │  Buffer  │  │  Dict   │  │
//! │  └──────────┘  └────┬─────┘  └─────────┘  │
//! │                ┌────┴─────┐               │
//! │                │ UndoLog  │               │
//! │                └──────────┘               │
//! └───────────────────────────────────────────┘
//! ```
//!
//! The buffer never calls the dictionary; the session reads lines out
//! of the buffer and hands them over.

pub mod config;
pub mod session;
pub mod spelling;

pub use config::{Config, ConfigError};
pub use session::{LineReport, Misspelling, Session};
pub use spelling::{Dictionary, SpellCheck, SpellChecker};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No file associated with this session")]
    NoPath,

    #[error("No dictionary loaded")]
    NoDictionary,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer error: {0}")]
    Buffer(#[from] quill_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
