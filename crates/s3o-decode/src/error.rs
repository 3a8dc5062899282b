//! Error types for model decoding.

use thiserror::Error;

/// Errors that make a model file unusable.
///
/// Every variant describes a corrupt asset: the decode is aborted and no
/// partial model is returned. Degenerate geometry (zero-area texture
/// mappings, broken normals) is handled by fallbacks and never shows up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("read of {len} bytes at offset {offset} exceeds buffer of {buffer_len} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("bad magic: expected \"Spring unit\"")]
    BadMagic,

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),

    #[error("unknown primitive kind {tag} in piece at offset {offset}")]
    UnknownPrimitiveKind { tag: u32, offset: usize },

    #[error("draw index {index} out of range for {vertex_count} vertices in piece '{piece}'")]
    InvalidDrawIndex {
        index: i32,
        vertex_count: usize,
        piece: String,
    },

    #[error("string at offset {0} has no terminator")]
    UnterminatedString(usize),

    #[error("piece tree deeper than {0} levels")]
    TreeTooDeep(usize),

    #[error("model has more than {0} pieces")]
    TooManyPieces(usize),

    #[error("piece record at offset {0} is referenced more than once")]
    SharedPiece(usize),
}

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
