//! Decode S3O binary model files into piece trees.
//!
//! This crate provides pure synchronous decoding for the S3O model format:
//! a fixed-layout little-endian file holding a header and a tree of pieces,
//! each with its own vertices, draw order and children. Decoding also derives
//! per-piece bounds, box collision volumes and smoothed tangent bases.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **User-controlled parallelism**: Each decode owns its buffer and output,
//!   so independent models can be decoded on any number of threads
//! - **Untrusted input**: Every read is bounds-checked; malformed files fail
//!   with a [`DecodeError`] instead of panicking
//!
//! # Key functions
//!
//! - [`decode_model`]: Decode a whole model from a byte buffer
//! - [`synthesize_tangents`]: Compute per-vertex tangent bases for a piece
//! - [`shatter`]: Split a decoded piece into debris fragments
//! - [`encode_model`]: Write a model description in the on-disk layout

mod error;

pub mod bounds;
pub mod encode;
pub mod header;
pub mod model;
pub mod piece;
pub mod reader;
pub mod shatter;
pub mod tangents;

pub use bounds::{Bounds, CollisionVolume, VolumeShape};
pub use encode::{ModelDesc, PieceDesc, encode_model};
pub use error::{DecodeError, DecodeResult};
pub use header::{Header, MIN_MID_HEIGHT, decode_header};
pub use model::{Model, Piece, PieceId, decode_model};
pub use reader::ByteReader;
pub use shatter::{DebrisSink, FRAGMENT_SPEED_JITTER, Fragment, ShatterParams, shatter};
pub use tangents::{Tangents, synthesize_tangents};

use glam::{Vec2, Vec3};

/// Draw-order value that restarts a triangle strip.
pub const STRIP_RESTART: i32 = -1;

/// Default limit on piece tree depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on the number of pieces in one model.
pub const DEFAULT_MAX_PIECES: usize = 4096;

/// One vertex as stored in a piece's vertex array (32 bytes on disk).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex {
    #[must_use]
    pub const fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// How a piece's draw order assembles vertices into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Triangles,
    TriangleStrip,
    Quads,
}

impl PrimitiveKind {
    /// Map an on-disk tag to a primitive kind.
    #[must_use]
    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::Triangles),
            1 => Some(Self::TriangleStrip),
            2 => Some(Self::Quads),
            _ => None,
        }
    }

    #[must_use]
    pub const fn tag(self) -> u32 {
        match self {
            Self::Triangles => 0,
            Self::TriangleStrip => 1,
            Self::Quads => 2,
        }
    }
}

/// The two texture paths named by a model header.
///
/// Paths are raw strings; resolving and loading them is up to the
/// [`TextureLoader`] handed to [`decode_model`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TexturePaths {
    pub primary: String,
    pub secondary: String,
}

/// Receives the texture paths of a successfully decoded model.
pub trait TextureLoader {
    fn load_textures(&mut self, model_name: &str, textures: &TexturePaths);
}

impl<F> TextureLoader for F
where
    F: FnMut(&str, &TexturePaths),
{
    fn load_textures(&mut self, model_name: &str, textures: &TexturePaths) {
        self(model_name, textures);
    }
}

/// Texture loader that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextures;

impl TextureLoader for NoTextures {
    fn load_textures(&mut self, _model_name: &str, _textures: &TexturePaths) {}
}

/// Limits applied while decoding untrusted files.
///
/// Child offsets are free-form, so a file can describe a cycle or a tree that
/// fans out exponentially. Both limits turn that into a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of piece levels, root included.
    pub max_depth: usize,
    /// Maximum number of pieces in the whole tree.
    pub max_pieces: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_pieces: DEFAULT_MAX_PIECES,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_max_pieces(mut self, max_pieces: usize) -> Self {
        self.max_pieces = max_pieces;
        self
    }
}
