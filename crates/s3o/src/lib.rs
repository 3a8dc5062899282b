//! Load S3O models by name.
//!
//! This crate wraps [`s3o_decode`] with the pieces needed to get from a
//! model name to a decoded [`Model`]:
//!
//! - A [`FileSystem`] trait with local-disk and in-memory implementations
//! - A [`ModelLoader`] that reports missing and corrupt assets as [`Error`]s
//!   and logs each load through `tracing`
//!
//! # Example
//!
//! ```no_run
//! use s3o::{LocalFileSystem, ModelLoader, NoTextures};
//!
//! let loader = ModelLoader::new(LocalFileSystem::new("objects3d"));
//! let model = loader.load("armtank.s3o", &mut NoTextures)?;
//! println!("{} pieces", model.piece_count());
//! # Ok::<(), s3o::Error>(())
//! ```

mod error;
mod fs;
mod loader;

pub use error::{Error, Result};
pub use fs::{FileSystem, LocalFileSystem, MemoryFileSystem};
pub use loader::ModelLoader;

// Re-export decode types for convenience.
pub use s3o_decode::{
    Bounds, CollisionVolume, DebrisSink, DecodeError, DecodeOptions, Fragment, Model, NoTextures,
    Piece, PieceId, PrimitiveKind, ShatterParams, Tangents, TextureLoader, TexturePaths, Vertex,
    VolumeShape,
};
