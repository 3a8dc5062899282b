//! Model loading through a file system.

use s3o_decode::{DecodeOptions, Model, TextureLoader, decode_model};

use crate::error::{Error, Result};
use crate::fs::FileSystem;

/// Loads models by name.
///
/// Each call reads the file into a buffer owned by that call, decodes it and
/// drops the buffer. Nothing is cached; the loader can be shared between
/// threads and used concurrently.
#[derive(Debug, Clone)]
pub struct ModelLoader<F> {
    fs: F,
    options: DecodeOptions,
}

impl<F: FileSystem> ModelLoader<F> {
    /// Create a loader with default decode limits.
    pub fn new(fs: F) -> Self {
        Self::with_options(fs, DecodeOptions::default())
    }

    pub fn with_options(fs: F, options: DecodeOptions) -> Self {
        Self { fs, options }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Load and decode one model.
    ///
    /// Fails with [`Error::MissingAsset`] if the file does not exist. On any
    /// failure no model is returned and `textures` is not called.
    pub fn load<T>(&self, name: &str, textures: &mut T) -> Result<Model>
    where
        T: TextureLoader + ?Sized,
    {
        if !self.fs.exists(name) {
            tracing::warn!("could not find model file '{}'", name);
            return Err(Error::MissingAsset(name.to_owned()));
        }

        let bytes = self.fs.read(name).map_err(|source| {
            tracing::warn!("failed to read model file '{}': {}", name, source);
            Error::Io {
                name: name.to_owned(),
                source,
            }
        })?;

        match decode_model(name, &bytes, &self.options, textures) {
            Ok(model) => {
                tracing::info!(
                    "Loaded model '{}': {} pieces, radius={:.1}, height={:.1}",
                    name,
                    model.piece_count(),
                    model.radius(),
                    model.height()
                );
                Ok(model)
            }
            Err(source) => {
                tracing::warn!("corrupt model file '{}': {}", name, source);
                Err(Error::Decode {
                    name: name.to_owned(),
                    source,
                })
            }
        }
    }
}
