//! File header decoding.

use glam::Vec3;

use crate::TexturePaths;
use crate::error::{DecodeError, DecodeResult};
use crate::reader::ByteReader;

/// Magic bytes at the start of every model file.
pub const MAGIC: &[u8; 12] = b"Spring unit\0";

/// The only format version in use.
pub const VERSION: u32 = 0;

/// Size of the header record in bytes.
pub const HEADER_SIZE: usize = 52;

/// Lowest allowed vertical component of the model mid-position.
///
/// Placement math treats the mid-position as a pivot above the ground; a
/// pivot at or below zero height puts it inside the terrain.
pub const MIN_MID_HEIGHT: f32 = 1.0;

const VERSION_OFFSET: usize = 12;
const RADIUS_OFFSET: usize = 16;
const HEIGHT_OFFSET: usize = 20;
const MID_OFFSET: usize = 24;
const ROOT_PIECE_OFFSET: usize = 36;
const COLLISION_DATA_OFFSET: usize = 40;
const TEXTURE1_OFFSET: usize = 44;
const TEXTURE2_OFFSET: usize = 48;

/// Decoded file header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub radius: f32,
    pub height: f32,
    /// Mid-position relative to the model origin, with `y` clamped to
    /// [`MIN_MID_HEIGHT`].
    pub mid_position: Vec3,
    /// Byte offset of the root piece record.
    pub root_piece: usize,
    /// Byte offset of the collision data block. Not interpreted.
    pub collision_data: usize,
    pub textures: TexturePaths,
}

/// Decode the header record at offset 0.
///
/// # Format
///
/// - Bytes 0-11: Magic `"Spring unit\0"`
/// - Bytes 12-15: Version (u32, must be 0)
/// - Bytes 16-23: Radius, height (2 × f32)
/// - Bytes 24-35: Mid-position (3 × f32)
/// - Bytes 36-43: Root piece offset, collision data offset (2 × u32)
/// - Bytes 44-51: Texture path string offsets (2 × u32)
pub fn decode_header(reader: &ByteReader<'_>) -> DecodeResult<Header> {
    let magic = reader.bytes(0, HEADER_SIZE)?;
    if &magic[..MAGIC.len()] != MAGIC {
        return Err(DecodeError::BadMagic);
    }

    let version = reader.u32_at(VERSION_OFFSET)?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let mut mid_position = reader.vec3_at(MID_OFFSET)?;
    mid_position.y = mid_position.y.max(MIN_MID_HEIGHT);

    let textures = TexturePaths {
        primary: reader.cstr_at(reader.usize_at(TEXTURE1_OFFSET)?)?,
        secondary: reader.cstr_at(reader.usize_at(TEXTURE2_OFFSET)?)?,
    };

    Ok(Header {
        radius: reader.f32_at(RADIUS_OFFSET)?,
        height: reader.f32_at(HEIGHT_OFFSET)?,
        mid_position,
        root_piece: reader.usize_at(ROOT_PIECE_OFFSET)?,
        collision_data: reader.usize_at(COLLISION_DATA_OFFSET)?,
        textures,
    })
}
