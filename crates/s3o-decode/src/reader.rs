//! Bounds-checked little-endian field access.

use byteorder::{ByteOrder, LittleEndian};
use glam::{Vec2, Vec3};

use crate::error::{DecodeError, DecodeResult};

/// Random-access reader over a model file.
///
/// All multi-byte fields are stored little-endian on disk and converted to
/// host order on read. Every access is checked against the buffer length.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> DecodeResult<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.buf.get(offset..end))
            .ok_or(DecodeError::OutOfBounds {
                offset,
                len,
                buffer_len: self.buf.len(),
            })
    }

    /// Check that `count` records of `stride` bytes fit at `offset`.
    ///
    /// Lets array decoders reject a bogus count before allocating for it.
    pub fn check_array(&self, offset: usize, count: usize, stride: usize) -> DecodeResult<()> {
        let len = count.checked_mul(stride).ok_or(DecodeError::OutOfBounds {
            offset,
            len: usize::MAX,
            buffer_len: self.buf.len(),
        })?;
        self.bytes(offset, len).map(|_| ())
    }

    pub fn u32_at(&self, offset: usize) -> DecodeResult<u32> {
        self.bytes(offset, 4).map(LittleEndian::read_u32)
    }

    pub fn i32_at(&self, offset: usize) -> DecodeResult<i32> {
        self.bytes(offset, 4).map(LittleEndian::read_i32)
    }

    pub fn f32_at(&self, offset: usize) -> DecodeResult<f32> {
        self.bytes(offset, 4).map(LittleEndian::read_f32)
    }

    /// Read a `u32` field used as an offset or count.
    pub fn usize_at(&self, offset: usize) -> DecodeResult<usize> {
        // u32 always fits in usize on the targets we build for.
        self.u32_at(offset).map(|v| v as usize)
    }

    pub fn vec2_at(&self, offset: usize) -> DecodeResult<Vec2> {
        let raw = self.bytes(offset, 8)?;
        Ok(Vec2::new(
            LittleEndian::read_f32(&raw[0..4]),
            LittleEndian::read_f32(&raw[4..8]),
        ))
    }

    pub fn vec3_at(&self, offset: usize) -> DecodeResult<Vec3> {
        let raw = self.bytes(offset, 12)?;
        Ok(Vec3::new(
            LittleEndian::read_f32(&raw[0..4]),
            LittleEndian::read_f32(&raw[4..8]),
            LittleEndian::read_f32(&raw[8..12]),
        ))
    }

    /// Read a NUL-terminated string.
    ///
    /// Offset 0 is the "no string" convention and yields an empty string.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn cstr_at(&self, offset: usize) -> DecodeResult<String> {
        if offset == 0 {
            return Ok(String::new());
        }
        let tail = self.buf.get(offset..).ok_or(DecodeError::OutOfBounds {
            offset,
            len: 1,
            buffer_len: self.buf.len(),
        })?;
        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnterminatedString(offset))?;
        Ok(String::from_utf8_lossy(&tail[..end]).into_owned())
    }
}
