//! Writing models in the on-disk layout.
//!
//! The encoder is the inverse of [`decode_model`](crate::decode_model) for
//! the fields the decoder reads. Draw orders are written exactly as given,
//! so a restart sentinel in a description comes back with its duplicated
//! follower after decoding.

use byteorder::{ByteOrder, LittleEndian};
use glam::Vec3;

use crate::header::{HEADER_SIZE, MAGIC, VERSION};
use crate::piece::PIECE_RECORD_SIZE;
use crate::{PrimitiveKind, TexturePaths, Vertex};

/// Description of a whole model file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDesc {
    pub radius: f32,
    pub height: f32,
    pub mid_position: Vec3,
    pub textures: TexturePaths,
    pub root: PieceDesc,
}

/// Description of one piece and its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceDesc {
    pub name: String,
    pub offset: Vec3,
    pub kind: PrimitiveKind,
    pub vertices: Vec<Vertex>,
    pub draw_order: Vec<i32>,
    pub children: Vec<PieceDesc>,
}

impl PieceDesc {
    /// An empty triangle-list piece with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: Vec3::ZERO,
            kind: PrimitiveKind::Triangles,
            vertices: Vec::new(),
            draw_order: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Serialize a model description.
///
/// Layout: header, texture strings, then each piece's data blocks followed by
/// its children and finally its own record. Records therefore appear after
/// the records of their children; all references are absolute offsets.
#[must_use]
pub fn encode_model(desc: &ModelDesc) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_SIZE];
    buf[..MAGIC.len()].copy_from_slice(MAGIC);
    patch_u32(&mut buf, 12, VERSION);
    patch_f32(&mut buf, 16, desc.radius);
    patch_f32(&mut buf, 20, desc.height);
    patch_vec3(&mut buf, 24, desc.mid_position);

    let texture1 = put_cstr(&mut buf, &desc.textures.primary);
    let texture2 = put_cstr(&mut buf, &desc.textures.secondary);
    let root = put_piece(&mut buf, &desc.root);

    patch_u32(&mut buf, 36, root);
    patch_u32(&mut buf, 40, 0);
    patch_u32(&mut buf, 44, texture1);
    patch_u32(&mut buf, 48, texture2);
    buf
}

fn put_piece(buf: &mut Vec<u8>, piece: &PieceDesc) -> u32 {
    let name = put_cstr(buf, &piece.name);

    let vertices = position(buf);
    for v in &piece.vertices {
        put_vec3(buf, v.position);
        put_vec3(buf, v.normal);
        put_f32(buf, v.tex_coord.x);
        put_f32(buf, v.tex_coord.y);
    }

    let draw_order = position(buf);
    for &index in &piece.draw_order {
        let mut raw = [0u8; 4];
        LittleEndian::write_i32(&mut raw, index);
        buf.extend_from_slice(&raw);
    }

    let child_offsets: Vec<u32> = piece.children.iter().map(|c| put_piece(buf, c)).collect();
    let child_table = position(buf);
    for offset in child_offsets {
        put_u32(buf, offset);
    }

    let record = position(buf);
    buf.resize(buf.len() + PIECE_RECORD_SIZE, 0);
    let at = record as usize;
    patch_u32(buf, at, name);
    patch_u32(buf, at + 4, len_u32(piece.children.len()));
    patch_u32(buf, at + 8, child_table);
    patch_u32(buf, at + 12, len_u32(piece.vertices.len()));
    patch_u32(buf, at + 16, vertices);
    patch_u32(buf, at + 20, 0);
    patch_u32(buf, at + 24, piece.kind.tag());
    patch_u32(buf, at + 28, len_u32(piece.draw_order.len()));
    patch_u32(buf, at + 32, draw_order);
    patch_u32(buf, at + 36, 0);
    patch_vec3(buf, at + 40, piece.offset);
    record
}

fn put_cstr(buf: &mut Vec<u8>, s: &str) -> u32 {
    if s.is_empty() {
        return 0;
    }
    let at = position(buf);
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    at
}

#[allow(clippy::cast_possible_truncation)]
fn len_u32(len: usize) -> u32 {
    len as u32
}

fn position(buf: &[u8]) -> u32 {
    len_u32(buf.len())
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    let mut raw = [0u8; 4];
    LittleEndian::write_u32(&mut raw, value);
    buf.extend_from_slice(&raw);
}

fn put_f32(buf: &mut Vec<u8>, value: f32) {
    let mut raw = [0u8; 4];
    LittleEndian::write_f32(&mut raw, value);
    buf.extend_from_slice(&raw);
}

fn put_vec3(buf: &mut Vec<u8>, v: Vec3) {
    put_f32(buf, v.x);
    put_f32(buf, v.y);
    put_f32(buf, v.z);
}

fn patch_u32(buf: &mut [u8], at: usize, value: u32) {
    LittleEndian::write_u32(&mut buf[at..at + 4], value);
}

fn patch_f32(buf: &mut [u8], at: usize, value: f32) {
    LittleEndian::write_f32(&mut buf[at..at + 4], value);
}

fn patch_vec3(buf: &mut [u8], at: usize, v: Vec3) {
    patch_f32(buf, at, v.x);
    patch_f32(buf, at + 4, v.y);
    patch_f32(buf, at + 8, v.z);
}
