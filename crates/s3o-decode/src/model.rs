//! Decoded model and piece tree.

use glam::Vec3;

use crate::bounds::{Bounds, CollisionVolume, compute_bounds};
use crate::error::DecodeResult;
use crate::header::decode_header;
use crate::piece::TreeBuilder;
use crate::reader::ByteReader;
use crate::shatter::{DebrisSink, ShatterParams, shatter};
use crate::tangents::Tangents;
use crate::{DecodeOptions, PrimitiveKind, TextureLoader, TexturePaths, Vertex};

/// Index of a piece in its model's piece arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

impl PieceId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One node of a model's geometry tree.
///
/// Pieces are read-only once decoding returns. Everything derived from the
/// geometry (tangents, bounds, collision volume) is computed during decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub(crate) name: String,
    pub(crate) offset: Vec3,
    pub(crate) kind: PrimitiveKind,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) draw_order: Vec<i32>,
    pub(crate) children: Vec<PieceId>,
    pub(crate) tangents: Option<Tangents>,
    pub(crate) bounds: Option<Bounds>,
    pub(crate) collision_volume: Option<CollisionVolume>,
}

impl Piece {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offset relative to the parent piece.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    #[must_use]
    pub fn primitive_kind(&self) -> PrimitiveKind {
        self.kind
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Draw-order indices, with [`STRIP_RESTART`](crate::STRIP_RESTART)
    /// sentinels left in place.
    #[must_use]
    pub fn draw_order(&self) -> &[i32] {
        &self.draw_order
    }

    #[must_use]
    pub fn children(&self) -> &[PieceId] {
        &self.children
    }

    /// Tangent basis, absent for empty pieces and quad pieces.
    #[must_use]
    pub fn tangents(&self) -> Option<&Tangents> {
        self.tangents.as_ref()
    }

    /// Extent in the piece's own frame, including translated children.
    /// `None` when the piece and its subtree have no vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    #[must_use]
    pub fn collision_volume(&self) -> Option<&CollisionVolume> {
        self.collision_volume.as_ref()
    }

    /// True if the piece has nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draw_order.is_empty()
    }

    /// Break this piece into debris. See [`shatter`].
    pub fn shatter<R, S>(&self, params: &ShatterParams, rng: &mut R, sink: &mut S) -> usize
    where
        R: rand::Rng + ?Sized,
        S: DebrisSink + ?Sized,
    {
        shatter(self, params, rng, sink)
    }
}

/// A decoded model: header attributes plus the piece tree.
///
/// Pieces live in an arena in pre-order, so the root is always first and
/// every child comes after its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub(crate) name: String,
    pub(crate) textures: TexturePaths,
    pub(crate) radius: f32,
    pub(crate) height: f32,
    pub(crate) mid_position: Vec3,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) root: PieceId,
    pub(crate) bounds: Option<Bounds>,
}

impl Model {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn textures(&self) -> &TexturePaths {
        &self.textures
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[must_use]
    pub fn mid_position(&self) -> Vec3 {
        self.mid_position
    }

    /// Number of piece records decoded, root included.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn root_id(&self) -> PieceId {
        self.root
    }

    #[must_use]
    pub fn root(&self) -> &Piece {
        &self.pieces[self.root.0]
    }

    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    /// All pieces in pre-order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Children of `piece`, in file order. Ids that do not belong to this
    /// model are skipped.
    pub fn children_of<'a>(&'a self, piece: &'a Piece) -> impl Iterator<Item = &'a Piece> + 'a {
        piece.children.iter().filter_map(move |id| self.pieces.get(id.0))
    }

    /// First piece with the given name, in pre-order.
    #[must_use]
    pub fn find_piece(&self, name: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.name == name)
    }

    /// Overall extent, copied from the root piece.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

/// Decode a model file.
///
/// Reads the header, builds the piece tree depth-first (synthesizing tangents
/// per piece as it goes), then computes bounds children-first. The texture
/// loader is only invoked once the whole file decoded successfully.
///
/// # Arguments
///
/// * `name` - Model name, usually the path it was loaded from
/// * `bytes` - The complete file contents
/// * `options` - Limits for untrusted input
/// * `textures` - Receives the texture paths named by the header
pub fn decode_model<T>(
    name: &str,
    bytes: &[u8],
    options: &DecodeOptions,
    textures: &mut T,
) -> DecodeResult<Model>
where
    T: TextureLoader + ?Sized,
{
    let reader = ByteReader::new(bytes);
    let header = decode_header(&reader)?;

    let mut builder = TreeBuilder::new(reader, options);
    let root = builder.build(header.root_piece)?;
    let mut pieces = builder.finish();

    compute_bounds(&mut pieces);
    let bounds = pieces[root.0].bounds;

    tracing::debug!(
        target: "s3o::model",
        "decoded model '{}': {} pieces, radius={:.1}, height={:.1}",
        name,
        pieces.len(),
        header.radius,
        header.height
    );

    textures.load_textures(name, &header.textures);

    Ok(Model {
        name: name.to_owned(),
        textures: header.textures,
        radius: header.radius,
        height: header.height,
        mid_position: header.mid_position,
        pieces,
        root,
        bounds,
    })
}
