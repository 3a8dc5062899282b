//! Piece extents and box collision volumes.

use glam::Vec3;

use crate::model::Piece;

/// Axis-aligned extent. Absence of any geometry is represented by
/// `Option<Bounds>::None`, which acts as the identity for [`Bounds::union`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    #[must_use]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest extent containing all `points`, or `None` if there are none.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points
            .into_iter()
            .fold(None, |acc: Option<Self>, p| match acc {
                Some(b) => Some(b.include(p)),
                None => Some(Self::from_point(p)),
            })
    }

    #[must_use]
    pub fn include(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn translated(self, by: Vec3) -> Self {
        Self {
            min: self.min + by,
            max: self.max + by,
        }
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.max + self.min) * 0.5
    }

    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }
}

/// Shape of a collision volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeShape {
    Box,
}

/// Collision volume parameters handed to the physics side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionVolume {
    pub shape: VolumeShape,
    /// Full size along each axis.
    pub scale: Vec3,
    /// Center relative to the piece origin.
    pub offset: Vec3,
    pub enabled: bool,
}

impl CollisionVolume {
    /// Enabled box exactly covering `bounds`.
    #[must_use]
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self {
            shape: VolumeShape::Box,
            scale: bounds.size(),
            offset: bounds.center(),
            enabled: true,
        }
    }
}

/// Compute bounds and collision volumes for every piece, children first.
///
/// `pieces` must be in pre-order (children after their parent), as produced
/// by the tree builder; walking it backwards then visits every child before
/// its parent.
pub(crate) fn compute_bounds(pieces: &mut [Piece]) {
    for id in (0..pieces.len()).rev() {
        let piece = &pieces[id];
        let own = Bounds::from_points(piece.vertices.iter().map(|v| v.position));

        let bounds = piece.children.iter().fold(own, |acc, child| {
            debug_assert!(child.0 > id, "piece arena is not in pre-order");
            let child = &pieces[child.0];
            match (acc, child.bounds.map(|b| b.translated(child.offset))) {
                (Some(a), Some(b)) => Some(a.union(b)),
                (a, b) => a.or(b),
            }
        });

        let piece = &mut pieces[id];
        piece.bounds = bounds;
        piece.collision_volume = bounds.as_ref().map(CollisionVolume::from_bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{ModelDesc, PieceDesc, encode_model};
    use crate::{DecodeOptions, NoTextures, TexturePaths, Vertex, decode_model};
    use glam::Vec2;

    fn at(position: [f32; 3]) -> Vertex {
        Vertex::new(Vec3::from(position), Vec3::Y, Vec2::ZERO)
    }

    fn decode(root: PieceDesc) -> crate::Model {
        let bytes = encode_model(&ModelDesc {
            radius: 1.0,
            height: 1.0,
            mid_position: Vec3::ONE,
            textures: TexturePaths::default(),
            root,
        });
        decode_model("test", &bytes, &DecodeOptions::default(), &mut NoTextures).unwrap()
    }

    #[test]
    fn union_and_translation() {
        let a = Bounds::from_point(Vec3::ZERO).include(Vec3::ONE);
        let b = Bounds::from_point(Vec3::splat(-1.0)).translated(Vec3::new(0.0, 5.0, 0.0));
        let u = a.union(b);
        assert_eq!(u.min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(u.max, Vec3::new(1.0, 4.0, 1.0));
        assert!(u.contains(&a) && u.contains(&b));
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn collision_volume_covers_bounds() {
        let bounds = Bounds {
            min: Vec3::new(-1.0, 0.0, -3.0),
            max: Vec3::new(1.0, 4.0, 1.0),
        };
        let volume = CollisionVolume::from_bounds(&bounds);
        assert_eq!(volume.shape, VolumeShape::Box);
        assert_eq!(volume.scale, Vec3::new(2.0, 4.0, 4.0));
        assert_eq!(volume.offset, Vec3::new(0.0, 2.0, -1.0));
        assert!(volume.enabled);
    }

    #[test]
    fn parent_covers_translated_children() {
        let mut root = PieceDesc::named("root");
        root.vertices = vec![at([-1.0, 0.0, -1.0]), at([1.0, 1.0, 1.0])];

        let mut left = PieceDesc::named("left");
        left.offset = Vec3::new(-5.0, 0.0, 0.0);
        left.vertices = vec![at([-1.0, -1.0, 0.0]), at([0.5, 2.0, 0.0])];

        let mut right = PieceDesc::named("right");
        right.offset = Vec3::new(4.0, 3.0, 0.0);
        right.vertices = vec![at([0.0, 0.0, -2.0]), at([2.0, 1.0, 0.0])];

        root.children = vec![left, right];
        let model = decode(root);

        let left = model.find_piece("left").unwrap().bounds().unwrap();
        assert_eq!(left.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(left.max, Vec3::new(0.5, 2.0, 0.0));

        let root = model.root().bounds().unwrap();
        assert_eq!(root.min, Vec3::new(-6.0, -1.0, -2.0));
        assert_eq!(root.max, Vec3::new(6.0, 4.0, 1.0));
        assert_eq!(model.bounds(), Some(root));

        let volume = model.root().collision_volume().unwrap();
        assert_eq!(volume.scale, Vec3::new(12.0, 5.0, 3.0));
        assert_eq!(volume.offset, Vec3::new(0.0, 1.5, -0.5));
    }

    #[test]
    fn empty_pieces_stay_empty() {
        let mut root = PieceDesc::named("root");
        let mut holder = PieceDesc::named("holder");
        holder.offset = Vec3::new(100.0, 0.0, 0.0);
        holder.children.push(PieceDesc::named("nothing"));
        let mut leaf = PieceDesc::named("leaf");
        leaf.offset = Vec3::new(0.0, 2.0, 0.0);
        leaf.vertices = vec![at([1.0, 1.0, 1.0])];
        root.children = vec![holder, leaf];

        let model = decode(root);
        let holder = model.find_piece("holder").unwrap();
        assert_eq!(holder.bounds(), None);
        assert!(holder.collision_volume().is_none());

        // The empty holder contributes nothing, offset or not.
        let root = model.root().bounds().unwrap();
        assert_eq!(root, Bounds::from_point(Vec3::new(1.0, 3.0, 1.0)));
    }
}
