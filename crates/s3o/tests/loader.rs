//! End-to-end loading through the file system collaborators.

use std::io;

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use s3o::{
    DebrisSink, DecodeError, DecodeOptions, Error, FileSystem, Fragment, LocalFileSystem,
    MemoryFileSystem, ModelLoader, NoTextures, PrimitiveKind, ShatterParams, TexturePaths, Vertex,
};
use s3o_decode::{ModelDesc, PieceDesc, encode_model};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn tank() -> Vec<u8> {
    let vertex = |p: [f32; 3], uv: [f32; 2]| Vertex::new(Vec3::from(p), Vec3::Y, Vec2::from(uv));

    let mut base = PieceDesc::named("base");
    base.vertices = vec![
        vertex([-2.0, 0.0, -3.0], [0.0, 0.0]),
        vertex([2.0, 0.0, -3.0], [1.0, 0.0]),
        vertex([2.0, 0.0, 3.0], [1.0, 1.0]),
        vertex([-2.0, 0.0, 3.0], [0.0, 1.0]),
    ];
    base.draw_order = vec![0, 1, 2, 0, 2, 3];

    let mut turret = PieceDesc::named("turret");
    turret.offset = Vec3::new(0.0, 1.5, 0.0);
    turret.kind = PrimitiveKind::TriangleStrip;
    turret.vertices = base.vertices.clone();
    turret.draw_order = vec![0, 1, 3, 2];

    let mut barrel = PieceDesc::named("barrel");
    barrel.offset = Vec3::new(0.0, 0.5, 4.0);
    barrel.kind = PrimitiveKind::Quads;
    barrel.vertices = base.vertices.clone();
    barrel.draw_order = vec![0, 1, 2, 3];

    turret.children.push(barrel);
    base.children.push(turret);

    encode_model(&ModelDesc {
        radius: 5.0,
        height: 3.0,
        mid_position: Vec3::new(0.0, 1.0, 0.0),
        textures: TexturePaths {
            primary: "tank1.dds".into(),
            secondary: "tank2.dds".into(),
        },
        root: base,
    })
}

#[test]
fn loads_model_from_memory() {
    init_tracing();
    let loader = ModelLoader::new(MemoryFileSystem::new().with_file("tank.s3o", tank()));

    let mut requested = Vec::new();
    let mut textures = |name: &str, paths: &TexturePaths| {
        requested.push((name.to_owned(), paths.primary.clone()));
    };
    let model = loader.load("tank.s3o", &mut textures).unwrap();

    assert_eq!(model.piece_count(), 3);
    assert_eq!(requested, vec![("tank.s3o".to_owned(), "tank1.dds".to_owned())]);

    let barrel = model.find_piece("barrel").unwrap();
    assert!(barrel.tangents().is_none());
    assert!(model.find_piece("turret").unwrap().tangents().is_some());

    let bounds = model.bounds().unwrap();
    assert_eq!(bounds.min, Vec3::new(-2.0, 0.0, -3.0));
    assert_eq!(bounds.max, Vec3::new(2.0, 2.0, 7.0));
}

#[test]
fn missing_file_is_reported() {
    init_tracing();
    let loader = ModelLoader::new(MemoryFileSystem::new());
    let err = loader.load("ghost.s3o", &mut NoTextures).unwrap_err();
    assert!(matches!(err, Error::MissingAsset(name) if name == "ghost.s3o"));
}

#[test]
fn corrupt_file_is_reported() {
    init_tracing();
    let mut bytes = tank();
    bytes.truncate(bytes.len() - 10);
    let loader = ModelLoader::new(MemoryFileSystem::new().with_file("bad.s3o", bytes));

    let mut calls = 0;
    let mut textures = |_: &str, _: &TexturePaths| calls += 1;
    let err = loader.load("bad.s3o", &mut textures).unwrap_err();

    assert!(matches!(
        err,
        Error::Decode {
            source: DecodeError::OutOfBounds { .. },
            ..
        }
    ));
    assert_eq!(calls, 0);
}

#[test]
fn decode_limits_come_from_loader_options() {
    let options = DecodeOptions::default().with_max_pieces(2);
    let loader =
        ModelLoader::with_options(MemoryFileSystem::new().with_file("tank.s3o", tank()), options);

    let err = loader.load("tank.s3o", &mut NoTextures).unwrap_err();
    assert!(matches!(
        err,
        Error::Decode {
            source: DecodeError::TooManyPieces(2),
            ..
        }
    ));
}

struct UnreadableFileSystem;

impl FileSystem for UnreadableFileSystem {
    fn exists(&self, _name: &str) -> bool {
        true
    }

    fn read(&self, _name: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
    }
}

#[test]
fn read_failure_is_reported() {
    let loader = ModelLoader::new(UnreadableFileSystem);
    let err = loader.load("tank.s3o", &mut NoTextures).unwrap_err();
    assert!(matches!(err, Error::Io { ref source, .. } if source.kind() == io::ErrorKind::PermissionDenied));
}

#[test]
fn loads_model_from_disk() {
    let dir = std::env::temp_dir().join(format!("s3o-loader-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tank.s3o"), tank()).unwrap();

    let loader = ModelLoader::new(LocalFileSystem::new(&dir));
    let model = loader.load("tank.s3o", &mut NoTextures).unwrap();
    assert_eq!(model.root().name(), "base");
    assert!(matches!(
        loader.load("other.s3o", &mut NoTextures),
        Err(Error::MissingAsset(_))
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn concurrent_loads_agree() {
    let loader = ModelLoader::new(MemoryFileSystem::new().with_file("tank.s3o", tank()));

    let models: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| loader.load("tank.s3o", &mut NoTextures).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for model in &models[1..] {
        assert_eq!(model, &models[0]);
    }
}

#[derive(Default)]
struct ProjectileRegistry {
    flying: Vec<(i32, Fragment)>,
}

impl DebrisSink for ProjectileRegistry {
    fn add_fragment(&mut self, fragment: Fragment) {
        self.flying.push((fragment.team, fragment));
    }
}

#[test]
fn shattered_pieces_reach_the_registry() {
    let loader = ModelLoader::new(MemoryFileSystem::new().with_file("tank.s3o", tank()));
    let model = loader.load("tank.s3o", &mut NoTextures).unwrap();
    let source = model.clone();

    let mut registry = ProjectileRegistry::default();
    let mut rng = StdRng::seed_from_u64(99);
    let params = ShatterParams {
        survival_chance: 1.0,
        texture_type: 2,
        team: 5,
        position: Vec3::new(100.0, 0.0, 50.0),
        velocity: Vec3::ZERO,
    };

    let total: usize = model
        .pieces()
        .iter()
        .map(|piece| piece.shatter(&params, &mut rng, &mut registry))
        .sum();

    // Two triangles, two strip triangles and one quad.
    assert_eq!(total, 5);
    assert_eq!(registry.flying.len(), 5);
    assert!(registry.flying.iter().all(|(team, _)| *team == 5));
    assert_eq!(model, source);
}
