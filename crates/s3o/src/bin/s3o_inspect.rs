//! Decode a model file and print a JSON summary of its piece tree.
//!
//! Run: `cargo run -p s3o --features tools --bin s3o_inspect -- <model.s3o>`
//!
//! Set `RUST_LOG=s3o=trace` to see every piece as it is decoded.

use std::env;
use std::path::Path;

use s3o::{Bounds, LocalFileSystem, Model, ModelLoader, Piece, TexturePaths};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1).map(Path::new) else {
        eprintln!("usage: s3o_inspect <model.s3o>");
        std::process::exit(2);
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or("model path has no file name")?
        .to_string_lossy();

    let loader = ModelLoader::new(LocalFileSystem::new(dir));
    let mut requested = Vec::new();
    let mut textures = |_: &str, paths: &TexturePaths| requested.push(paths.clone());
    let model = loader.load(&name, &mut textures)?;

    let summary = json!({
        "name": model.name(),
        "radius": model.radius(),
        "height": model.height(),
        "mid_position": model.mid_position().to_array(),
        "piece_count": model.piece_count(),
        "textures": requested.iter().map(|t| [&t.primary, &t.secondary]).collect::<Vec<_>>(),
        "bounds": bounds_json(model.bounds()),
        "root": piece_json(&model, model.root()),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn bounds_json(bounds: Option<Bounds>) -> Value {
    bounds.map_or(Value::Null, |b| {
        json!({ "min": b.min.to_array(), "max": b.max.to_array() })
    })
}

fn piece_json(model: &Model, piece: &Piece) -> Value {
    json!({
        "name": piece.name(),
        "offset": piece.offset().to_array(),
        "primitive": format!("{:?}", piece.primitive_kind()),
        "vertex_count": piece.vertex_count(),
        "index_count": piece.draw_order().len(),
        "has_tangents": piece.tangents().is_some(),
        "bounds": bounds_json(piece.bounds()),
        "children": model
            .children_of(piece)
            .map(|child| piece_json(model, child))
            .collect::<Vec<_>>(),
    })
}
