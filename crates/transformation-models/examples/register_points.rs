//! Fit both models to a handful of ground control points and print results.
//!
//! Usage: `register_points [config.json]`. Without a config both the affine
//! and the thin plate spline model are run.

use log::LevelFilter;
use transformation_models::{
    init_with_level, AnyTransformation, Point2, TransformConfig, TransformKind,
};

fn gcps() -> (Vec<Point2<f64>>, Vec<Point2<f64>>) {
    // pixel (row, col) -> projected (northing, easting)
    let pixel = [
        [0.0, 0.0],
        [0.0, 4000.0],
        [3000.0, 0.0],
        [3000.0, 4000.0],
        [1500.0, 2000.0],
        [700.0, 3100.0],
    ];
    let map = [
        [6_210_000.0, 512_000.0],
        [6_210_012.0, 513_999.0],
        [6_208_498.0, 512_006.0],
        [6_208_509.0, 514_004.0],
        [6_209_252.0, 513_003.5],
        [6_209_660.0, 513_552.0],
    ];
    (
        pixel.iter().map(|&p| Point2::from(p)).collect(),
        map.iter().map(|&p| Point2::from(p)).collect(),
    )
}

fn run(mut t: AnyTransformation) -> Result<(), Box<dyn std::error::Error>> {
    let (source, target) = gcps();
    t.calculate(&source, &target)?;

    println!("== {:?}", t.kind());
    for (s, g) in source.iter().zip(&target) {
        let p = t.forward(*s)?;
        println!(
            "  ({:7.1}, {:7.1}) -> ({:.3}, {:.3})  residual ({:+.3}, {:+.3})",
            s.x,
            s.y,
            p.x,
            p.y,
            p.x - g.x,
            p.y - g.y
        );
    }
    let back = t.inverse(target[4])?;
    println!("  inverse of gcp 4: ({:.3}, {:.3})", back.x, back.y);

    if let Some(affine) = t.as_affine() {
        print!("  world file:\n{}", affine.to_world_file(false)?);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(LevelFilter::Debug)?;

    match std::env::args().nth(1) {
        Some(path) => run(TransformConfig::load_json(path)?.build())?,
        None => {
            run(AnyTransformation::new(TransformKind::Affine))?;
            run(AnyTransformation::new(TransformKind::Tps))?;
        }
    }
    Ok(())
}
