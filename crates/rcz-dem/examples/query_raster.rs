//! Example: Inspect an elevation raster.
//!
//! Usage: cargo run --example query_raster -- <file.tif> [x y]

use rcz_dem::GeoRaster;
use std::env;
use std::time::Instant;

/// Sample value reserved for missing terrain.
const NO_DATA: u8 = 255;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file.tif> [x y]", args[0]);
        eprintln!("Example: {} ./terrain.tif 120 80", args[0]);
        std::process::exit(1);
    }

    let start = Instant::now();
    let raster = match GeoRaster::from_file(&args[1]) {
        Ok(raster) => raster,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let (width, height) = raster.dimensions();
    println!(
        "Loaded {}x{} raster in {:.3}s ({} geo tags)",
        width,
        height,
        start.elapsed().as_secs_f64(),
        raster.geo_tags().count()
    );

    if let Some(scale) = &raster.geo_tags().pixel_scale {
        println!("Pixel scale: {:?}", scale);
    }

    let (x, y) = match (args.get(2), args.get(3)) {
        (Some(x), Some(y)) => (
            x.parse().expect("Invalid column"),
            y.parse().expect("Invalid row"),
        ),
        _ => (width / 2, height / 2),
    };

    match raster.get(x, y) {
        Some(NO_DATA) => println!("Sample at ({}, {}): no data", x, y),
        Some(value) => println!("Sample at ({}, {}): {}", x, y, value),
        None => {
            eprintln!("({}, {}) is outside the raster", x, y);
            std::process::exit(1);
        }
    }
}
