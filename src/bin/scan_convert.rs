use log::info;
use scan_convert::acquisition::AcquisitionGeometry;
use scan_convert::config::scan_convert::load_config;
use scan_convert::image::io::{load_grayscale_volume, save_grayscale, write_json_file};
use scan_convert::{CartesianToPolar, ScanConverter};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let source = load_grayscale_volume(&config.input, [0.0, 0.0], config.input_spacing)?;
    let acquisition =
        AcquisitionGeometry::from_metadata(&config.metadata).map_err(|e| e.to_string())?;
    let params = acquisition
        .sector_params(
            source.geometry(),
            config.axes.radius_axis,
            config.axes.angle_axis,
        )
        .map_err(|e| e.to_string())?;
    let transform = CartesianToPolar::configure(&params).map_err(|e| e.to_string())?;
    info!(
        "scan_convert: {} lines, r=[{:.3}, {:.3}]",
        params.angles.len(),
        params.r_min,
        params.r_max
    );

    let converter = ScanConverter::new(transform, config.convert);
    let (image, report) = converter.convert(&source).map_err(|e| e.to_string())?;

    save_grayscale(&image, &config.output.image)?;
    println!(
        "Saved {}x{} scan-converted image to {} ({:.1}% inside the sector)",
        report.output_size[0],
        report.output_size[1],
        config.output.image.display(),
        100.0 * report.coverage()
    );
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("Saved conversion report to {}", path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: scan_convert <config.json>".to_string()
}
