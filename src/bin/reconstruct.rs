//! vhull-reconstruct: Carve a visual hull from numbered photos and export it as PLY
//!
//! Usage:
//!   vhull-reconstruct --images scan_images --num-images 8 --grid-size 40 --output hull.ply

use anyhow::{bail, Context};
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;
use vhull_rs::pipeline::{export, reconstruct_with_carver};
use vhull_rs::{ReconstructionConfig, ReconstructionStatus, VoxelCarver};

fn value<T>(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args.next().with_context(|| format!("Missing value for {flag}"))?;
    raw.parse().with_context(|| format!("Invalid value for {flag}: {raw}"))
}

fn parse_args() -> anyhow::Result<Option<ReconstructionConfig>> {
    let raw: Vec<String> = std::env::args().skip(1).collect();

    // A config file, if given, is the base; later flags override it.
    let mut config = match raw.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = raw.get(i + 1).context("Missing value for --config")?;
            ReconstructionConfig::from_json_file(&PathBuf::from(path))
                .with_context(|| format!("Failed to read config {path}"))?
        }
        None => ReconstructionConfig::default(),
    };

    let mut args = raw.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                args.next();
            }
            "--grid-size" | "--grid_size" => config.grid_resolution = value(&mut args, &arg)?,
            "--num-images" | "--num_images" => config.image_count = value(&mut args, &arg)?,
            "--images" | "--images-folder" => config.images_dir = value(&mut args, &arg)?,
            "--output" | "--out" => config.output = value(&mut args, &arg)?,
            "--radius" => config.camera_radius = value(&mut args, &arg)?,
            "--focal-scale" => config.focal_scale = value(&mut args, &arg)?,
            "--kernel" => config.silhouette.kernel_size = value(&mut args, &arg)?,
            "--close-iters" => config.silhouette.close_iterations = value(&mut args, &arg)?,
            "--no-blur" => config.silhouette.blur = false,
            "--sequential" => config.parallel = false,
            "--dump-silhouettes" => config.silhouette_dump = Some(value(&mut args, &arg)?),
            "--boundary" => config.boundary = true,
            "--boundary-out" => {
                config.boundary = true;
                config.boundary_output = Some(value(&mut args, &arg)?);
            }
            "--display" => config.display = true,
            "--no-display" => config.display = false,
            "--viewer" => {
                config.viewer = Some(value(&mut args, &arg)?);
                config.display = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            other => {
                print_help();
                bail!("Unknown argument: {other}");
            }
        }
    }

    Ok(Some(config))
}

fn launch_viewer(config: &ReconstructionConfig) {
    let Some(viewer) = &config.viewer else {
        log::warn!("--display requested but no --viewer command configured");
        return;
    };
    match Command::new(viewer).arg(&config.output).spawn() {
        Ok(_) => log::info!("opened {} in {viewer}", config.output.display()),
        Err(e) => log::warn!("could not launch viewer '{viewer}': {e}"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(config) = parse_args()? else {
        return Ok(());
    };

    log::info!("vhull-reconstruct v{}", vhull_rs::VERSION);
    log::info!(
        "grid {}³, {} images from {}",
        config.grid_resolution,
        config.image_count,
        config.images_dir.display()
    );

    let carver = if config.parallel {
        VoxelCarver::new()
    } else {
        VoxelCarver::sequential()
    };
    let carver = carver.with_progress(|p| {
        if p.slices_done % 10 == 0 || p.slices_done == p.slices_total {
            log::info!("carving: {}/{} slices", p.slices_done, p.slices_total);
        }
    });

    let result = reconstruct_with_carver(&config, &carver).context("Reconstruction failed")?;

    for skipped in &result.skipped {
        log::warn!(
            "image {:02} not used ({}): {}",
            skipped.number,
            skipped.path.display(),
            skipped.reason
        );
    }

    export(&result, &config).context("Export failed")?;

    match result.status() {
        ReconstructionStatus::Populated => log::info!(
            "done: {} points from {} views -> {}",
            result.points.len(),
            result.views_used,
            config.output.display()
        ),
        ReconstructionStatus::Empty => log::warn!(
            "done, but no voxels survived; check silhouettes, camera radius and focal scale"
        ),
    }

    if config.display {
        launch_viewer(&config);
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"vhull-reconstruct: Visual hull reconstruction from numbered photographs

USAGE:
    vhull-reconstruct [OPTIONS]

INPUT / OUTPUT:
    --config PATH            JSON config file (flags below override it)
    --images DIR             Folder with 01.png, 02.png, ... [default: scan_images]
    --num-images N           Number of images / ring cameras [default: 8]
    --output PATH            Output PLY [default: scan_images/result_visual_hull.ply]

RECONSTRUCTION:
    --grid-size G            Voxels per axis [default: 40]
    --radius R               Camera circle radius [default: 2.5]
    --focal-scale F          Focal length as a multiple of image width [default: 1.2]
    --kernel K               Elliptical morphology kernel size, odd [default: 5]
    --close-iters N          Closing passes [default: 2]
    --no-blur                Skip the 5x5 Gaussian before thresholding
    --sequential             Carve on one thread
    --dump-silhouettes DIR   Write each view's mask as NN_mask.png

EXTRAS:
    --boundary               Compute the convex-hull boundary (logged only)
    --boundary-out PATH      ... and write it (.obj or .ply)
    --viewer CMD             Open the output with CMD afterwards
    --display / --no-display Toggle the viewer [default: off]
    --help, -h               Print this help message

LOGGING:
    Set RUST_LOG=debug for per-view silhouette statistics and per-slice progress.
"#
    );
}
