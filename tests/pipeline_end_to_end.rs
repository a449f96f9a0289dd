//! Full runs: synthetic photos on disk -> silhouettes -> carving -> PLY.

use image::{GrayImage, Luma};
use std::fs;
use std::path::{Path, PathBuf};
use vhull_rs::io::{image_path, load_point_ply, mask_path};
use vhull_rs::pipeline::{export, reconstruct};
use vhull_rs::{LoadError, ReconstructError, ReconstructionConfig, ReconstructionStatus};

/// Fresh, empty scratch folder under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vhull_rs_e2e_{name}"));
    fs::remove_dir_all(&dir).ok();
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A dark ball on a light backdrop, as every ring camera would see it.
fn write_ball_photo(path: &Path) {
    let img = GrayImage::from_fn(64, 64, |x, y| {
        let dx = x as f32 - 32.0;
        let dy = y as f32 - 32.0;
        if dx * dx + dy * dy <= 16.0 * 16.0 {
            Luma([25])
        } else {
            Luma([225])
        }
    });
    img.save(path).unwrap();
}

fn config_for(dir: &Path) -> ReconstructionConfig {
    ReconstructionConfig {
        grid_resolution: 16,
        image_count: 8,
        images_dir: dir.to_path_buf(),
        output: dir.join("out").join("result_visual_hull.ply"),
        ..Default::default()
    }
}

#[test]
fn test_eight_photos_to_ply() {
    let dir = scratch_dir("full");
    for k in 1..=8 {
        write_ball_photo(&image_path(&dir, k));
    }
    let config = config_for(&dir);

    let result = reconstruct(&config).unwrap();
    assert_eq!(result.status(), ReconstructionStatus::Populated);
    assert_eq!(result.views_used, 8);
    assert!(result.skipped.is_empty());
    assert_eq!(result.stats.total, 16 * 16 * 16);
    assert_eq!(result.stats.surviving, result.points.len());
    assert!(result.points.len() < 16 * 16 * 16);

    let bounds = result.points.bounds().unwrap();
    assert!(bounds.extent().max() < 1.6);

    export(&result, &config).unwrap();
    let loaded = load_point_ply(&config.output).unwrap();
    assert_eq!(loaded.len(), result.points.len());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_and_corrupt_photos_are_skipped() {
    let dir = scratch_dir("partial");
    for k in [1, 2, 4, 6, 7, 8] {
        write_ball_photo(&image_path(&dir, k));
    }
    // 03 exists but is not a PNG; 05 is missing
    fs::write(image_path(&dir, 3), b"definitely not a png").unwrap();

    let result = reconstruct(&config_for(&dir)).unwrap();
    assert_eq!(result.views_used, 6);

    let skipped: Vec<usize> = result.skipped.iter().map(|s| s.number).collect();
    assert_eq!(skipped, vec![3, 5]);
    assert!(result.skipped[1].path.ends_with("05.png"));

    assert_eq!(result.status(), ReconstructionStatus::Populated);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_fewer_views_keep_at_least_as_much() {
    let dir = scratch_dir("subset");
    for k in 1..=8 {
        write_ball_photo(&image_path(&dir, k));
    }
    let full = reconstruct(&config_for(&dir)).unwrap();

    fs::remove_file(image_path(&dir, 2)).unwrap();
    fs::remove_file(image_path(&dir, 7)).unwrap();
    let partial = reconstruct(&config_for(&dir)).unwrap();

    assert_eq!(partial.views_used, 6);
    assert!(partial.points.len() >= full.points.len());
    for (ix, iy, iz) in full.grid.occupied() {
        assert!(partial.grid.is_occupied(ix, iy, iz));
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_folder_is_no_images() {
    let dir = scratch_dir("empty");

    let err = reconstruct(&config_for(&dir)).unwrap_err();
    assert!(
        matches!(err, ReconstructError::Load(LoadError::NoImages { .. })),
        "got {err:?}"
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_only_corrupt_files_is_no_readable_images() {
    let dir = scratch_dir("corrupt");
    fs::write(image_path(&dir, 1), b"garbage").unwrap();
    fs::write(image_path(&dir, 4), b"more garbage").unwrap();

    let err = reconstruct(&config_for(&dir)).unwrap_err();
    match err {
        ReconstructError::Load(LoadError::NoReadableImages { attempted, .. }) => {
            assert_eq!(attempted, 2)
        }
        other => panic!("unexpected error: {other:?}"),
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_blank_photos_give_empty_result_and_valid_file() {
    let dir = scratch_dir("blank");
    for k in 1..=8 {
        GrayImage::from_pixel(32, 32, Luma([128]))
            .save(image_path(&dir, k))
            .unwrap();
    }
    let config = config_for(&dir);

    let result = reconstruct(&config).unwrap();
    assert_eq!(result.status(), ReconstructionStatus::Empty);
    assert!(result.is_empty());

    export(&result, &config).unwrap();
    let contents = fs::read_to_string(&config.output).unwrap();
    assert!(contents.contains("element vertex 0"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_boundary_export() {
    let dir = scratch_dir("boundary");
    for k in 1..=8 {
        write_ball_photo(&image_path(&dir, k));
    }
    let config = ReconstructionConfig {
        boundary: true,
        boundary_output: Some(dir.join("hull.obj")),
        ..config_for(&dir)
    };

    let result = reconstruct(&config).unwrap();
    let mesh = result.boundary.as_ref().expect("boundary should be computed");
    assert!(mesh.triangle_count() >= 4);
    assert!(mesh.volume() > 0.0);

    export(&result, &config).unwrap();
    let obj = fs::read_to_string(dir.join("hull.obj")).unwrap();
    assert!(obj.lines().any(|l| l.starts_with("f ")));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_unwritable_output_is_an_io_error() {
    let dir = scratch_dir("unwritable");
    for k in 1..=8 {
        write_ball_photo(&image_path(&dir, k));
    }
    // A regular file standing where the output folder should be
    let blocker = dir.join("not_a_dir");
    fs::write(&blocker, b"").unwrap();
    let config = ReconstructionConfig {
        output: blocker.join("result.ply"),
        ..config_for(&dir)
    };

    let result = reconstruct(&config).unwrap();
    let err = export(&result, &config).unwrap_err();
    assert!(
        matches!(err, ReconstructError::Load(LoadError::Io(_))),
        "got {err:?}"
    );
    assert!(!config.output.exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_silhouettes_are_dumped_per_view() {
    let dir = scratch_dir("dump");
    for k in [1, 2, 3, 5] {
        write_ball_photo(&image_path(&dir, k));
    }
    let masks = dir.join("masks");
    let config = ReconstructionConfig {
        image_count: 5,
        silhouette_dump: Some(masks.clone()),
        ..config_for(&dir)
    };

    let result = reconstruct(&config).unwrap();
    assert_eq!(result.views_used, 4);

    // Masks keep the image numbering; the missing 04 has none
    for k in [1, 2, 3, 5] {
        let mask = image::open(mask_path(&masks, k)).unwrap().to_luma8();
        assert_eq!(mask.dimensions(), (64, 64));
        assert_eq!(mask.get_pixel(32, 32)[0], 255);
        assert_eq!(mask.get_pixel(1, 1)[0], 0);
    }
    assert!(!mask_path(&masks, 4).exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_invalid_config_is_rejected_before_loading() {
    let dir = scratch_dir("invalid");
    let config = ReconstructionConfig {
        grid_resolution: 0,
        ..config_for(&dir)
    };

    let err = reconstruct(&config).unwrap_err();
    assert!(matches!(err, ReconstructError::InvalidConfig(_)));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_config_file_round_trip() {
    let dir = scratch_dir("config");
    let path = dir.join("run.json");
    fs::write(
        &path,
        r#"{
            "grid_resolution": 12,
            "image_count": 6,
            "images_dir": "photos",
            "parallel": false,
            "silhouette": { "close_iterations": 3 }
        }"#,
    )
    .unwrap();

    let config = ReconstructionConfig::from_json_file(&path).unwrap();
    assert_eq!(config.grid_resolution, 12);
    assert_eq!(config.image_count, 6);
    assert_eq!(config.images_dir, PathBuf::from("photos"));
    assert!(!config.parallel);
    assert_eq!(config.silhouette.close_iterations, 3);
    assert_eq!(config.silhouette.kernel_size, 5);
    assert_eq!(config.camera_ring().count, 6);

    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(ReconstructionConfig::from_json_str(&json).unwrap(), config);

    fs::remove_dir_all(&dir).ok();
}
