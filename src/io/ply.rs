//! ASCII PLY I/O for point clouds and boundary meshes.
//!
//! Point clouds are written with positions only:
//! ```text
//! ply
//! format ascii 1.0
//! element vertex <N>
//! property float x
//! property float y
//! property float z
//! end_header
//! <x> <y> <z>
//! ```
//! Coordinates use Rust's shortest round-trip float formatting. The reader accepts
//! any float formatting and ignores extra columns and trailing elements.

use crate::core::PointCloud;
use crate::hull::BoundaryMesh;
use crate::io::LoadError;
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn create_output(path: &Path) -> Result<BufWriter<File>, LoadError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Write a point cloud as ASCII PLY to any writer.
pub fn write_point_ply<W: Write>(cloud: &PointCloud, mut out: W) -> Result<(), LoadError> {
    // Write PLY header
    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {}", cloud.len())?;
    writeln!(out, "property float x")?;
    writeln!(out, "property float y")?;
    writeln!(out, "property float z")?;
    writeln!(out, "end_header")?;

    // Write vertex data
    for p in cloud {
        writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
    }

    out.flush()?;
    Ok(())
}

/// Save a point cloud to `path`, creating parent directories as needed.
///
/// An empty cloud still produces a valid file with `element vertex 0`.
pub fn save_point_ply(cloud: &PointCloud, path: &Path) -> Result<(), LoadError> {
    write_point_ply(cloud, create_output(path)?)?;
    log::info!("wrote {} ({} points)", path.display(), cloud.len());
    Ok(())
}

/// Save a boundary mesh as ASCII PLY with a face element.
pub fn save_mesh_ply(mesh: &BoundaryMesh, path: &Path) -> Result<(), LoadError> {
    let mut out = create_output(path)?;

    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {}", mesh.vertices.len())?;
    writeln!(out, "property float x")?;
    writeln!(out, "property float y")?;
    writeln!(out, "property float z")?;
    writeln!(out, "element face {}", mesh.triangles.len())?;
    writeln!(out, "property list uchar int vertex_indices")?;
    writeln!(out, "end_header")?;

    for v in &mesh.vertices {
        writeln!(out, "{} {} {}", v.x, v.y, v.z)?;
    }
    for [a, b, c] in &mesh.triangles {
        writeln!(out, "3 {a} {b} {c}")?;
    }

    out.flush()?;
    Ok(())
}

/// Read the vertex positions of an ASCII PLY file.
///
/// Only the first three columns of each vertex line are used. The number of
/// vertex lines must match the header's `element vertex` count.
pub fn load_point_ply(path: &Path) -> Result<PointCloud, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines().enumerate();

    let invalid =
        |line: usize, msg: &str| LoadError::InvalidFormat(format!("line {}: {msg}", line + 1));

    let magic = match lines.next() {
        Some((_, line)) => line?,
        None => String::new(),
    };
    if magic.trim() != "ply" {
        return Err(LoadError::InvalidFormat("missing 'ply' magic".to_string()));
    }

    let mut vertex_count: Option<usize> = None;
    let mut ended = false;
    for (n, line) in lines.by_ref() {
        let line = line?;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("format") => {
                if words.next() != Some("ascii") {
                    return Err(invalid(n, "only ascii PLY is supported"));
                }
            }
            Some("element") => {
                if words.next() == Some("vertex") {
                    let count = words
                        .next()
                        .and_then(|c| c.parse().ok())
                        .ok_or_else(|| invalid(n, "bad vertex count"))?;
                    vertex_count = Some(count);
                }
            }
            Some("end_header") => {
                ended = true;
                break;
            }
            _ => {}
        }
    }

    if !ended {
        return Err(LoadError::InvalidFormat("missing end_header".to_string()));
    }
    let vertex_count =
        vertex_count.ok_or_else(|| LoadError::InvalidFormat("no vertex element".to_string()))?;

    let mut points = Vec::with_capacity(vertex_count);
    for (n, line) in lines {
        if points.len() == vertex_count {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let coords: Vec<f32> = line
            .split_whitespace()
            .take(3)
            .map(|w| w.parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|e| invalid(n, &format!("bad coordinate: {e}")))?;
        if coords.len() < 3 {
            return Err(invalid(n, "expected three coordinates"));
        }
        points.push(Vector3::new(coords[0], coords[1], coords[2]));
    }

    if points.len() != vertex_count {
        return Err(LoadError::InvalidFormat(format!(
            "header declares {vertex_count} vertices, found {}",
            points.len()
        )));
    }

    Ok(PointCloud::from_points(points))
}
