//! OBJ format export for boundary meshes.
//!
//! OBJ is a simple text-based mesh format widely supported by 3D tools:
//! ```text
//! v x y z           # Vertex positions
//! f i j k           # Faces (triangles, 1-based indices)
//! ```

use crate::hull::BoundaryMesh;
use crate::io::LoadError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Save a boundary mesh to OBJ format.
pub fn save_obj(mesh: &BoundaryMesh, path: &Path) -> Result<(), LoadError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "# visual hull boundary")?;
    writeln!(
        out,
        "# {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangles.len()
    )?;
    for v in &mesh.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for [a, b, c] in &mesh.triangles {
        writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    out.flush()?;
    Ok(())
}
