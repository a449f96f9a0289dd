//! QuickHull for 3D point sets.
//!
//! 1. Build a starting tetrahedron from extreme points
//! 2. Give every remaining point to the first face it lies outside of
//! 3. Repeatedly take the farthest outside point of some face, delete every face
//!    that point can see, and stitch the horizon to it with new faces
//! 4. Points that end up outside no face are interior and dropped
//!
//! Faces are wound counter-clockwise seen from outside, so normals point out.
//! Lattice inputs (voxel centers) are full of coplanar points; anything within
//! `eps` of a face plane counts as inside that face.

use crate::hull::{BoundaryError, BoundaryMesh};
use nalgebra::Vector3;
use std::collections::{HashMap, HashSet};

struct Face {
    verts: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
    outside: Vec<usize>,
    alive: bool,
}

impl Face {
    fn new(points: &[Vector3<f64>], verts: [usize; 3]) -> Self {
        let [a, b, c] = verts.map(|i| points[i]);
        let normal = (b - a).cross(&(c - a)).normalize();
        Self {
            verts,
            normal,
            offset: normal.dot(&a),
            outside: Vec::new(),
            alive: true,
        }
    }

    fn distance(&self, p: &Vector3<f64>) -> f64 {
        self.normal.dot(p) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.verts;
        [(a, b), (b, c), (c, a)]
    }
}

struct Hull<'a> {
    points: &'a [Vector3<f64>],
    faces: Vec<Face>,
    eps: f64,
}

impl<'a> Hull<'a> {
    fn new(points: &'a [Vector3<f64>]) -> Self {
        let scale = points
            .iter()
            .fold(0.0f64, |m, p| m.max(p.x.abs()).max(p.y.abs()).max(p.z.abs()))
            .max(1.0);
        Self {
            points,
            faces: Vec::new(),
            eps: 1e-9 * scale,
        }
    }

    fn initial_simplex(&self) -> Result<[usize; 4], BoundaryError> {
        let pts = self.points;

        // Extreme points along each axis
        let mut extremes = [0usize; 6];
        for (i, p) in pts.iter().enumerate() {
            for axis in 0..3 {
                if p[axis] < pts[extremes[2 * axis]][axis] {
                    extremes[2 * axis] = i;
                }
                if p[axis] > pts[extremes[2 * axis + 1]][axis] {
                    extremes[2 * axis + 1] = i;
                }
            }
        }

        let mut best = (0.0, 0, 0);
        for &i in &extremes {
            for &j in &extremes {
                let d = (pts[i] - pts[j]).norm();
                if d > best.0 {
                    best = (d, i, j);
                }
            }
        }
        let (span, a, b) = best;
        if span <= self.eps {
            return Err(BoundaryError::Degenerate);
        }

        let dir = (pts[b] - pts[a]) / span;
        let (line_dist, c) = pts
            .iter()
            .enumerate()
            .map(|(i, p)| ((p - pts[a]).cross(&dir).norm(), i))
            .fold((0.0, 0), |acc, x| if x.0 > acc.0 { x } else { acc });
        if line_dist <= self.eps {
            return Err(BoundaryError::Degenerate);
        }

        let n = (pts[b] - pts[a]).cross(&(pts[c] - pts[a])).normalize();
        let (plane_dist, d) = pts
            .iter()
            .enumerate()
            .map(|(i, p)| (n.dot(&(p - pts[a])).abs(), i))
            .fold((0.0, 0), |acc, x| if x.0 > acc.0 { x } else { acc });
        if plane_dist <= self.eps {
            return Err(BoundaryError::Degenerate);
        }

        Ok([a, b, c, d])
    }

    fn build(&mut self) -> Result<(), BoundaryError> {
        let simplex = self.initial_simplex()?;
        let [a, b, c, d] = simplex;

        for (tri, opposite) in [([a, b, c], d), ([a, c, d], b), ([a, d, b], c), ([b, d, c], a)] {
            let mut face = Face::new(self.points, tri);
            if face.distance(&self.points[opposite]) > 0.0 {
                face = Face::new(self.points, [tri[0], tri[2], tri[1]]);
            }
            self.faces.push(face);
        }

        let first_faces: Vec<usize> = (0..4).collect();
        let candidates: Vec<usize> = (0..self.points.len())
            .filter(|i| !simplex.contains(i))
            .collect();
        self.assign(candidates, &first_faces);

        // Only freshly created faces ever gain outside points, so every face
        // with work enters this list exactly once.
        let mut pending: Vec<usize> = first_faces
            .into_iter()
            .filter(|&fi| !self.faces[fi].outside.is_empty())
            .collect();

        while let Some(fi) = pending.pop() {
            if !self.faces[fi].alive {
                continue;
            }
            let Some(apex) = self.farthest_outside(fi) else {
                continue;
            };
            let created = self.add_point(apex);
            pending.extend(
                created
                    .into_iter()
                    .filter(|&nf| !self.faces[nf].outside.is_empty()),
            );
        }

        Ok(())
    }

    /// Hand each point to the first of `faces` it lies outside; drop the rest.
    fn assign(&mut self, candidates: Vec<usize>, faces: &[usize]) {
        for p in candidates {
            let point = self.points[p];
            if let Some(&fi) = faces
                .iter()
                .find(|&&fi| self.faces[fi].distance(&point) > self.eps)
            {
                self.faces[fi].outside.push(p);
            }
        }
    }

    fn farthest_outside(&self, fi: usize) -> Option<usize> {
        let face = &self.faces[fi];
        face.outside.iter().copied().max_by(|&i, &j| {
            face.distance(&self.points[i])
                .total_cmp(&face.distance(&self.points[j]))
        })
    }

    /// Replace the faces `apex` can see with a cone to it. Returns the new faces.
    fn add_point(&mut self, apex: usize) -> Vec<usize> {
        let p = self.points[apex];

        let visible: Vec<usize> = self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.alive && f.distance(&p) > self.eps)
            .map(|(i, _)| i)
            .collect();

        let visible_edges: HashSet<(usize, usize)> = visible
            .iter()
            .flat_map(|&fi| self.faces[fi].edges())
            .collect();

        // An edge is on the horizon when its twin belongs to a face that stays.
        let horizon: Vec<(usize, usize)> = visible
            .iter()
            .flat_map(|&fi| self.faces[fi].edges())
            .filter(|&(u, v)| !visible_edges.contains(&(v, u)))
            .collect();

        let mut orphans = Vec::new();
        for &fi in &visible {
            let face = &mut self.faces[fi];
            face.alive = false;
            orphans.extend(face.outside.drain(..).filter(|&i| i != apex));
        }

        let mut new_faces = Vec::with_capacity(horizon.len());
        for (u, v) in horizon {
            new_faces.push(self.faces.len());
            self.faces.push(Face::new(self.points, [u, v, apex]));
        }

        self.assign(orphans, &new_faces);
        new_faces
    }

    fn into_mesh(self) -> BoundaryMesh {
        let mut remap: HashMap<usize, u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();

        for face in self.faces.iter().filter(|f| f.alive) {
            let tri = face.verts.map(|v| {
                *remap.entry(v).or_insert_with(|| {
                    vertices.push(self.points[v].cast::<f32>());
                    (vertices.len() - 1) as u32
                })
            });
            triangles.push(tri);
        }

        BoundaryMesh {
            vertices,
            triangles,
        }
    }
}

/// Convex hull of `points` as a closed triangle mesh.
pub fn quickhull(points: &[Vector3<f32>]) -> Result<BoundaryMesh, BoundaryError> {
    let points: Vec<Vector3<f64>> = points
        .iter()
        .filter(|p| p.iter().all(|v| v.is_finite()))
        .map(|p| p.cast::<f64>())
        .collect();

    if points.len() < 4 {
        return Err(BoundaryError::InsufficientPoints(points.len()));
    }

    let mut hull = Hull::new(&points);
    hull.build()?;
    Ok(hull.into_mesh())
}
