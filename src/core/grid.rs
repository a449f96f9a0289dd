//! Voxel occupancy grid over the cube `[-1, 1]³`.
//!
//! Storage is a flat `Vec<bool>` in `(x, y, z)` order with z varying fastest, so
//! one x-slice is a contiguous run of `G²` cells. Carving hands out those slices
//! to workers.
//!
//! Flags only ever go from occupied to empty.

use crate::core::math::unit_linspace;
use nalgebra::Vector3;

/// A `G×G×G` grid of occupancy flags, initially all occupied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    resolution: usize,
    occupancy: Vec<bool>,
}

impl VoxelGrid {
    /// Create a fully occupied grid with `resolution` voxels per axis.
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            occupancy: vec![true; resolution * resolution * resolution],
        }
    }

    /// Voxels per axis (`G`).
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Total number of cells (`G³`).
    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    /// Number of cells in one x-slice (`G²`).
    pub fn slice_len(&self) -> usize {
        self.resolution * self.resolution
    }

    /// Flat index of `(ix, iy, iz)`.
    pub fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.resolution + iy) * self.resolution + iz
    }

    /// Inverse of [`VoxelGrid::index`].
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        let g = self.resolution;
        (index / (g * g), (index / g) % g, index % g)
    }

    /// World coordinate of grid index `i` along any axis.
    pub fn axis_coordinate(&self, i: usize) -> f64 {
        unit_linspace(i, self.resolution)
    }

    /// World-space center of voxel `(ix, iy, iz)`.
    pub fn center(&self, ix: usize, iy: usize, iz: usize) -> Vector3<f64> {
        Vector3::new(
            self.axis_coordinate(ix),
            self.axis_coordinate(iy),
            self.axis_coordinate(iz),
        )
    }

    pub fn is_occupied(&self, ix: usize, iy: usize, iz: usize) -> bool {
        self.occupancy[self.index(ix, iy, iz)]
    }

    /// Mark a voxel empty. There is no way to set it back.
    pub fn clear(&mut self, ix: usize, iy: usize, iz: usize) {
        let i = self.index(ix, iy, iz);
        self.occupancy[i] = false;
    }

    /// Number of occupied voxels.
    pub fn occupied_count(&self) -> usize {
        self.occupancy.iter().filter(|&&o| o).count()
    }

    /// Raw occupancy flags in traversal order.
    pub fn occupancy(&self) -> &[bool] {
        &self.occupancy
    }

    /// Grid indices of occupied voxels in traversal order (x, then y, then z).
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.occupancy
            .iter()
            .enumerate()
            .filter(|(_, &o)| o)
            .map(move |(i, _)| self.coords(i))
    }

    /// Mutable x-slices, for carving. Each chunk is `G²` cells of one `ix`.
    pub(crate) fn slices_mut(&mut self) -> std::slice::ChunksMut<'_, bool> {
        let len = self.slice_len().max(1);
        self.occupancy.chunks_mut(len)
    }

    pub(crate) fn occupancy_mut(&mut self) -> &mut [bool] {
        &mut self.occupancy
    }
}
