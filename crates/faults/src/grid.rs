//! Grid collaborator.
//!
//! The fault code never owns a grid; it holds `&dyn Grid` and asks it for
//! dimensions, node coordinates and cell indices. `RectGrid` is a regular
//! box grid used by the CLI and the tests.

use std::fmt::Debug;

use nalgebra::Vector3;

/// Read-only view of a corner-point grid.
///
/// Nodes (pillar corners) are addressed by `(i, j)` with `0 <= i <= nx`,
/// `0 <= j <= ny`; cells by `(i, j, k)` with `i < nx`, `j < ny`, `k < nz`.
pub trait Grid: Debug {
    fn nx(&self) -> usize;
    fn ny(&self) -> usize;
    fn nz(&self) -> usize;

    /// Coordinates of node `(i, j)` on top of layer `k`.
    fn node_xyz(&self, i: usize, j: usize, k: usize) -> Vector3<f64>;

    /// Global (natural ordering) index of cell `(i, j, k)`.
    fn global_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.nx() + k * self.nx() * self.ny()
    }

    /// Active index of cell `(i, j, k)`; `None` for inactive cells.
    fn active_index(&self, i: usize, j: usize, k: usize) -> Option<usize>;

    /// Cell center as the mean of its eight nodes.
    fn cell_center(&self, i: usize, j: usize, k: usize) -> Vector3<f64> {
        let mut sum = Vector3::zeros();
        for dk in 0..2 {
            for dj in 0..2 {
                for di in 0..2 {
                    sum += self.node_xyz(i + di, j + dj, k + dk);
                }
            }
        }
        sum / 8.0
    }

    /// Node coordinates for a corner-lattice index `corner = i + j*(nx+1)`.
    fn corner_xyz(&self, corner: usize, k: usize) -> Vector3<f64> {
        let stride = self.nx() + 1;
        self.node_xyz(corner % stride, corner / stride, k)
    }
}

/// Regular rectangular grid with constant cell sizes; every cell active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectGrid {
    dims: (usize, usize, usize),
    cell: (f64, f64, f64),
}

impl RectGrid {
    pub fn new(dims: (usize, usize, usize), cell: (f64, f64, f64)) -> Self {
        Self { dims, cell }
    }

    /// Unit cells.
    pub fn unit(dims: (usize, usize, usize)) -> Self {
        Self::new(dims, (1.0, 1.0, 1.0))
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    pub fn global_size(&self) -> usize {
        self.dims.0 * self.dims.1 * self.dims.2
    }
}

impl Grid for RectGrid {
    fn nx(&self) -> usize {
        self.dims.0
    }

    fn ny(&self) -> usize {
        self.dims.1
    }

    fn nz(&self) -> usize {
        self.dims.2
    }

    fn node_xyz(&self, i: usize, j: usize, k: usize) -> Vector3<f64> {
        Vector3::new(
            i as f64 * self.cell.0,
            j as f64 * self.cell.1,
            k as f64 * self.cell.2,
        )
    }

    fn active_index(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        Some(self.global_index(i, j, k))
    }
}
