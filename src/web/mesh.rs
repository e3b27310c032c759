//! Staggered hex-packed web mesh: vertex layout and triangulation.

use bytemuck::{Pod, Zeroable};
use rand::Rng;

use crate::error::{try_with_capacity, WebError};
use crate::params::InitialHeights;

const SQRT_3: f32 = 1.732_050_8;

/// Vertex data for the web mesh (position only, z is the wave height)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

/// Parity of a grid row; odd rows are shifted right by half a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowParity {
    Even,
    Odd,
}

/// Grid dimensions in vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub width: usize,
    pub height: usize,
}

impl GridDims {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Fewer than two rows or columns: no triangles
    pub fn is_degenerate(&self) -> bool {
        self.width < 2 || self.height < 2
    }

    pub fn vertex_count(&self) -> usize {
        self.width * self.height
    }

    /// `6 * (width - 1) * (height - 1)`, or 0 for a degenerate grid
    pub fn index_count(&self) -> usize {
        if self.is_degenerate() {
            0
        } else {
            6 * (self.width - 1) * (self.height - 1)
        }
    }

    pub fn row(&self, index: usize) -> usize {
        index / self.width
    }

    pub fn col(&self, index: usize) -> usize {
        index % self.width
    }

    pub fn parity(&self, row: usize) -> RowParity {
        if row % 2 == 1 {
            RowParity::Odd
        } else {
            RowParity::Even
        }
    }

    /// Vertex and index counts, or an error if either overflows or a vertex
    /// index would not fit the `u32` index buffer.
    pub fn checked_counts(&self) -> Result<(usize, usize), WebError> {
        let too_large = WebError::GridTooLarge {
            width: self.width,
            height: self.height,
        };
        let vertices = self
            .width
            .checked_mul(self.height)
            .ok_or_else(|| too_large.clone())?;
        if vertices > u32::MAX as usize {
            return Err(too_large);
        }
        let indices = if self.is_degenerate() {
            0
        } else {
            (self.width - 1)
                .checked_mul(self.height - 1)
                .and_then(|cells| cells.checked_mul(6))
                .ok_or(too_large)?
        };
        Ok((vertices, indices))
    }
}

/// Planar placement of the hex-packed rows
#[derive(Debug, Clone, Copy)]
struct HexLayout {
    side: f32,
    row_spacing: f32,
    offset_y: f32,
}

impl HexLayout {
    fn new(dims: GridDims) -> Self {
        // Fit the width into [-1, 1] unless the rows would run out of room first
        let side = (2.0 / (dims.width as f32 - 0.5)).min(4.0 * SQRT_3 / (dims.height as f32 - 1.0));
        let row_spacing = side * SQRT_3 / 2.0;
        let offset_y = (dims.height as f32 - 1.0) * row_spacing / 2.0;
        Self {
            side,
            row_spacing,
            offset_y,
        }
    }

    fn position(&self, row: usize, col: usize) -> [f32; 2] {
        let mut x = col as f32 * self.side - 1.0;
        if row % 2 == 1 {
            x += self.side / 2.0;
        }
        let y = row as f32 * self.row_spacing - self.offset_y;
        [x, y]
    }
}

/// Generate the vertex field for a `width x height` web.
///
/// x and y depend only on the grid dimensions; z follows `initial_heights`
/// and is the only value that consumes randomness.
pub fn generate_vertices<R: Rng>(
    dims: GridDims,
    initial_heights: InitialHeights,
    rng: &mut R,
) -> Result<Vec<Vertex>, WebError> {
    let (count, _) = dims.checked_counts()?;
    if let InitialHeights::Randomized { amplitude } = initial_heights {
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(WebError::InvalidParams(format!(
                "initial amplitude must be finite and non-negative, got {}",
                amplitude
            )));
        }
    }

    let layout = HexLayout::new(dims);
    let mut vertices = try_with_capacity("vertex", count)?;

    for i in 0..count {
        let [x, y] = layout.position(dims.row(i), dims.col(i));
        let z = match initial_heights {
            InitialHeights::Flat => 0.0,
            InitialHeights::Randomized { amplitude } if amplitude > 0.0 => {
                rng.gen_range(-amplitude..amplitude)
            }
            InitialHeights::Randomized { .. } => 0.0,
        };
        vertices.push(Vertex {
            position: [x, y, z],
        });
    }

    Ok(vertices)
}

/// Two triangles covering the cell whose top-left corner is `v`.
///
/// The diagonal follows the row offset so every triangle stays equilateral.
fn cell_triangles(parity: RowParity, v: u32, width: u32) -> [u32; 6] {
    let below = v + width;
    match parity {
        RowParity::Even => [v, below, v + 1, v + 1, below, below + 1],
        RowParity::Odd => [v, below, below + 1, v, below + 1, v + 1],
    }
}

/// Generate the triangle index buffer for a `width x height` web.
///
/// Degenerate grids produce an empty buffer.
pub fn generate_indices(dims: GridDims) -> Result<Vec<u32>, WebError> {
    let (vertex_count, index_count) = dims.checked_counts()?;
    let mut indices = try_with_capacity("index", index_count)?;
    if dims.is_degenerate() {
        return Ok(indices);
    }

    // Last row has nothing below it, last column has nothing to its right
    for v in 0..vertex_count - dims.width {
        if (v + 1) % dims.width == 0 {
            continue;
        }
        let parity = dims.parity(dims.row(v));
        indices.extend_from_slice(&cell_triangles(parity, v as u32, dims.width as u32));
    }

    debug_assert_eq!(indices.len(), index_count);
    Ok(indices)
}

/// Web mesh: vertex field plus its immutable triangulation
pub struct WebMesh {
    pub dims: GridDims,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl WebMesh {
    /// Build the mesh once, sized exactly for `dims`
    pub fn new<R: Rng>(
        dims: GridDims,
        initial_heights: InitialHeights,
        rng: &mut R,
    ) -> Result<Self, WebError> {
        let vertices = generate_vertices(dims, initial_heights, rng)?;
        let indices = generate_indices(dims)?;
        Ok(Self {
            dims,
            vertices,
            indices,
        })
    }

    /// Current z of every vertex, in vertex order
    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.vertices.iter().map(|v| v.position[2])
    }

    /// Copy a height field into the vertex z components
    pub fn set_heights(&mut self, heights: &[f32]) {
        for (vertex, &z) in self.vertices.iter_mut().zip(heights) {
            vertex.position[2] = z;
        }
    }

    /// Vertex field as `3 * width * height` packed floats
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}
