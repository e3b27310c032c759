//! Explicit second-order integrator for the web height field.
//!
//! Each step reads a consistent snapshot of the pre-step heights and writes
//! the new heights elsewhere; `WaveField` rotates three owned buffers so the
//! commit is a pair of swaps.

use rand::Rng;

use super::mesh::{GridDims, RowParity};
use crate::error::{try_with_capacity, WebError};
use crate::params::WaveParams;

/// (row, col) offsets of the springs on each side of an even-row vertex
const EVEN_ROW_LEFT: [(isize, isize); 3] = [(0, -1), (-1, -1), (1, -1)];
const EVEN_ROW_RIGHT: [(isize, isize); 3] = [(0, 1), (-1, 0), (1, 0)];

/// Odd rows sit half a cell to the right, so their diagonals lean right
const ODD_ROW_LEFT: [(isize, isize); 3] = [(0, -1), (-1, 0), (1, 0)];
const ODD_ROW_RIGHT: [(isize, isize); 3] = [(0, 1), (-1, 1), (1, 1)];

/// Indices of the springs attached to `index`; missing slots are `None`.
///
/// Springs are grouped by horizontal side: a vertex in the first column has
/// no left group and one in the last column no right group, so edge vertices
/// also lose the vertical neighbour that belongs to the missing side. The
/// relation is therefore not symmetric at the left and right edges.
pub fn neighbors(dims: GridDims, index: usize) -> [Option<usize>; 6] {
    let row = dims.row(index);
    let col = dims.col(index);
    let (left, right) = match dims.parity(row) {
        RowParity::Even => (EVEN_ROW_LEFT, EVEN_ROW_RIGHT),
        RowParity::Odd => (ODD_ROW_LEFT, ODD_ROW_RIGHT),
    };

    let side = |offsets: [(isize, isize); 3], present: bool| {
        offsets.map(|(dr, dc)| {
            if !present {
                return None;
            }
            let r = row.checked_add_signed(dr).filter(|&r| r < dims.height)?;
            let c = col.checked_add_signed(dc).filter(|&c| c < dims.width)?;
            Some(r * dims.width + c)
        })
    };

    let [l0, l1, l2] = side(left, col > 0);
    let [r0, r1, r2] = side(right, col + 1 < dims.width);
    [l0, l1, l2, r0, r1, r2]
}

/// Sum of `z[n] - z[index]` over the neighbours of `index`.
///
/// Positive when the neighbours sit above the vertex.
pub fn spring_pull(dims: GridDims, heights: &[f32], index: usize) -> f32 {
    let z = heights[index];
    neighbors(dims, index)
        .into_iter()
        .flatten()
        .map(|n| -(z - heights[n]))
        .sum()
}

/// Force law on vertex `index`: neighbour springs, restoring pull and damping.
pub fn net_force(
    params: &WaveParams,
    dims: GridDims,
    current: &[f32],
    previous: &[f32],
    index: usize,
) -> f32 {
    let z = current[index];
    params.coupling * spring_pull(dims, current, index)
        - params.restoring * z
        - params.damping * (z - previous[index])
}

/// New height of a single vertex.
///
/// `excited` holds one flag per row; a flagged row kicks its column-0 vertex
/// with `excitation_force` instead of the force law.
pub(crate) fn integrate_vertex(
    params: &WaveParams,
    dims: GridDims,
    current: &[f32],
    previous: &[f32],
    excited: &[bool],
    index: usize,
) -> f32 {
    let force = if dims.col(index) == 0 && excited[dims.row(index)] {
        params.excitation_force
    } else {
        net_force(params, dims, current, previous, index)
    };
    let dt = params.time_step;
    2.0 * current[index] - previous[index] + force * dt * dt
}

/// Write the next height field into `next`, reading only `current` and `previous`.
///
/// `excited` needs one flag per row.
pub(crate) fn integrate(
    params: &WaveParams,
    dims: GridDims,
    current: &[f32],
    previous: &[f32],
    excited: &[bool],
    next: &mut [f32],
) {
    assert_eq!(current.len(), dims.vertex_count());
    assert_eq!(previous.len(), current.len());
    assert_eq!(next.len(), current.len());
    assert!(
        excited.len() >= dims.height || current.is_empty(),
        "one excitation flag per row"
    );

    for (index, z_new) in next.iter_mut().enumerate() {
        *z_new = integrate_vertex(params, dims, current, previous, excited, index);
    }
}

/// Decide, per row, whether the left-edge vertex is kicked this step.
///
/// A zero probability draws nothing from `rng`.
pub fn draw_excitations<R: Rng>(probability: f32, rng: &mut R, excited: &mut [bool]) {
    for flag in excited.iter_mut() {
        *flag = probability > 0.0 && rng.gen::<f32>() < probability;
    }
}

/// One step over caller-owned buffers.
///
/// Takes a temporary snapshot of `current`; on return `previous` holds the
/// old `current` and `current` the new heights. Use [`WaveField`] to step
/// repeatedly without the per-call allocation.
///
/// Panics if either slice does not hold `dims.vertex_count()` heights.
pub fn step<R: Rng>(
    params: &WaveParams,
    dims: GridDims,
    current: &mut [f32],
    previous: &mut [f32],
    rng: &mut R,
) {
    let mut excited = vec![false; dims.height];
    draw_excitations(params.excitation_probability, rng, &mut excited);

    let snapshot = current.to_vec();
    integrate(params, dims, &snapshot, previous, &excited, current);
    previous.copy_from_slice(&snapshot);
}

/// Height field with its one-step history, advanced in place every frame
pub struct WaveField {
    dims: GridDims,
    params: WaveParams,
    current: Vec<f32>,
    previous: Vec<f32>,
    /// Receives the next heights; holds stale data between steps
    scratch: Vec<f32>,
    excited: Vec<bool>,
}

impl WaveField {
    /// Create a field at rest with the given initial heights.
    ///
    /// `previous` starts equal to `current`, i.e. zero initial velocity.
    pub fn new(
        dims: GridDims,
        params: WaveParams,
        initial: impl IntoIterator<Item = f32>,
    ) -> Result<Self, WebError> {
        params.validate()?;
        let (count, _) = dims.checked_counts()?;

        let mut current = try_with_capacity("height", count)?;
        current.extend(initial.into_iter().take(count));
        if current.len() != count {
            return Err(WebError::InvalidParams(format!(
                "expected {} initial heights, got {}",
                count,
                current.len()
            )));
        }

        let mut previous = try_with_capacity("previous height", count)?;
        previous.extend_from_slice(&current);

        let mut scratch = try_with_capacity("scratch height", count)?;
        scratch.resize(count, 0.0);

        let mut excited = try_with_capacity("excitation", dims.height)?;
        excited.resize(dims.height, false);

        Ok(Self {
            dims,
            params,
            current,
            previous,
            scratch,
            excited,
        })
    }

    /// Advance one step: compute into scratch, then rotate the buffers
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        draw_excitations(self.params.excitation_probability, rng, &mut self.excited);
        integrate(
            &self.params,
            self.dims,
            &self.current,
            &self.previous,
            &self.excited,
            &mut self.scratch,
        );

        // previous <- current, current <- next
        std::mem::swap(&mut self.previous, &mut self.current);
        std::mem::swap(&mut self.current, &mut self.scratch);
    }

    pub fn current(&self) -> &[f32] {
        &self.current
    }

    pub fn previous(&self) -> &[f32] {
        &self.previous
    }

    /// Largest |z| in the field
    pub fn max_amplitude(&self) -> f32 {
        self.current.iter().fold(0.0, |acc, z| acc.max(z.abs()))
    }

    /// Sum of squared heights
    pub fn energy(&self) -> f32 {
        self.current.iter().map(|z| z * z).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::mesh::generate_indices;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn neighbor_set(dims: GridDims, index: usize) -> BTreeSet<usize> {
        neighbors(dims, index).into_iter().flatten().collect()
    }

    #[test]
    fn test_interior_vertices_have_six_neighbors() {
        let dims = GridDims::new(5, 5);
        // Row 2 (even) and row 1 / 3 (odd)
        for index in [6, 7, 12, 16, 18] {
            assert_eq!(neighbor_set(dims, index).len(), 6, "vertex {}", index);
        }
        assert_eq!(
            neighbor_set(dims, 12),
            BTreeSet::from([11, 13, 6, 7, 16, 17])
        );
        assert_eq!(neighbor_set(dims, 7), BTreeSet::from([6, 8, 2, 3, 12, 13]));
    }

    #[test]
    fn test_boundary_vertices_have_fewer_neighbors() {
        let dims = GridDims::new(4, 3);
        assert_eq!(neighbor_set(dims, 0), BTreeSet::from([1, 4]));
        // Last column of an even row: no right group, so no straight-down spring
        assert_eq!(neighbor_set(dims, 3), BTreeSet::from([2, 6]));
        // First column of an odd row: no left group, so no straight up or down
        assert_eq!(neighbor_set(dims, 4), BTreeSet::from([1, 5, 9]));
        assert_eq!(neighbor_set(dims, 11), BTreeSet::from([6, 10]));
    }

    #[test]
    fn test_single_row_and_column() {
        assert_eq!(
            neighbor_set(GridDims::new(3, 1), 1),
            BTreeSet::from([0, 2])
        );
        assert!(neighbor_set(GridDims::new(1, 1), 0).is_empty());
        // A single column has neither side
        assert!(neighbor_set(GridDims::new(1, 3), 1).is_empty());
    }

    #[test]
    fn test_relation_is_symmetric_between_inner_columns() {
        let dims = GridDims::new(6, 5);
        let inner = |i: usize| dims.col(i) > 0 && dims.col(i) + 1 < dims.width;
        for i in (0..dims.vertex_count()).filter(|&i| inner(i)) {
            for j in neighbor_set(dims, i).into_iter().filter(|&j| inner(j)) {
                assert!(neighbor_set(dims, j).contains(&i), "{} -> {}", i, j);
            }
        }
        // Edge vertices drop springs their neighbours still hold
        assert!(neighbor_set(dims, 7).contains(&6));
        assert!(!neighbor_set(dims, 6).contains(&0));
        assert!(neighbor_set(dims, 1).contains(&6));
    }

    #[test]
    fn test_neighbors_follow_mesh_edges() {
        let dims = GridDims::new(7, 6);
        let indices = generate_indices(dims).unwrap();
        let mut edges = vec![BTreeSet::new(); dims.vertex_count()];
        for tri in indices.chunks(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                edges[a as usize].insert(b as usize);
                edges[b as usize].insert(a as usize);
            }
        }
        for (i, expected) in edges.iter().enumerate() {
            let springs = neighbor_set(dims, i);
            let col = dims.col(i);
            if col > 0 && col + 1 < dims.width {
                assert_eq!(&springs, expected, "vertex {}", i);
            } else {
                assert!(springs.is_subset(expected), "vertex {}", i);
            }
        }
    }

    #[test]
    #[should_panic(expected = "one excitation flag per row")]
    fn test_integrate_rejects_short_excitation_flags() {
        let dims = GridDims::new(3, 3);
        let heights = vec![0.0; 9];
        let mut next = vec![0.0; 9];
        integrate(
            &WaveParams::default(),
            dims,
            &heights,
            &heights,
            &[false],
            &mut next,
        );
    }

    #[test]
    fn test_single_step_values() {
        let params = WaveParams::default().without_excitation();
        let dims = GridDims::new(3, 3);
        let mut heights = vec![0.0; 9];
        heights[4] = 1.0;
        let mut field = WaveField::new(dims, params, heights).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        field.step(&mut rng);

        // Centre: F = 0.1 * -6 - 0.125 = -0.725
        assert!((field.current()[4] - (1.0 - 0.725 * 0.01)).abs() < 1e-6);
        // Left neighbour pulled up: F = 0.1
        assert!((field.current()[3] - 0.001).abs() < 1e-7);
        // Vertex 0 does not touch the centre
        assert_eq!(field.current()[0], 0.0);
        assert_eq!(field.previous()[4], 1.0);
    }

    #[test]
    fn test_rest_state_is_fixed_point() {
        let dims = GridDims::new(8, 5);
        let mut field =
            WaveField::new(dims, WaveParams::default().without_excitation(), vec![0.0; 40]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            field.step(&mut rng);
        }
        assert!(field.current().iter().all(|&z| z == 0.0));
        assert!(field.previous().iter().all(|&z| z == 0.0));
    }

    #[test]
    fn test_damping_drains_energy() {
        let dims = GridDims::new(8, 6);
        let mut rng = StdRng::seed_from_u64(3);
        let initial: Vec<f32> = (0..dims.vertex_count())
            .map(|_| rng.gen_range(-0.5..0.5))
            .collect();
        let mut field =
            WaveField::new(dims, WaveParams::default().without_excitation(), initial).unwrap();
        let start = field.energy();

        for _ in 0..1000 {
            field.step(&mut rng);
        }
        let midway = field.energy();
        for _ in 0..4000 {
            field.step(&mut rng);
        }

        assert!(midway < start);
        assert!(field.max_amplitude() < 1e-3, "{}", field.max_amplitude());
    }

    #[test]
    fn test_sweep_order_does_not_matter() {
        let params = WaveParams::default();
        let dims = GridDims::new(9, 7);
        let mut rng = StdRng::seed_from_u64(11);
        let current: Vec<f32> = (0..dims.vertex_count())
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        let previous: Vec<f32> = current.iter().map(|z| z * 0.9).collect();
        let excited: Vec<bool> = (0..dims.height).map(|row| row % 3 == 0).collect();

        let mut forward = vec![0.0; dims.vertex_count()];
        integrate(&params, dims, &current, &previous, &excited, &mut forward);

        let mut reverse = vec![0.0; dims.vertex_count()];
        for index in (0..dims.vertex_count()).rev() {
            reverse[index] = integrate_vertex(&params, dims, &current, &previous, &excited, index);
        }

        for (f, r) in forward.iter().zip(&reverse) {
            assert_eq!(f.to_bits(), r.to_bits());
        }

        // Updating in place would leak new values into neighbour reads
        let mut in_place = current.clone();
        for index in 0..dims.vertex_count() {
            in_place[index] = integrate_vertex(&params, dims, &in_place, &previous, &excited, index);
        }
        assert_ne!(in_place, forward);
    }

    #[test]
    fn test_certain_excitation_kicks_left_column() {
        let params = WaveParams {
            excitation_probability: 1.0,
            ..WaveParams::default()
        };
        let dims = GridDims::new(4, 3);
        let mut field = WaveField::new(dims, params, vec![0.0; 12]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        field.step(&mut rng);

        for (i, &z) in field.current().iter().enumerate() {
            if i % 4 == 0 {
                assert!((z - 0.02).abs() < 1e-7, "vertex {} = {}", i, z);
            } else {
                assert_eq!(z, 0.0, "vertex {}", i);
            }
        }
    }

    #[test]
    fn test_zero_probability_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut untouched = StdRng::seed_from_u64(5);
        let mut excited = vec![true; 4];
        draw_excitations(0.0, &mut rng, &mut excited);
        assert!(excited.iter().all(|&e| !e));
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_free_step_matches_field() {
        let params = WaveParams {
            excitation_probability: 0.25,
            ..WaveParams::default()
        };
        let dims = GridDims::new(6, 4);
        let initial: Vec<f32> = (0..24).map(|i| (i as f32 * 0.37).sin() * 0.3).collect();

        let mut field = WaveField::new(dims, params.clone(), initial.clone()).unwrap();
        let mut current = initial.clone();
        let mut previous = initial;
        let mut rng_a = StdRng::seed_from_u64(9);
        let mut rng_b = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            field.step(&mut rng_a);
            step(&params, dims, &mut current, &mut previous, &mut rng_b);
        }

        assert_eq!(field.current(), current.as_slice());
        assert_eq!(field.previous(), previous.as_slice());
    }

    #[test]
    fn test_wrong_initial_length_rejected() {
        let result = WaveField::new(GridDims::new(3, 3), WaveParams::default(), vec![0.0; 4]);
        assert!(matches!(result, Err(WebError::InvalidParams(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = WaveParams {
            excitation_probability: -0.1,
            ..WaveParams::default()
        };
        assert!(WaveField::new(GridDims::new(3, 3), params, vec![0.0; 9]).is_err());
    }
}
