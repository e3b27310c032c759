//! High-level web system: mesh, wave field and randomness advanced together.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::mesh::{GridDims, Vertex, WebMesh};
use super::wave::WaveField;
use crate::error::WebError;
use crate::params::{WaveParams, WebConfig};

/// Web simulation state handed to the renderer every frame
pub struct WebSystem {
    pub mesh: WebMesh,
    field: WaveField,
    rng: StdRng,
    steps: u64,
}

impl WebSystem {
    /// Build the mesh and wave field for `config`.
    ///
    /// Fails if a buffer cannot be allocated or a parameter is out of range;
    /// the caller should abort startup in that case.
    pub fn new(config: &WebConfig, params: WaveParams) -> Result<Self, WebError> {
        let dims = GridDims::new(config.width, config.height);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mesh = WebMesh::new(dims, config.initial_heights, &mut rng)?;
        let field = WaveField::new(dims, params, mesh.heights())?;

        log::info!(
            "Web: {}x{} vertices, {} triangles, initial heights {:?}",
            dims.width,
            dims.height,
            mesh.indices.len() / 3,
            config.initial_heights
        );

        Ok(Self {
            mesh,
            field,
            rng,
            steps: 0,
        })
    }

    /// Advance the simulation one step and mirror heights into the vertices
    pub fn update(&mut self) -> &[Vertex] {
        self.field.step(&mut self.rng);
        self.mesh.set_heights(self.field.current());
        self.steps += 1;
        &self.mesh.vertices
    }

    pub fn dims(&self) -> GridDims {
        self.mesh.dims
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.mesh.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.mesh.indices
    }

    /// Vertex field as `3 * width * height` packed floats
    pub fn flat_positions(&self) -> &[f32] {
        self.mesh.flat_positions()
    }

    pub fn field(&self) -> &WaveField {
        &self.field
    }

    /// Number of steps taken since startup
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
