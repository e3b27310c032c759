//! Web mesh generation and height-field dynamics.

mod mesh;
mod system;
pub mod wave;

// Re-export public types
pub use mesh::{generate_indices, generate_vertices, GridDims, RowParity, Vertex, WebMesh};
pub use system::WebSystem;
pub use wave::{step, WaveField};
