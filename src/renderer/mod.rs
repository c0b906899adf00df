//! wgpu rendering module
//!
//! Draws simulation snapshots as flat-colored rectangles. The renderer only
//! reads snapshots; it never touches the session.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, RenderTarget, create_instance, play_to_ndc};
pub use shapes::scene;
pub use vertex::{Vertex, colors};
