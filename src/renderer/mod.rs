//! Rendering: the sink side of a session
//!
//! The simulation only ever hands over world-space frames. Everything pixel
//! related (square viewport fitting, y flip, snapping, geometry, GPU upload)
//! happens here.

pub mod pipeline;
pub mod shapes;
pub mod sink;
pub mod vertex;
pub mod viewport;

pub use pipeline::RenderState;
pub use sink::{GpuSink, TraceSink};
pub use vertex::Vertex;
pub use viewport::Viewport;
