/// Versor Core Library - axis-angle rotation pipeline and frame loop
///
/// Builds a unit quaternion from a user-chosen axis and a fixed-step angle,
/// expands it to a rotation matrix, and drives any render host through the
/// `RenderTarget`, `Presentation` and `FrameScheduler` traits.

pub mod axis;
pub mod config;
pub mod error;
pub mod geometry;
pub mod obj;
pub mod orientation;
pub mod projection;
pub mod quaternion;
pub mod readout;
pub mod render_loop;
pub mod vector;

// Re-export commonly used types
pub use axis::{AxisSegment, AxisState};
pub use config::VisualizerConfig;
pub use error::{Result, VersorError};
pub use geometry::Mesh;
pub use orientation::OrientationController;
pub use projection::Camera;
pub use quaternion::Versor;
pub use readout::Readouts;
pub use render_loop::{FrameScheduler, LoopState, Presentation, RenderLoop, RenderTarget};
