/// Per-frame driver tying the axis, the angle and the render target together
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use nalgebra::Matrix4;

use crate::axis::{AxisSegment, AxisState};
use crate::config::VisualizerConfig;
use crate::error::{Result, VersorError};
use crate::orientation::OrientationController;
use crate::quaternion::Versor;
use crate::readout::{format_angle, format_axis, format_matrix, format_versor, Readouts};

/// GPU-facing collaborator: draws the mesh and the axis indicator.
pub trait RenderTarget {
    /// Start a new frame.
    fn clear(&mut self) -> Result<()>;

    /// Draw the mesh with `model` as its model matrix.
    fn draw_mesh(&mut self, model: &Matrix4<f32>) -> Result<()>;

    /// Draw the axis segment most recently uploaded.
    fn draw_axis(&mut self) -> Result<()>;

    fn upload_axis_segment(&mut self, segment: &AxisSegment) -> Result<()>;
}

/// Text sinks for the readouts shown next to the render.
pub trait Presentation {
    fn show_angle(&mut self, text: &str);
    fn show_axis(&mut self, text: &str);
    fn show_versor(&mut self, text: &str);
    fn show_matrix(&mut self, text: &str);
}

/// Host hook that yields until the next display refresh.
pub trait FrameScheduler {
    /// Wait for the next frame.
    ///
    /// Anything the user committed to the axis fields since the last call is
    /// returned as raw integer components; it is applied before the next step.
    fn wait_for_next_frame(&mut self) -> Result<Option<[i32; 3]>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
}

/// Owns the orientation state and the matrix drawn each frame.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    axis: AxisState,
    orientation: OrientationController,
    versor: Versor,
    model: Matrix4<f32>,
    frame: u64,
}

impl RenderLoop {
    /// Fails on a zero initial axis or a step outside `[0, 360)`.
    pub fn new(config: &VisualizerConfig) -> Result<Self> {
        let step = config.step_degrees_per_frame;
        if !(0.0..360.0).contains(&step) {
            return Err(VersorError::InvalidStep(step));
        }
        Ok(Self {
            state: LoopState::Initializing,
            axis: AxisState::from_raw(config.initial_axis)?,
            orientation: OrientationController::with_step(config.step_degrees_per_frame),
            versor: Versor::identity(),
            model: Matrix4::identity(),
            frame: 0,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn axis(&self) -> &AxisState {
        &self.axis
    }

    /// Axis edits must only be made between frames.
    pub fn axis_mut(&mut self) -> &mut AxisState {
        &mut self.axis
    }

    pub fn orientation(&self) -> &OrientationController {
        &self.orientation
    }

    pub fn versor(&self) -> Versor {
        self.versor
    }

    /// Matrix that the next frame will draw with.
    pub fn model_matrix(&self) -> &Matrix4<f32> {
        &self.model
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Readouts for the current angle, axis, versor and matrix.
    pub fn readouts(&self) -> Readouts {
        Readouts::new(
            self.orientation.angle_degrees(),
            &self.axis.axis(),
            &self.versor,
            &self.model,
        )
    }

    /// Publish the starting axis and readouts, then enter `Running`.
    pub fn initialize<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: RenderTarget + Presentation,
    {
        host.upload_axis_segment(&self.axis.segment())?;
        let readouts = self.readouts();
        host.show_angle(&readouts.angle);
        host.show_axis(&readouts.axis);
        host.show_versor(&readouts.versor);
        host.show_matrix(&readouts.matrix);

        self.state = LoopState::Running;
        info!("render loop running, axis {:?}", self.axis.raw());
        Ok(())
    }

    /// Run one frame.
    ///
    /// Drawing happens first with the matrix from the previous step, so
    /// changes show up one frame late.
    pub fn step<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: RenderTarget + Presentation,
    {
        if self.state != LoopState::Running {
            return Err(VersorError::NotRunning);
        }

        host.clear()?;
        host.draw_mesh(&self.model)?;
        host.draw_axis()?;

        let angle = self.orientation.advance_frame();
        host.show_angle(&format_angle(angle));

        match self.axis.refresh_if_dirty() {
            Ok(Some(axis)) => {
                debug!("republishing axis {:?}", axis);
                host.upload_axis_segment(&self.axis.segment())?;
                host.show_axis(&format_axis(&axis));
            }
            Ok(None) => {}
            Err(VersorError::DegenerateAxis) => {
                warn!("zero axis entered, keeping {}", format_axis(&self.axis.axis()));
            }
            Err(e) => return Err(e),
        }

        let (versor, model) = self
            .orientation
            .current_versor_and_matrix(&self.axis.axis())?;
        self.versor = versor;
        self.model = model;
        host.show_versor(&format_versor(&versor));
        host.show_matrix(&format_matrix(&model));

        self.frame += 1;
        Ok(())
    }

    /// Drive frames until `running` is cleared or the host fails.
    ///
    /// `running` is checked before every frame, so a host can stop the loop
    /// from inside `wait_for_next_frame`.
    pub fn run<H>(&mut self, host: &mut H, running: &AtomicBool) -> Result<()>
    where
        H: RenderTarget + Presentation + FrameScheduler,
    {
        if self.state == LoopState::Initializing {
            self.initialize(host)?;
        }

        while running.load(Ordering::Relaxed) {
            self.step(host)?;
            if let Some([x, y, z]) = host.wait_for_next_frame()? {
                self.axis.set_from_raw_components(x, y, z);
            }
        }

        info!("render loop stopped after {} frames", self.frame);
        Ok(())
    }
}
