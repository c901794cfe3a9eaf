/// Terminal host for the versor render loop
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::info;
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use versor_core::{
    AxisSegment, Camera, FrameScheduler, Mesh, Presentation, Readouts, RenderLoop, RenderTarget,
    Result, VisualizerConfig,
};

pub mod input;
pub mod renderer;

pub use input::{AxisFields, FieldAction};
pub use renderer::AsciiRenderer;

/// Terminal cells are about twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Rows at the bottom kept free for the axis fields and key help
const FOOTER_ROWS: u16 = 2;

/// Render target, readout sink and frame clock backed by the terminal.
pub struct TerminalHost {
    mesh: Mesh,
    config: VisualizerConfig,
    camera: Camera,
    renderer: AsciiRenderer,
    axis_segment: Option<AxisSegment>,
    /// Readout text shown over the top-left corner of the render
    overlay: Readouts,
    fields: AxisFields,
    running: Arc<AtomicBool>,
    frame_time: Duration,
    frame_start: Instant,
    last_fps_update: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalHost {
    pub fn new(
        mesh: Mesh,
        config: VisualizerConfig,
        fps: u32,
        width: u16,
        height: u16,
        running: Arc<AtomicBool>,
    ) -> Self {
        let render_height = height.saturating_sub(FOOTER_ROWS);
        let now = Instant::now();
        Self {
            mesh,
            camera: Camera::for_viewport(width as u32, render_height as u32, CELL_ASPECT, &config),
            renderer: AsciiRenderer::new(width as usize, render_height as usize),
            fields: AxisFields::new(config.initial_axis),
            config,
            axis_segment: None,
            overlay: Readouts::default(),
            running,
            frame_time: Duration::from_secs(1) / fps.max(1),
            frame_start: now,
            last_fps_update: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn overlay(&self) -> &Readouts {
        &self.overlay
    }

    pub fn fields(&self) -> &AxisFields {
        &self.fields
    }

    fn resize(&mut self, width: u16, height: u16) {
        let render_height = height.saturating_sub(FOOTER_ROWS);
        self.renderer.resize(width as usize, render_height as usize);
        self.camera = Camera::for_viewport(width as u32, render_height as u32, CELL_ASPECT, &self.config);
    }

    /// Write the finished frame and overlays to the terminal.
    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        let mut lines = vec![
            format!("Versor Visualizer | FPS: {:.1}", self.fps),
            self.overlay.angle.clone(),
            self.overlay.axis.clone(),
            self.overlay.versor.clone(),
            "mat4 R = quaternion_to_matrix (versor)".to_string(),
        ];
        lines.extend(self.overlay.matrix.lines().map(str::to_string));

        queue!(stdout, SetForegroundColor(Color::Yellow))?;
        for (row, line) in lines.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, row as u16), Print(line))?;
        }

        let footer = self.renderer.height() as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, footer),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Green),
            Print(self.fields.render()),
        )?;
        if let Some(status) = self.fields.status() {
            queue!(stdout, SetForegroundColor(Color::Red), Print(format!("  {}", status)))?;
        }
        queue!(
            stdout,
            cursor::MoveTo(0, footer + 1),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::DarkGrey),
            Print("Tab/Arrows=Field  0-9 - .=Edit  Enter=Apply axis  Q/Esc=Quit"),
            ResetColor
        )?;

        stdout.flush()
    }

    fn update_fps(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        if (now - self.last_fps_update).as_secs() >= 1 {
            self.fps = self.frame_count as f32 / (now - self.last_fps_update).as_secs_f32();
            self.frame_count = 0;
            self.last_fps_update = now;
        }
    }

    /// Poll input until the frame deadline, returning a committed axis edit.
    fn handle_input_until(&mut self, deadline: Instant) -> io::Result<Option<[i32; 3]>> {
        let mut edit = None;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => match self.fields.handle_key(code) {
                    FieldAction::Commit(raw) => {
                        info!("axis fields committed {:?}", raw);
                        edit = Some(raw);
                    }
                    FieldAction::Quit => {
                        self.running.store(false, Ordering::Relaxed);
                        break;
                    }
                    FieldAction::None => {}
                },
                Event::Resize(width, height) => self.resize(width, height),
                _ => {}
            }
            if remaining.is_zero() {
                break;
            }
        }
        Ok(edit)
    }
}

impl RenderTarget for TerminalHost {
    fn clear(&mut self) -> Result<()> {
        self.renderer.clear();
        Ok(())
    }

    fn draw_mesh(&mut self, model: &Matrix4<f32>) -> Result<()> {
        self.renderer.render_mesh(&self.mesh, model, &self.camera);
        Ok(())
    }

    fn draw_axis(&mut self) -> Result<()> {
        if let Some(segment) = &self.axis_segment {
            self.renderer.render_axis(segment, &self.camera);
        }
        Ok(())
    }

    fn upload_axis_segment(&mut self, segment: &AxisSegment) -> Result<()> {
        self.axis_segment = Some(*segment);
        Ok(())
    }
}

impl Presentation for TerminalHost {
    fn show_angle(&mut self, text: &str) {
        self.overlay.angle = text.to_string();
    }

    fn show_axis(&mut self, text: &str) {
        self.overlay.axis = text.to_string();
    }

    fn show_versor(&mut self, text: &str) {
        self.overlay.versor = text.to_string();
    }

    fn show_matrix(&mut self, text: &str) {
        self.overlay.matrix = text.to_string();
    }
}

impl FrameScheduler for TerminalHost {
    fn wait_for_next_frame(&mut self) -> Result<Option<[i32; 3]>> {
        self.present()?;
        self.update_fps();

        let deadline = self.frame_start + self.frame_time;
        let edit = self.handle_input_until(deadline)?;
        self.frame_start = Instant::now();
        Ok(edit)
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    host: TerminalHost,
    render_loop: RenderLoop,
    running: Arc<AtomicBool>,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: VisualizerConfig, fps: u32) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let running = Arc::new(AtomicBool::new(true));
        let render_loop = RenderLoop::new(&config)?;

        Ok(Self {
            host: TerminalHost::new(mesh, config, fps, width, height, running.clone()),
            render_loop,
            running,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.render_loop.run(&mut self.host, &self.running);

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    pub fn frames_rendered(&self) -> u64 {
        self.render_loop.frame_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> TerminalHost {
        TerminalHost::new(
            Mesh::cube(2.0),
            VisualizerConfig::default(),
            30,
            80,
            42,
            Arc::new(AtomicBool::new(true)),
        )
    }

    #[test]
    fn test_footer_rows_reserved() {
        let host = host();
        assert_eq!(host.renderer.height(), 40);
        assert_eq!(host.renderer.width(), 80);
    }

    #[test]
    fn test_step_fills_overlay() {
        let mut host = host();
        let mut render_loop = RenderLoop::new(&VisualizerConfig::default()).unwrap();
        render_loop.initialize(&mut host).unwrap();
        render_loop.step(&mut host).unwrap();

        assert_eq!(host.overlay().angle, "angle = 1.00 deg");
        assert_eq!(host.overlay().axis, "normalise(axis) = [0.00, 1.00, 0.00]");
        assert_eq!(host.overlay().matrix.lines().count(), 4);
        assert!(host.axis_segment.is_some());
    }

    #[test]
    fn test_resize_updates_camera() {
        let mut host = host();
        host.resize(120, 32);
        assert_eq!(host.renderer.width(), 120);
        assert_eq!(host.renderer.height(), 30);
        assert!((host.camera.aspect - 2.0).abs() < 1e-6);
    }
}
