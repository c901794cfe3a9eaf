/// Example: Step the render loop without a terminal and print one frame
///
/// Usage: cargo run --example snapshot -- [frames] [x y z]
use std::env;
use versor_core::{
    AxisSegment, Camera, Mesh, Presentation, Readouts, RenderLoop, RenderTarget, Result,
    VisualizerConfig,
};
use versor_terminal::AsciiRenderer;

struct Snapshot {
    mesh: Mesh,
    camera: Camera,
    renderer: AsciiRenderer,
    segment: Option<AxisSegment>,
    readouts: Readouts,
}

impl RenderTarget for Snapshot {
    fn clear(&mut self) -> Result<()> {
        self.renderer.clear();
        Ok(())
    }

    fn draw_mesh(&mut self, model: &nalgebra::Matrix4<f32>) -> Result<()> {
        self.renderer.render_mesh(&self.mesh, model, &self.camera);
        Ok(())
    }

    fn draw_axis(&mut self) -> Result<()> {
        if let Some(segment) = &self.segment {
            self.renderer.render_axis(segment, &self.camera);
        }
        Ok(())
    }

    fn upload_axis_segment(&mut self, segment: &AxisSegment) -> Result<()> {
        self.segment = Some(*segment);
        Ok(())
    }
}

impl Presentation for Snapshot {
    fn show_angle(&mut self, text: &str) {
        self.readouts.angle = text.to_string();
    }

    fn show_axis(&mut self, text: &str) {
        self.readouts.axis = text.to_string();
    }

    fn show_versor(&mut self, text: &str) {
        self.readouts.versor = text.to_string();
    }

    fn show_matrix(&mut self, text: &str) {
        self.readouts.matrix = text.to_string();
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let frames: u32 = args.first().and_then(|a| a.parse().ok()).unwrap_or(45);

    let mut config = VisualizerConfig::default();
    if args.len() >= 4 {
        for (slot, text) in config.initial_axis.iter_mut().zip(&args[1..4]) {
            *slot = versor_core::axis::parse_component(text)?;
        }
    }

    let (width, height) = (60, 24);
    let mut host = Snapshot {
        mesh: Mesh::cube(2.0),
        camera: Camera::for_viewport(width as u32, height as u32, 2.0, &config),
        renderer: AsciiRenderer::new(width, height),
        segment: None,
        readouts: Readouts::default(),
    };

    let mut render_loop = RenderLoop::new(&config)?;
    render_loop.initialize(&mut host)?;
    for _ in 0..frames {
        render_loop.step(&mut host)?;
    }

    for y in 0..height {
        let row: String = (0..width).map(|x| host.renderer.char_at(x, y)).collect();
        println!("{}", row.trim_end());
    }
    let readouts = render_loop.readouts();
    debug_assert_eq!(readouts, host.readouts);
    println!("{}\n{}\n{}\n{}", readouts.angle, readouts.axis, readouts.versor, readouts.matrix);
    Ok(())
}
