/// Versor Terminal - a mesh spinning about an editable axis
///
/// Controls:
///   - Tab / Arrow Keys: Move between the x, y and z fields
///   - 0-9 - . / Backspace: Edit the focused field
///   - Enter: Apply the axis
///   - Q/ESC: Quit
use clap::{error::ErrorKind, CommandFactory, Parser};
use env_logger::Target;
use log::{info, LevelFilter};
use std::fs::File;
use std::path::PathBuf;
use versor_core::orientation::DEFAULT_STEP_DEGREES;
use versor_core::{obj, Mesh, Result, VisualizerConfig};
use versor_terminal::TerminalApp;

#[derive(Parser)]
#[command(name = "versor-terminal")]
#[command(about = "Spin a mesh about an axis with a quaternion and show the matrices")]
struct Cli {
    /// Wavefront OBJ mesh to render (a cube when omitted)
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Initial rotation axis as three integers
    #[arg(long, num_args = 3, allow_negative_numbers = true, default_values_t = [0, 1, 0])]
    axis: Vec<i32>,

    /// Degrees added to the angle every frame
    #[arg(long, default_value_t = DEFAULT_STEP_DEGREES, value_parser = parse_step)]
    step: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Log level for --log-file (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Write log output to this file; without it nothing is logged
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_step(s: &str) -> std::result::Result<f32, String> {
    let step: f32 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..360.0).contains(&step) {
        Ok(step)
    } else {
        Err(format!("{} is not in [0, 360)", step))
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    match &cli.log_file {
        Some(path) => {
            builder
                .filter_level(cli.log_level)
                .target(Target::Pipe(Box::new(File::create(path)?)));
        }
        // Raw mode and the alternate screen would garble stderr output
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let initial_axis: [i32; 3] = match cli.axis.as_slice().try_into() {
        Ok(axis) => axis,
        Err(_) => Cli::command()
            .error(ErrorKind::WrongNumberOfValues, "--axis takes exactly three values")
            .exit(),
    };
    if initial_axis == [0, 0, 0] {
        Cli::command()
            .error(ErrorKind::ValueValidation, "--axis must not be 0 0 0")
            .exit();
    }

    let mesh = match &cli.mesh {
        Some(path) => obj::load_obj(path)?,
        None => Mesh::cube(2.0),
    };

    let config = VisualizerConfig {
        initial_axis,
        step_degrees_per_frame: cli.step,
        ..VisualizerConfig::default()
    };
    info!("starting with {:?}", config);

    let mut app = TerminalApp::new(mesh, config, cli.fps)?;
    app.run()?;

    println!("Rendered {} frames", app.frames_rendered());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_axis_components() {
        let cli = Cli::try_parse_from(["versor-terminal", "--axis", "-1", "0", "2"]).unwrap();
        assert_eq!(cli.axis, vec![-1, 0, 2]);
        assert!(cli.mesh.is_none());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["versor-terminal", "--mesh", "teapot.obj"]).unwrap();
        assert_eq!(cli.axis, vec![0, 1, 0]);
        assert_eq!(cli.fps, 30);
        assert_eq!(cli.log_level, LevelFilter::Warn);
        assert_eq!(cli.mesh, Some(PathBuf::from("teapot.obj")));
    }

    #[test]
    fn test_step_range() {
        assert_eq!(parse_step("2.5"), Ok(2.5));
        assert!(parse_step("360").is_err());
        assert!(parse_step("-1").is_err());
        assert!(parse_step("fast").is_err());
    }
}
