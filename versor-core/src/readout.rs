/// Text readouts for the presentation layer
///
/// Formatting is kept apart from the frame update so the pipeline can be
/// checked without a display. Matrices are printed in mathematical row order:
/// line `r` lists `m[(r, 0)] .. m[(r, 3)]`, which is the transpose of the
/// column-major storage uploaded to the GPU.
use nalgebra::{Matrix4, Vector3};

use crate::quaternion::Versor;

/// Values that would round to zero are printed as plain `0.00`, never `-0.00`.
fn tidy(value: f32) -> f32 {
    if value.abs() < 0.005 {
        0.0
    } else {
        value
    }
}

pub fn format_angle(angle_degrees: f32) -> String {
    format!("angle = {:.2} deg", angle_degrees)
}

pub fn format_axis(axis: &Vector3<f32>) -> String {
    format!(
        "normalise(axis) = [{:.2}, {:.2}, {:.2}]",
        tidy(axis.x),
        tidy(axis.y),
        tidy(axis.z)
    )
}

pub fn format_versor(q: &Versor) -> String {
    format!(
        "versor = [{:.2}, {:.2}, {:.2}, {:.2}]",
        tidy(q.w),
        tidy(q.x),
        tidy(q.y),
        tidy(q.z)
    )
}

/// Four lines of the form `| a b c d |`.
pub fn format_matrix(m: &Matrix4<f32>) -> String {
    (0..4)
        .map(|row| {
            let cells: Vec<String> = (0..4)
                .map(|col| format!("{:5.2}", tidy(m[(row, col)])))
                .collect();
            format!("| {} |", cells.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every readout for one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Readouts {
    pub angle: String,
    pub axis: String,
    pub versor: String,
    pub matrix: String,
}

impl Readouts {
    pub fn new(angle_degrees: f32, axis: &Vector3<f32>, q: &Versor, m: &Matrix4<f32>) -> Self {
        Self {
            angle: format_angle(angle_degrees),
            axis: format_axis(axis),
            versor: format_versor(q),
            matrix: format_matrix(m),
        }
    }
}
