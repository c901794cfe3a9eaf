/// User-editable rotation axis with a dirty flag
use log::debug;
use nalgebra::Vector3;
use nom::{
    character::complete::{digit1, multispace0, one_of},
    combinator::{opt, recognize},
    sequence::{pair, preceded},
    IResult,
};

use crate::error::{Result, VersorError};
use crate::vector::normalize;

/// Half length of the axis indicator, in world units
pub const AXIS_HALF_LENGTH: f32 = 3.0;

/// Indicator color at the positive end of the axis
pub const AXIS_HEAD_COLOR: [f32; 3] = [0.0, 1.0, 0.0];
/// Indicator color at the negative end of the axis
pub const AXIS_TAIL_COLOR: [f32; 3] = [0.0, 0.2, 0.0];

/// Line segment drawn through the origin along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSegment {
    pub endpoints: [Vector3<f32>; 2],
    pub colors: [[f32; 3]; 2],
}

impl AxisSegment {
    pub fn along(axis: &Vector3<f32>) -> Self {
        Self {
            endpoints: [axis * AXIS_HALF_LENGTH, -axis * AXIS_HALF_LENGTH],
            colors: [AXIS_HEAD_COLOR, AXIS_TAIL_COLOR],
        }
    }

    /// Endpoints as a flat `[x0, y0, z0, x1, y1, z1]` buffer.
    pub fn positions(&self) -> [f32; 6] {
        let [a, b] = self.endpoints;
        [a.x, a.y, a.z, b.x, b.y, b.z]
    }

    pub fn flat_colors(&self) -> [f32; 6] {
        let [a, b] = self.colors;
        [a[0], a[1], a[2], b[0], b[1], b[2]]
    }
}

/// Rotation axis as last edited by the user.
///
/// Edits store raw integer components and mark the state dirty. The unit axis
/// is only recomputed by [`AxisState::refresh_if_dirty`], which the render
/// loop calls once per frame.
#[derive(Debug, Clone)]
pub struct AxisState {
    raw: [i32; 3],
    axis: Vector3<f32>,
    dirty: bool,
}

impl AxisState {
    /// Start from integer components, normalized immediately.
    pub fn from_raw(raw: [i32; 3]) -> Result<Self> {
        let [x, y, z] = raw;
        Ok(Self {
            raw,
            axis: normalize(&Vector3::new(x as f32, y as f32, z as f32))?,
            dirty: false,
        })
    }

    pub fn axis(&self) -> Vector3<f32> {
        self.axis
    }

    pub fn raw(&self) -> [i32; 3] {
        self.raw
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn segment(&self) -> AxisSegment {
        AxisSegment::along(&self.axis)
    }

    pub fn set_from_raw_components(&mut self, x: i32, y: i32, z: i32) {
        self.raw = [x, y, z];
        self.dirty = true;
    }

    /// Parse three text fields and store them as a pending edit.
    ///
    /// If any field fails to parse nothing changes, including the dirty flag.
    pub fn set_from_text(&mut self, x: &str, y: &str, z: &str) -> Result<()> {
        let x = parse_component(x)?;
        let y = parse_component(y)?;
        let z = parse_component(z)?;
        self.set_from_raw_components(x, y, z);
        Ok(())
    }

    /// Re-normalize a pending edit.
    ///
    /// Returns the new unit axis, or `None` when there was nothing to do. A
    /// `(0, 0, 0)` edit is dropped: the dirty flag clears, the previous axis
    /// stays current, and `DegenerateAxis` is returned so the caller can skip
    /// republishing.
    pub fn refresh_if_dirty(&mut self) -> Result<Option<Vector3<f32>>> {
        if !self.dirty {
            return Ok(None);
        }
        self.dirty = false;

        let [x, y, z] = self.raw;
        let raw = Vector3::new(x as f32, y as f32, z as f32);
        match normalize(&raw) {
            Ok(axis) => {
                self.axis = axis;
                Ok(Some(axis))
            }
            Err(e) => {
                debug!("dropping axis edit {:?}", self.raw);
                Err(e)
            }
        }
    }
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            raw: [0, 1, 0],
            axis: Vector3::y(),
            dirty: false,
        }
    }
}

/// Parse one axis component from a text field.
///
/// Reads a leading, optionally signed, decimal integer and ignores whatever
/// follows it, so fractional input truncates toward zero (`"2.9"` is 2,
/// `"-2.9"` is -2). Text that does not start with an integer is rejected.
pub fn parse_component(text: &str) -> Result<i32> {
    match leading_integer(text) {
        Ok((_, digits)) => digits
            .parse::<i32>()
            .map_err(|_| VersorError::InvalidAxisInput(text.to_string())),
        Err(_) => Err(VersorError::InvalidAxisInput(text.to_string())),
    }
}

fn leading_integer(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, recognize(pair(opt(one_of("+-")), digit1)))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_axis() {
        let state = AxisState::default();
        assert_eq!(state.axis(), Vector3::y());
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_from_raw() {
        let state = AxisState::from_raw([0, 0, -2]).unwrap();
        assert_eq!(state.axis(), Vector3::new(0.0, 0.0, -1.0));
        assert!(AxisState::from_raw([0, 0, 0]).is_err());
    }

    #[test]
    fn test_refresh_normalizes_edit() {
        let mut state = AxisState::default();
        state.set_from_raw_components(3, 4, 0);
        assert!(state.is_dirty());

        let axis = state.refresh_if_dirty().unwrap().unwrap();
        assert!((axis - Vector3::new(0.6, 0.8, 0.0)).norm() < 1e-6);
        assert_eq!(state.axis(), axis);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_refresh_when_clean_is_noop() {
        let mut state = AxisState::default();
        assert!(state.refresh_if_dirty().unwrap().is_none());

        state.set_from_raw_components(1, 0, 0);
        state.refresh_if_dirty().unwrap();
        assert!(state.refresh_if_dirty().unwrap().is_none());
    }

    #[test]
    fn test_zero_edit_keeps_previous_axis() {
        let mut state = AxisState::default();
        state.set_from_raw_components(0, 0, 0);

        let result = state.refresh_if_dirty();
        assert!(matches!(result, Err(VersorError::DegenerateAxis)));
        assert_eq!(state.axis(), Vector3::y());
        assert!(state.axis().iter().all(|c| c.is_finite()));
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_parse_component_truncates() {
        assert_eq!(parse_component("3").unwrap(), 3);
        assert_eq!(parse_component("  -4").unwrap(), -4);
        assert_eq!(parse_component("+2").unwrap(), 2);
        assert_eq!(parse_component("2.9").unwrap(), 2);
        assert_eq!(parse_component("-2.9").unwrap(), -2);
        assert_eq!(parse_component("7abc").unwrap(), 7);
    }

    #[test]
    fn test_parse_component_rejects_non_numeric() {
        for text in ["", "abc", "-", ".5", "  ", "x1"] {
            assert!(
                matches!(parse_component(text), Err(VersorError::InvalidAxisInput(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn test_set_from_text_failure_is_noop() {
        let mut state = AxisState::default();
        let result = state.set_from_text("1", "oops", "0");
        assert!(result.is_err());
        assert!(!state.is_dirty());
        assert_eq!(state.raw(), [0, 1, 0]);
    }

    #[test]
    fn test_set_from_text_marks_dirty() {
        let mut state = AxisState::default();
        state.set_from_text("0", "0", "5.5").unwrap();
        assert_eq!(state.raw(), [0, 0, 5]);
        let axis = state.refresh_if_dirty().unwrap().unwrap();
        assert!((axis - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_segment_spans_both_directions() {
        let segment = AxisSegment::along(&Vector3::x());
        assert_eq!(segment.positions(), [3.0, 0.0, 0.0, -3.0, 0.0, 0.0]);
        assert_eq!(segment.flat_colors(), [0.0, 1.0, 0.0, 0.0, 0.2, 0.0]);
    }
}
