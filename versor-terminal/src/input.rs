/// Editable axis text fields
use crossterm::event::KeyCode;
use log::warn;
use versor_core::axis::parse_component;
use versor_core::VersorError;

const FIELD_NAMES: [char; 3] = ['x', 'y', 'z'];

/// Longest text a field accepts
const MAX_FIELD_LEN: usize = 8;

/// What a key press did to the fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAction {
    None,
    /// All three fields parsed; apply them as the new raw axis
    Commit([i32; 3]),
    Quit,
}

/// Three text fields for the axis components, one of them focused.
#[derive(Debug, Clone)]
pub struct AxisFields {
    text: [String; 3],
    focus: usize,
    status: Option<String>,
}

impl AxisFields {
    pub fn new(raw: [i32; 3]) -> Self {
        Self {
            text: raw.map(|c| c.to_string()),
            focus: 0,
            status: None,
        }
    }

    pub fn text(&self, index: usize) -> &str {
        &self.text[index]
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Message about the last rejected commit, if any
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FieldAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => FieldAction::Quit,
            KeyCode::Tab | KeyCode::Right => {
                self.focus = (self.focus + 1) % 3;
                FieldAction::None
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.focus = (self.focus + 2) % 3;
                FieldAction::None
            }
            KeyCode::Backspace => {
                self.text[self.focus].pop();
                FieldAction::None
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                if self.text[self.focus].len() < MAX_FIELD_LEN {
                    self.text[self.focus].push(c);
                }
                FieldAction::None
            }
            KeyCode::Enter => self.commit(),
            _ => FieldAction::None,
        }
    }

    /// Parse every field; a failure leaves the axis as it was.
    fn commit(&mut self) -> FieldAction {
        let mut raw = [0; 3];
        for (i, text) in self.text.iter().enumerate() {
            match parse_component(text) {
                Ok(value) => raw[i] = value,
                Err(e) => {
                    warn!("axis field {} rejected: {}", FIELD_NAMES[i], e);
                    self.status = Some(match e {
                        VersorError::InvalidAxisInput(_) => {
                            format!("{} is not a number", FIELD_NAMES[i])
                        }
                        other => other.to_string(),
                    });
                    return FieldAction::None;
                }
            }
        }
        self.status = None;
        FieldAction::Commit(raw)
    }

    /// Single-line rendering, e.g. `axis x [0] y [1] z [0]` with the focus in braces.
    pub fn render(&self) -> String {
        let parts: Vec<String> = FIELD_NAMES
            .iter()
            .zip(&self.text)
            .enumerate()
            .map(|(i, (name, text))| {
                if i == self.focus {
                    format!("{} {{{}}}", name, text)
                } else {
                    format!("{} [{}]", name, text)
                }
            })
            .collect();
        format!("axis {}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(fields: &mut AxisFields, text: &str) {
        for c in text.chars() {
            fields.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_initial_render() {
        let fields = AxisFields::new([0, 1, 0]);
        assert_eq!(fields.render(), "axis x {0} y [1] z [0]");
    }

    #[test]
    fn test_edit_and_commit() {
        let mut fields = AxisFields::new([0, 1, 0]);
        fields.handle_key(KeyCode::Backspace);
        type_text(&mut fields, "3");
        fields.handle_key(KeyCode::Tab);
        fields.handle_key(KeyCode::Backspace);
        type_text(&mut fields, "4.7");

        assert_eq!(fields.handle_key(KeyCode::Enter), FieldAction::Commit([3, 4, 0]));
        assert!(fields.status().is_none());
    }

    #[test]
    fn test_invalid_commit_is_rejected() {
        let mut fields = AxisFields::new([0, 1, 0]);
        fields.handle_key(KeyCode::BackTab);
        fields.handle_key(KeyCode::Backspace);
        type_text(&mut fields, "-");

        assert_eq!(fields.focus(), 2);
        assert_eq!(fields.handle_key(KeyCode::Enter), FieldAction::None);
        assert_eq!(fields.status(), Some("z is not a number"));
    }

    #[test]
    fn test_letters_are_ignored() {
        let mut fields = AxisFields::new([1, 1, 1]);
        type_text(&mut fields, "ab");
        assert_eq!(fields.text(0), "1");
    }

    #[test]
    fn test_quit_keys() {
        let mut fields = AxisFields::new([0, 1, 0]);
        assert_eq!(fields.handle_key(KeyCode::Char('q')), FieldAction::Quit);
        assert_eq!(fields.handle_key(KeyCode::Esc), FieldAction::Quit);
    }

    #[test]
    fn test_field_length_is_capped() {
        let mut fields = AxisFields::new([0, 0, 0]);
        type_text(&mut fields, "1234567890");
        assert_eq!(fields.text(0).len(), MAX_FIELD_LEN);
    }
}
