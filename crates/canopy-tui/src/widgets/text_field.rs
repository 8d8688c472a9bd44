//! Single-line text input backed by `tui-input`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Width reserved for field labels in forms.
pub const LABEL_WIDTH: u16 = 24;

#[derive(Debug, Clone, Default)]
pub struct TextField {
    input: Input,
    masked: bool,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            input: Input::default().with_value(value.into()),
            masked: false,
        }
    }

    /// Render bullets instead of the typed text.
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.input = Input::default().with_value(value.into());
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    /// Apply an editing key. Returns true when the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(request) = editing_request(key) else {
            return false;
        };
        self.input
            .handle(request)
            .is_some_and(|changed| changed.value)
    }

    /// Draw `label value` on one row, placing the cursor when active.
    pub fn render(&self, frame: &mut Frame, area: Rect, label: &str, active: bool) {
        let value_width = area.width.saturating_sub(LABEL_WIDTH + 1).max(1);
        let scroll = self.input.visual_scroll(usize::from(value_width));
        let shown: String = if self.masked {
            "●".repeat(self.input.value().chars().count())
        } else {
            self.input.value().to_owned()
        };
        let visible: String = shown.chars().skip(scroll).collect();

        let label_style = if active {
            Style::default().fg(theme::LICHEN)
        } else {
            Style::default().fg(theme::MIST)
        };
        let value_style = if active {
            Style::default().fg(theme::FERN)
        } else {
            theme::table_row()
        };

        let line = Line::from(vec![
            Span::styled(format!("{label:<width$} ", width = usize::from(LABEL_WIDTH)), label_style),
            Span::styled(visible, value_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        if active {
            let offset = self.input.visual_cursor().saturating_sub(scroll);
            let offset = u16::try_from(offset).unwrap_or(u16::MAX).min(value_width);
            frame.set_cursor_position(Position::new(
                area.x.saturating_add(LABEL_WIDTH + 1).saturating_add(offset),
                area.y,
            ));
        }
    }
}

/// Map a key to a line-editing request. Navigation keys (Tab, Enter,
/// Up/Down, Esc) are left to the caller.
fn editing_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char(c) if !ctrl => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn type_text(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_deleting() {
        let mut field = TextField::new("Oak");
        type_text(&mut field, "s");
        assert_eq!(field.value(), "Oaks");
        assert!(field.handle_key(key(KeyCode::Backspace)));
        assert_eq!(field.value(), "Oak");
        assert!(!field.handle_key(key(KeyCode::Tab)));
    }

    #[test]
    fn ctrl_u_clears_the_line() {
        let mut field = TextField::new("Zone A");
        let changed = field.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(changed);
        assert_eq!(field.value(), "");
    }

    #[test]
    fn set_value_replaces_text() {
        let mut field = TextField::masked();
        type_text(&mut field, "secret");
        field.set_value("x");
        assert_eq!(field.value(), "x");
        field.clear();
        assert_eq!(field.value(), "");
    }
}
