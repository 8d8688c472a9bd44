//! Add / edit / quick-update form overlay.
//!
//! The overlay owns only the text inputs and focus. Every edit is pushed
//! straight into the controller's `Draft`, which does the parsing.

use canopy_core::{Draft, FieldKind, FieldSpec};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use super::text_field::{LABEL_WIDTH, TextField};
use super::{centered, key_hints, popup};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    Cancel,
    /// The draft changed.
    Edited,
    /// Consumed without touching the draft (focus moves, unknown keys).
    Handled,
}

#[derive(Debug, Clone)]
pub struct FormOverlay {
    title: String,
    fields: Vec<&'static FieldSpec>,
    inputs: Vec<TextField>,
    focus: usize,
}

impl FormOverlay {
    pub fn new(
        title: String,
        fields: impl IntoIterator<Item = &'static FieldSpec>,
        draft: &Draft,
    ) -> Self {
        let fields: Vec<&'static FieldSpec> = fields.into_iter().collect();
        let inputs = fields
            .iter()
            .map(|field| TextField::new(draft.text(field.key)))
            .collect();
        Self {
            title,
            fields,
            inputs,
            focus: 0,
        }
    }

    pub fn focused_field(&self) -> Option<&'static FieldSpec> {
        self.fields.get(self.focus).copied()
    }

    pub fn handle_key(&mut self, key: KeyEvent, draft: &mut Draft) -> FormEvent {
        match key.code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Enter => return FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.step(true);
                return FormEvent::Handled;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.step(false);
                return FormEvent::Handled;
            }
            _ => {}
        }

        let Some(field) = self.focused_field() else {
            return FormEvent::Handled;
        };
        let Some(input) = self.inputs.get_mut(self.focus) else {
            return FormEvent::Handled;
        };

        match (field.kind, key.code) {
            (FieldKind::Flag, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => {
                draft.toggle(field.key);
                input.set_value(draft.text(field.key));
                FormEvent::Edited
            }
            (FieldKind::Flag, _) => FormEvent::Handled,
            (FieldKind::Choice(_), KeyCode::Left | KeyCode::Right) => {
                draft.cycle(field, key.code == KeyCode::Right);
                input.set_value(draft.text(field.key));
                FormEvent::Edited
            }
            _ => {
                if input.handle_key(key) {
                    draft.set_input(field, input.value());
                    FormEvent::Edited
                } else {
                    FormEvent::Handled
                }
            }
        }
    }

    fn step(&mut self, forward: bool) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    /// Draw the overlay. `saving` carries the spinner state while a save
    /// request is in flight.
    pub fn render(&self, frame: &mut Frame, area: Rect, draft: &Draft, saving: Option<&ThrobberState>) {
        let rows = u16::try_from(self.fields.len()).unwrap_or(u16::MAX);
        let rect = centered(area, 76, rows.saturating_add(5));
        let inner = popup(frame, rect, &self.title, theme::border_focused());

        let layout = Layout::vertical([
            Constraint::Min(1),    // fields
            Constraint::Length(1), // status
            Constraint::Length(1), // hints
        ])
        .split(inner);
        let body = layout[0];

        let visible = usize::from(body.height).max(1);
        let start = self.focus.saturating_sub(visible - 1);
        for (row, (field, input)) in self
            .fields
            .iter()
            .zip(&self.inputs)
            .enumerate()
            .skip(start)
            .take(visible)
        {
            let y = body.y + u16::try_from(row - start).unwrap_or(0);
            let line_area = Rect::new(body.x, y, body.width, 1);
            let active = row == self.focus;
            let label = if field.required {
                format!("{} *", field.label)
            } else {
                field.label.to_owned()
            };

            if field.kind == FieldKind::Flag {
                render_flag(frame, line_area, &label, draft.text(field.key) == "Yes", active);
            } else {
                input.render(frame, line_area, &label, active);
            }
        }

        self.render_status(frame, layout[1], draft, saving);

        let mut hints = vec![("Tab", "next"), ("Enter", "save"), ("Esc", "cancel")];
        match self.focused_field().map(|f| f.kind) {
            Some(FieldKind::Choice(_)) => hints.insert(0, ("◂▸", "cycle")),
            Some(FieldKind::Flag) => hints.insert(0, ("Space", "toggle")),
            _ => {}
        }
        frame.render_widget(Paragraph::new(key_hints(&hints)), layout[2]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, draft: &Draft, saving: Option<&ThrobberState>) {
        if let Some(state) = saving {
            let throbber = Throbber::default()
                .label("Saving...")
                .style(Style::default().fg(theme::LICHEN))
                .throbber_style(Style::default().fg(theme::FERN));
            frame.render_stateful_widget(throbber, area, &mut state.clone());
            return;
        }

        let Some(field) = self.focused_field() else {
            return;
        };
        let line = if let Some(invalid) = draft.invalid(field.key) {
            Line::from(Span::styled(
                format!("{}: {}", field.label, invalid.reason),
                theme::error_text(),
            ))
        } else if let FieldKind::Choice(options) = field.kind {
            Line::from(Span::styled(options.join(" · "), theme::key_hint()))
        } else if let Some(hint) = field.hint {
            Line::from(Span::styled(hint, theme::key_hint()))
        } else {
            return;
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_flag(frame: &mut Frame, area: Rect, label: &str, value: bool, active: bool) {
    let marker = if value { "[✓]" } else { "[ ]" };
    let marker_style = if active {
        Style::default().fg(theme::FERN)
    } else if value {
        Style::default().fg(theme::LICHEN)
    } else {
        theme::key_hint()
    };
    let label_style = if active {
        Style::default().fg(theme::LICHEN)
    } else {
        Style::default().fg(theme::MIST)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{label:<width$} ", width = usize::from(LABEL_WIDTH)), label_style),
            Span::styled(marker, marker_style),
        ])),
        area,
    );
}

#[cfg(test)]
mod tests {
    use canopy_core::{Animal, Entity, Plant};
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;
    use serde_json::{Value, json};

    use super::*;
    use crate::widgets::text_field::tests::key;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default()
    }

    fn focus_on(form: &mut FormOverlay, draft: &mut Draft, wanted: &str) {
        for _ in 0..form.fields.len() {
            if form.focused_field().is_some_and(|f| f.key == wanted) {
                return;
            }
            form.handle_key(key(KeyCode::Tab), draft);
        }
        panic!("no field {wanted}");
    }

    #[test]
    fn typing_updates_the_draft() {
        let mut draft = Draft::blank::<Animal>(today());
        let mut form = FormOverlay::new("Add Animal".into(), Animal::FIELDS, &draft);

        focus_on(&mut form, &mut draft, "count");
        form.handle_key(key(KeyCode::Backspace), &mut draft);
        for c in "12".chars() {
            assert_eq!(form.handle_key(key(KeyCode::Char(c)), &mut draft), FormEvent::Edited);
        }
        assert_eq!(draft.value("count"), Some(&json!(12)));
    }

    #[test]
    fn bad_numbers_are_flagged_on_the_draft() {
        let mut draft = Draft::blank::<Animal>(today());
        let mut form = FormOverlay::new("Add Animal".into(), Animal::FIELDS, &draft);

        focus_on(&mut form, &mut draft, "count");
        form.handle_key(key(KeyCode::Char('x')), &mut draft);
        assert!(draft.invalid("count").is_some());
        assert!(!draft.is_valid());
    }

    #[test]
    fn flags_toggle_with_space() {
        let mut draft = Draft::blank::<Plant>(today());
        let mut form = FormOverlay::new("Add Plant".into(), Plant::FIELDS, &draft);

        focus_on(&mut form, &mut draft, "medicinalUse");
        form.handle_key(key(KeyCode::Char(' ')), &mut draft);
        assert_eq!(draft.value("medicinalUse"), Some(&Value::Bool(true)));
        form.handle_key(key(KeyCode::Char('z')), &mut draft);
        assert_eq!(draft.value("medicinalUse"), Some(&Value::Bool(true)));
    }

    #[test]
    fn choices_cycle_with_arrows() {
        let mut draft = Draft::blank::<Animal>(today());
        let mut form = FormOverlay::new("Add Animal".into(), Animal::FIELDS, &draft);

        focus_on(&mut form, &mut draft, "conservationStatus");
        let before = draft.text("conservationStatus");
        form.handle_key(key(KeyCode::Right), &mut draft);
        assert_ne!(draft.text("conservationStatus"), before);
        form.handle_key(key(KeyCode::Left), &mut draft);
        assert_eq!(draft.text("conservationStatus"), before);
    }

    #[test]
    fn navigation_keys_never_edit() {
        let mut draft = Draft::blank::<Animal>(today());
        let mut form = FormOverlay::new("Add Animal".into(), Animal::FIELDS, &draft);
        let snapshot = draft.clone();

        assert_eq!(form.handle_key(key(KeyCode::Tab), &mut draft), FormEvent::Handled);
        assert_eq!(
            form.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), &mut draft),
            FormEvent::Handled
        );
        assert_eq!(form.handle_key(key(KeyCode::Enter), &mut draft), FormEvent::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc), &mut draft), FormEvent::Cancel);
        assert_eq!(draft, snapshot);
    }
}
