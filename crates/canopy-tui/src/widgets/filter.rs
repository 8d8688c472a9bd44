//! Filter panel: one text input per filter field plus the entity's
//! one-shot quick filters.

use canopy_core::{FilterField, FilterInputs, QuickFilter};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::text_field::{LABEL_WIDTH, TextField};
use super::{centered, key_hints, popup};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEvent {
    /// Apply the text inputs.
    Apply,
    Quick(QuickFilter),
    Close,
    Handled,
}

/// Which `FilterInputs` slot a text row edits. A date range takes two
/// rows: the field itself holds the start, `RangeEnd` the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Field(FilterField),
    RangeEnd,
}

impl Slot {
    fn label(self) -> &'static str {
        match self {
            Self::Field(FilterField::DateRange) => "From (YYYY-MM-DD)",
            Self::Field(FilterField::Date) => "Date (YYYY-MM-DD)",
            Self::Field(field) => field.label(),
            Self::RangeEnd => "To (YYYY-MM-DD)",
        }
    }

    fn input(self, inputs: &mut FilterInputs) -> &mut String {
        match self {
            Self::Field(field) => inputs.input_mut(field),
            Self::RangeEnd => &mut inputs.to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Text(Slot),
    Quick(QuickFilter),
}

#[derive(Debug, Clone)]
pub struct FilterPanel {
    rows: Vec<(Row, TextField)>,
    focus: usize,
}

impl FilterPanel {
    pub fn new(fields: &[FilterField], quick: &[QuickFilter], current: &FilterInputs) -> Self {
        let mut current = current.clone();
        let mut rows = Vec::new();
        for &field in fields {
            let slots: &[Slot] = if field == FilterField::DateRange {
                &[Slot::Field(FilterField::DateRange), Slot::RangeEnd]
            } else {
                &[Slot::Field(field)]
            };
            for &slot in slots {
                let value = slot.input(&mut current).clone();
                rows.push((Row::Text(slot), TextField::new(value)));
            }
        }
        rows.extend(quick.iter().map(|&q| (Row::Quick(q), TextField::default())));
        Self { rows, focus: 0 }
    }

    pub fn handle_key(&mut self, key: KeyEvent, inputs: &mut FilterInputs) -> FilterEvent {
        match key.code {
            KeyCode::Esc => return FilterEvent::Close,
            KeyCode::Tab | KeyCode::Down => {
                self.step(true);
                return FilterEvent::Handled;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.step(false);
                return FilterEvent::Handled;
            }
            _ => {}
        }

        let Some((row, field)) = self.rows.get_mut(self.focus) else {
            return FilterEvent::Handled;
        };
        match (*row, key.code) {
            (Row::Quick(quick), KeyCode::Enter | KeyCode::Char(' ')) => FilterEvent::Quick(quick),
            (Row::Quick(_), _) => FilterEvent::Handled,
            (Row::Text(_), KeyCode::Enter) => FilterEvent::Apply,
            (Row::Text(slot), _) => {
                if field.handle_key(key) {
                    field.value().clone_into(slot.input(inputs));
                }
                FilterEvent::Handled
            }
        }
    }

    fn step(&mut self, forward: bool) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str) {
        let rows = u16::try_from(self.rows.len()).unwrap_or(u16::MAX);
        let rect = centered(area, 64, rows.saturating_add(4));
        let inner = popup(frame, rect, title, theme::border_focused());

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        let body = layout[0];

        for (idx, (row, field)) in self.rows.iter().enumerate() {
            let Ok(offset) = u16::try_from(idx) else { break };
            if offset >= body.height {
                break;
            }
            let line_area = Rect::new(body.x, body.y + offset, body.width, 1);
            let active = idx == self.focus;
            match row {
                Row::Text(slot) => field.render(frame, line_area, slot.label(), active),
                Row::Quick(quick) => {
                    let style = if active {
                        theme::table_selected()
                    } else {
                        Style::default().fg(theme::MIST)
                    };
                    frame.render_widget(
                        Paragraph::new(Line::from(vec![
                            Span::styled("▸ ", theme::key_hint()),
                            Span::styled(quick.label(), style),
                        ])),
                        line_area,
                    );
                }
            }
        }

        let hints = match self.rows.get(self.focus) {
            Some((Row::Quick(_), _)) => key_hints(&[("Enter", "show"), ("Tab", "next"), ("Esc", "close")]),
            _ => key_hints(&[("Enter", "apply"), ("Tab", "next"), ("Esc", "close")]),
        };
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::widgets::text_field::tests::key;

    const VISITOR: &[FilterField] = &[FilterField::Zone, FilterField::Date, FilterField::DateRange];

    fn type_into(panel: &mut FilterPanel, inputs: &mut FilterInputs, text: &str) {
        for c in text.chars() {
            panel.handle_key(key(KeyCode::Char(c)), inputs);
        }
    }

    #[test]
    fn date_range_takes_two_rows() {
        let panel = FilterPanel::new(VISITOR, &[], &FilterInputs::default());
        assert_eq!(panel.rows.len(), 4);
    }

    #[test]
    fn typing_writes_the_matching_input() {
        let mut inputs = FilterInputs::default();
        let mut panel = FilterPanel::new(VISITOR, &[], &inputs);

        type_into(&mut panel, &mut inputs, "Zone A");
        panel.handle_key(key(KeyCode::Tab), &mut inputs);
        panel.handle_key(key(KeyCode::Tab), &mut inputs);
        type_into(&mut panel, &mut inputs, "2024-01-01");
        panel.handle_key(key(KeyCode::Tab), &mut inputs);
        type_into(&mut panel, &mut inputs, "2024-01-31");

        assert_eq!(inputs.zone, "Zone A");
        assert_eq!(inputs.date, "");
        assert_eq!(inputs.from, "2024-01-01");
        assert_eq!(inputs.to, "2024-01-31");
        assert_eq!(panel.handle_key(key(KeyCode::Enter), &mut inputs), FilterEvent::Apply);
    }

    #[test]
    fn panel_starts_from_current_inputs() {
        let inputs = FilterInputs {
            zone: "Zone B".into(),
            ..FilterInputs::default()
        };
        let panel = FilterPanel::new(&[FilterField::Zone], &[], &inputs);
        assert_eq!(panel.rows[0].1.value(), "Zone B");
    }

    #[test]
    fn quick_rows_fire_on_enter() {
        let mut inputs = FilterInputs::default();
        let mut panel = FilterPanel::new(&[FilterField::Zone], &[QuickFilter::Active], &inputs);

        panel.handle_key(key(KeyCode::Down), &mut inputs);
        assert_eq!(
            panel.handle_key(key(KeyCode::Enter), &mut inputs),
            FilterEvent::Quick(QuickFilter::Active)
        );
        panel.handle_key(key(KeyCode::Char('x')), &mut inputs);
        assert!(inputs.is_empty());
        assert_eq!(panel.handle_key(key(KeyCode::Esc), &mut inputs), FilterEvent::Close);
    }
}
