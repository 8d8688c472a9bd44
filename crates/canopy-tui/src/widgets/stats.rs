//! Row of headline stat cards above an entity table.

use canopy_core::Stat;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::theme;

pub fn render_stats(frame: &mut Frame, area: Rect, stats: &[Stat]) {
    if stats.is_empty() {
        return;
    }
    let cards = Layout::horizontal(stats.iter().map(|_| Constraint::Fill(1))).split(area);

    for (stat, card) in stats.iter().zip(cards.iter()) {
        let block = Block::default()
            .title(format!(" {} ", stat.label))
            .title_style(theme::key_hint())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let value = Paragraph::new(stat.value.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme::FERN).add_modifier(Modifier::BOLD))
            .block(block);
        frame.render_widget(value, *card);
    }
}
