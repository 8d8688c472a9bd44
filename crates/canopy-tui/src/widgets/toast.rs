//! Toast notifications, shown one at a time in the bottom-right corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use canopy_core::Notification;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::theme;

/// How long a toast stays up before the next one replaces it.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Default)]
pub struct Toasts {
    current: Option<(Notification, Instant)>,
    queue: VecDeque<Notification>,
}

impl Toasts {
    pub fn push(&mut self, notification: Notification, now: Instant) {
        if self.current.is_none() {
            self.current = Some((notification, now));
        } else {
            self.queue.push_back(notification);
        }
    }

    /// Drop the visible toast and bring up the next queued one.
    pub fn dismiss(&mut self, now: Instant) {
        self.current = self.queue.pop_front().map(|next| (next, now));
    }

    /// Dismiss the visible toast once it has been up for `TOAST_TTL`.
    pub fn expire(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|(_, shown)| now.duration_since(*shown) >= TOAST_TTL)
        {
            self.dismiss(now);
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(n, _)| n)
    }
}

pub fn render_toast(frame: &mut Frame, area: Rect, notification: &Notification) {
    let len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = len.saturating_add(6).clamp(20, area.width.saturating_sub(2).max(20));
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width.min(area.width), height.min(area.height));

    let (color, icon) = theme::notification(notification.level);

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notification.message.as_str(), Style::default().fg(theme::MIST)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
