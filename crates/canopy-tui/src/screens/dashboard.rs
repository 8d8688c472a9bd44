//! Dashboard: welcome panel and the module menu.

use canopy_core::Session;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::key_hints;

fn describe(screen: ScreenId) -> &'static str {
    match screen {
        ScreenId::Animals => "Track wildlife species, population counts, and conservation status",
        ScreenId::Trees => "Monitor tree inventory, health status, and plantation records",
        ScreenId::Plants => "Catalog plant species, medicinal uses, and coverage areas",
        ScreenId::Officers => "Manage staff assignments, zones, and contact information",
        ScreenId::Visitors => "Track visitor entries, permits, and forest zone visits",
        ScreenId::Resources => "Monitor equipment, vehicles, and resource allocation",
        ScreenId::Login | ScreenId::Dashboard => "",
    }
}

pub struct DashboardScreen {
    focused: bool,
    username: String,
    role: Option<String>,
    selected: usize,
}

impl DashboardScreen {
    pub fn new(session: &Session) -> Self {
        Self {
            focused: false,
            username: session.username().to_owned(),
            role: session.user.role.clone(),
            selected: 0,
        }
    }

    fn selected_module(&self) -> Option<ScreenId> {
        ScreenId::MODULES.get(self.selected).copied()
    }

    fn render_welcome(&self, frame: &mut Frame, area: Rect) {
        let mut who = vec![
            Span::styled("Signed in as ", Style::default().fg(theme::STONE)),
            Span::styled(self.username.as_str(), theme::title_style()),
        ];
        if let Some(ref role) = self.role {
            who.push(Span::styled(format!(" ({role})"), Style::default().fg(theme::BARK)));
        }

        let text = vec![
            Line::from(Span::styled(
                "Welcome to Forest Management",
                Style::default().fg(theme::FERN).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Manage and monitor forest resources, wildlife, personnel, and visitor activities.",
                Style::default().fg(theme::MIST),
            )),
            Line::from(""),
            Line::from(who),
        ];

        let block = Block::default()
            .title(" Forest Management System ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = ScreenId::MODULES
            .iter()
            .map(|&screen| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!(" {} ", screen.number()), theme::key_hint_key()),
                        Span::styled(
                            screen.entity().map_or("", |kind| kind.heading()),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("    {}", describe(screen)),
                        Style::default().fg(theme::STONE),
                    )),
                ])
            })
            .collect();

        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Modules ")
                    .title_style(theme::title_style())
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border),
            )
            .style(theme::table_row())
            .highlight_style(theme::table_selected())
            .highlight_symbol("▸");

        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let last = ScreenId::MODULES.len() - 1;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.selected = (self.selected + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.selected = last,
            KeyCode::Enter => return Ok(self.selected_module().map(Action::SwitchScreen)),
            KeyCode::Char('l') => return Ok(Some(Action::Logout)),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_welcome(frame, layout[0]);
        self.render_menu(frame, layout[1]);

        let hints = key_hints(&[
            ("j/k", "move"),
            ("Enter", "open"),
            ("2-7", "jump"),
            ("l", "logout"),
            ("q", "quit"),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
