//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use canopy_config::{Config, SessionStore};
use canopy_core::{ApiClient, Notification, Session, SessionContext};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::screens::login::LoginScreen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::toast::{Toasts, render_toast};
use crate::widgets::{centered, popup};

const HELP: &[(&str, &str)] = &[
    ("1-7", "Jump to screen"),
    ("Tab", "Next screen / next field"),
    ("j/k ↑/↓", "Move up/down"),
    ("g/G", "Top / bottom"),
    ("a", "Add record"),
    ("e Enter", "Edit record"),
    ("u", "Quick update"),
    ("d", "Delete (asks first)"),
    ("f", "Filter panel"),
    ("c", "Clear filters"),
    ("r", "Refresh"),
    ("Esc", "Back / close"),
    ("?", "This help"),
    ("q", "Quit"),
];

/// Top-level application state and event loop.
pub struct App {
    config: Config,
    /// On-disk session shared with the CLI.
    store: SessionStore,
    session: SessionContext,
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    toasts: Toasts,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: Config, store: SessionStore, session: Option<Session>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            config,
            store,
            session: SessionContext::new(session),
            active_screen: ScreenId::Login,
            previous_screen: None,
            screens: HashMap::new(),
            running: true,
            help_visible: false,
            toasts: Toasts::default(),
            action_tx,
            action_rx,
        }
    }

    /// Rebuild the screen set for the current session: the login form
    /// when signed out, otherwise the dashboard and the entity screens.
    fn mount(&mut self) -> Result<()> {
        let transport = self.config.transport(self.session.current());
        let client = Arc::new(ApiClient::new(&self.config.api_url, &transport)?);

        let screens = match self.session.current() {
            Some(session) => {
                self.active_screen = ScreenId::Dashboard;
                create_screens(&client, session)
            }
            None => {
                self.active_screen = ScreenId::Login;
                let login: Box<dyn Component> = Box::new(LoginScreen::new(client));
                vec![(ScreenId::Login, login)]
            }
        };
        self.previous_screen = None;
        self.screens = screens.into_iter().collect();

        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        debug!(screen = %self.active_screen, count = self.screens.len(), "screens mounted");
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.mount()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                // The next Render picks up the new size.
                Event::Resize(..) => {}
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    fn active(&self) -> Option<&dyn Component> {
        self.screens.get(&self.active_screen).map(Box::as_ref)
    }

    /// Global keys first, then the active screen. Global shortcuts step
    /// aside while the screen has a form or dialog open.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let captured = self.active().is_some_and(|s| s.captures_input());
        if !captured {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                KeyCode::Char(c @ '1'..='7') => {
                    let screen = c
                        .to_digit(10)
                        .and_then(|n| u8::try_from(n).ok())
                        .and_then(ScreenId::from_number);
                    if let Some(screen) = screen {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }
                KeyCode::Tab => return Ok(Some(Action::SwitchScreen(self.active_screen.next()))),
                KeyCode::BackTab => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
                }
                KeyCode::Esc if self.toasts.current().is_some() => {
                    return Ok(Some(Action::DismissNotification));
                }
                KeyCode::Esc => return Ok(Some(Action::GoBack)),
                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => self.switch_to(*target),

            Action::GoBack => {
                let target = self.previous_screen.take().unwrap_or(ScreenId::Dashboard);
                self.switch_to(target);
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Notify(notification) => self.toasts.push(notification.clone(), Instant::now()),

            Action::DismissNotification => self.toasts.dismiss(Instant::now()),

            Action::Tick => {
                self.toasts.expire(Instant::now());
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::Render => {}

            Action::LoggedIn(session) => {
                if let Err(err) = self.store.save(session) {
                    warn!(error = %err, "could not persist session");
                }
                let welcome = format!("Welcome, {}!", session.username());
                info!(user = session.username(), "signed in");
                self.session.login(session.clone());
                self.mount()?;
                self.toasts.push(Notification::success(welcome), Instant::now());
            }

            Action::Logout => {
                if let Some(session) = self.session.logout() {
                    info!(user = session.username(), "signed out");
                }
                if let Err(err) = self.store.clear() {
                    warn!(error = %err, "could not remove stored session");
                }
                self.mount()?;
                self.toasts.push(Notification::info("Logged out"), Instant::now());
            }

            // Outcomes go to the screen that asked, visible or not.
            Action::DataReady(id) => {
                if let Some(screen) = self.screens.get_mut(id) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn switch_to(&mut self, target: ScreenId) {
        if target == self.active_screen || !self.screens.contains_key(&target) {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let signed_in = self.session.is_authenticated();

        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(u16::from(signed_in)),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.active() {
            screen.render(frame, layout[0]);
        }
        if signed_in {
            self.render_tab_bar(frame, layout[1]);
        }
        self.render_status_bar(frame, layout[2]);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
        if let Some(toast) = self.toasts.current() {
            render_toast(frame, area, toast);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let who = match self.session.current() {
            Some(session) => Span::styled(
                format!("● {}", session.username()),
                Style::default().fg(theme::FERN),
            ),
            None => Span::styled("○ not signed in", Style::default().fg(theme::AMBER)),
        };
        let line = Line::from(vec![
            Span::raw(" "),
            who,
            Span::styled(format!(" │ {}", self.config.api_url), theme::key_hint()),
            Span::styled(" │ ? help  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let height = u16::try_from(HELP.len()).unwrap_or(u16::MAX).saturating_add(4);
    let rect = centered(area, 48, height);
    let inner = popup(frame, rect, "Keyboard Shortcuts", theme::border_focused());

    let mut lines: Vec<Line> = HELP
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(*what, theme::key_hint()),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Esc or ? to close", theme::key_hint())));
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use canopy_core::AuthUser;

    use super::*;
    use crate::widgets::text_field::tests::key;

    fn config() -> Config {
        Config {
            api_url: "http://127.0.0.1:9/api".into(),
            ..Config::default()
        }
    }

    fn session() -> Session {
        let user: AuthUser =
            serde_json::from_value(serde_json::json!({ "username": "ranger" })).unwrap();
        Session::new(user, None)
    }

    fn drain(app: &mut App) {
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
        }
    }

    #[test]
    fn signed_out_app_only_offers_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(config(), SessionStore::new(dir.path().join("session.json")), None);
        app.mount().unwrap();

        assert_eq!(app.active_screen, ScreenId::Login);
        assert_eq!(app.screens.len(), 1);
        // Login owns the keyboard, so digits are typed, not navigation.
        assert!(app.handle_key_event(key(KeyCode::Char('3'))).unwrap().is_none());
        app.process_action(&Action::SwitchScreen(ScreenId::Trees)).unwrap();
        assert_eq!(app.active_screen, ScreenId::Login);
    }

    #[tokio::test]
    async fn login_persists_session_and_logout_clears_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut app = App::new(config(), SessionStore::new(path.clone()), None);
        app.mount().unwrap();

        app.process_action(&Action::LoggedIn(session())).unwrap();
        assert!(path.exists());
        assert_eq!(app.active_screen, ScreenId::Dashboard);
        assert_eq!(app.screens.len(), 7);
        assert_eq!(
            app.toasts.current().map(|n| n.message.as_str()),
            Some("Welcome, ranger!")
        );

        app.process_action(&Action::Logout).unwrap();
        assert!(!path.exists());
        assert_eq!(app.active_screen, ScreenId::Login);
        assert!(!app.session.is_authenticated());
    }

    #[tokio::test]
    async fn number_keys_and_go_back_navigate() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let mut app = App::new(config(), store, Some(session()));
        app.mount().unwrap();

        let action = app.handle_key_event(key(KeyCode::Char('3'))).unwrap().unwrap();
        app.process_action(&action).unwrap();
        assert_eq!(app.active_screen, ScreenId::Trees);

        app.process_action(&Action::GoBack).unwrap();
        assert_eq!(app.active_screen, ScreenId::Dashboard);

        // Quit is global while nothing captures input.
        let action = app.handle_key_event(key(KeyCode::Char('q'))).unwrap().unwrap();
        app.process_action(&action).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn help_overlay_swallows_keys_until_closed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(config(), SessionStore::new(dir.path().join("s.json")), None);
        app.process_action(&Action::ToggleHelp).unwrap();

        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        let action = app.handle_key_event(key(KeyCode::Esc)).unwrap().unwrap();
        app.process_action(&action).unwrap();
        assert!(!app.help_visible);
    }

    #[test]
    fn notifications_queue_as_toasts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(config(), SessionStore::new(dir.path().join("s.json")), None);
        app.action_tx.send(Action::Notify(Notification::error("Failed to delete tree"))).unwrap();
        app.action_tx.send(Action::Notify(Notification::success("Tree added successfully!"))).unwrap();
        drain(&mut app);

        assert_eq!(
            app.toasts.current().map(|n| n.message.as_str()),
            Some("Failed to delete tree")
        );
        app.process_action(&Action::DismissNotification).unwrap();
        assert_eq!(
            app.toasts.current().map(|n| n.message.as_str()),
            Some("Tree added successfully!")
        );
    }
}
