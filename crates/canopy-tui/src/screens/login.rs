//! Sign-in / sign-up screen, shown whenever there is no session.
//!
//! The form is checked locally first; only a valid form is sent. The
//! result comes back as `Action::LoggedIn` or `Action::AuthFailed`.

use std::sync::Arc;

use canopy_core::ApiClient;
use canopy_core::auth::{self, LoginForm, SignupForm};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use secrecy::SecretString;
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::text_field::{LABEL_WIDTH, TextField};
use crate::widgets::{centered, key_hints, popup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Email,
    Password,
    Confirm,
    Terms,
}

impl Field {
    fn visible(mode: Mode) -> &'static [Field] {
        match mode {
            Mode::SignIn => &[Self::Username, Self::Password],
            Mode::SignUp => &[
                Self::Username,
                Self::Email,
                Self::Password,
                Self::Confirm,
                Self::Terms,
            ],
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::Confirm => "Confirm password",
            Self::Terms => "I agree to the terms & conditions",
        }
    }
}

pub struct LoginScreen {
    client: Arc<ApiClient>,
    action_tx: Option<UnboundedSender<Action>>,
    mode: Mode,
    focus: Field,
    username: TextField,
    email: TextField,
    password: TextField,
    confirm: TextField,
    accepted_terms: bool,
    submitting: bool,
    error: Option<String>,
    throbber: ThrobberState,
}

impl LoginScreen {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            action_tx: None,
            mode: Mode::SignIn,
            focus: Field::Username,
            username: TextField::default(),
            email: TextField::default(),
            password: TextField::masked(),
            confirm: TextField::masked(),
            accepted_terms: false,
            submitting: false,
            error: None,
            throbber: ThrobberState::default(),
        }
    }

    fn switch_mode(&mut self) {
        self.mode = match self.mode {
            Mode::SignIn => Mode::SignUp,
            Mode::SignUp => Mode::SignIn,
        };
        self.password.clear();
        self.confirm.clear();
        self.error = None;
        if !Field::visible(self.mode).contains(&self.focus) {
            self.focus = Field::Username;
        }
    }

    fn step(&mut self, forward: bool) {
        let fields = Field::visible(self.mode);
        let pos = fields.iter().position(|&f| f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % fields.len()
        } else {
            (pos + fields.len() - 1) % fields.len()
        };
        if let Some(&field) = fields.get(next) {
            self.focus = field;
        }
    }

    fn input_mut(&mut self, field: Field) -> Option<&mut TextField> {
        match field {
            Field::Username => Some(&mut self.username),
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            Field::Confirm => Some(&mut self.confirm),
            Field::Terms => None,
        }
    }

    fn input(&self, field: Field) -> Option<&TextField> {
        match field {
            Field::Username => Some(&self.username),
            Field::Email => Some(&self.email),
            Field::Password => Some(&self.password),
            Field::Confirm => Some(&self.confirm),
            Field::Terms => None,
        }
    }

    fn submit(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let client = Arc::clone(&self.client);
        let username = self.username.value().to_owned();
        let password = SecretString::from(self.password.value().to_owned());

        match self.mode {
            Mode::SignIn => {
                let form = LoginForm { username, password };
                if let Err(err) = form.validate() {
                    self.error = Some(err.to_string());
                    return;
                }
                tokio::spawn(async move {
                    let action = match auth::login(&client, &form).await {
                        Ok(session) => Action::LoggedIn(session),
                        Err(err) => Action::AuthFailed(err.to_string()),
                    };
                    let _ = tx.send(action);
                });
            }
            Mode::SignUp => {
                let form = SignupForm {
                    username,
                    email: self.email.value().to_owned(),
                    password,
                    confirm_password: SecretString::from(self.confirm.value().to_owned()),
                    accepted_terms: self.accepted_terms,
                };
                if let Err(err) = form.validate() {
                    self.error = Some(err.to_string());
                    return;
                }
                tokio::spawn(async move {
                    let action = match auth::signup(&client, &form).await {
                        Ok(session) => Action::LoggedIn(session),
                        Err(err) => Action::AuthFailed(err.to_string()),
                    };
                    let _ = tx.send(action);
                });
            }
        }
        self.error = None;
        self.submitting = true;
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        let fields = Field::visible(self.mode);
        let rows = Layout::vertical(fields.iter().map(|_| Constraint::Length(2))).split(area);

        for (field, row) in fields.iter().zip(rows.iter()) {
            let line = Rect::new(row.x, row.y, row.width, 1);
            let active = *field == self.focus && !self.submitting;
            match self.input(*field) {
                Some(input) => input.render(frame, line, field.label(), active),
                None => {
                    let marker = if self.accepted_terms { "[✓] " } else { "[ ] " };
                    let style = if active {
                        Style::default().fg(theme::LICHEN)
                    } else {
                        Style::default().fg(theme::MIST)
                    };
                    frame.render_widget(
                        Paragraph::new(Line::from(vec![
                            Span::styled(marker, Style::default().fg(theme::FERN)),
                            Span::styled(field.label(), style),
                        ])),
                        line,
                    );
                }
            }
        }
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.submitting {
            return Ok(None);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.switch_mode();
            return Ok(None);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.step(true),
            KeyCode::BackTab | KeyCode::Up => self.step(false),
            KeyCode::Enter => self.submit(),
            KeyCode::Char(' ') if self.focus == Field::Terms => {
                self.accepted_terms = !self.accepted_terms;
            }
            _ => {
                if let Some(input) = self.input_mut(self.focus) {
                    if input.handle_key(key) {
                        self.error = None;
                    }
                }
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AuthFailed(message) => {
                self.submitting = false;
                self.password.clear();
                self.confirm.clear();
                self.error = Some(message.clone());
            }
            Action::Tick if self.submitting => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Block::default().style(Style::default().bg(theme::BG_DARK)), area);

        let field_count = u16::try_from(Field::visible(self.mode).len()).unwrap_or(0);
        let panel = centered(area, LABEL_WIDTH + 40, field_count * 2 + 7);
        let title = match self.mode {
            Mode::SignIn => "Canopy · Sign in",
            Mode::SignUp => "Canopy · Create account",
        };
        let inner = popup(frame, panel, title, theme::border_focused());

        let layout = Layout::vertical([
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // fields
            Constraint::Length(1), // status
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_fields(frame, layout[1]);

        if self.submitting {
            let label = match self.mode {
                Mode::SignIn => "Signing in...",
                Mode::SignUp => "Creating account...",
            };
            let throbber = Throbber::default()
                .label(label)
                .style(Style::default().fg(theme::LICHEN))
                .throbber_style(Style::default().fg(theme::FERN));
            frame.render_stateful_widget(throbber, layout[2], &mut self.throbber.clone());
        } else if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(err.as_str(), theme::error_text()))
                    .alignment(Alignment::Center),
                layout[2],
            );
        }

        let switch = match self.mode {
            Mode::SignIn => "create account",
            Mode::SignUp => "sign in instead",
        };
        let hints = key_hints(&[("Tab", "next"), ("Enter", "submit"), ("Ctrl+S", switch), ("Ctrl+C", "quit")]);
        frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), layout[3]);
    }

    fn captures_input(&self) -> bool {
        true
    }
}
