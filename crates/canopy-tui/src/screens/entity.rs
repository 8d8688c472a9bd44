//! Generic management screen, instantiated once per record type.
//!
//! Key handling turns into `ViewController` intents. Any gateway call the
//! controller asks for runs on a spawned task; its `Outcome` comes back
//! over the screen's own channel and is applied when the app routes
//! `Action::DataReady` here.

use canopy_core::form::to_json_map;
use canopy_core::schema::value_text;
use canopy_core::{
    Entity, EntityId, FieldSpec, Filter, FormMode, HttpGateway, Notification, Outcome, Request,
    ViewController,
};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::filter::{FilterEvent, FilterPanel};
use crate::widgets::form::{FormEvent, FormOverlay};
use crate::widgets::stats::render_stats;
use crate::widgets::{centered, key_hints, popup};

/// Columns coloured by the record's severity.
const STATUS_KEYS: &[&str] = &[
    "conservationStatus",
    "healthStatus",
    "status",
    "conditionStatus",
];

#[derive(Debug)]
enum Overlay {
    Closed,
    Form(FormOverlay),
    Filters(FilterPanel),
}

pub struct EntityScreen<E: Entity> {
    id: ScreenId,
    focused: bool,
    view: ViewController<E>,
    gateway: HttpGateway,
    action_tx: Option<UnboundedSender<Action>>,
    outcome_tx: UnboundedSender<Outcome<E>>,
    outcome_rx: UnboundedReceiver<Outcome<E>>,
    selected: usize,
    overlay: Overlay,
    throbber: ThrobberState,
}

impl<E: Entity> EntityScreen<E> {
    pub fn new(gateway: HttpGateway) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            id: ScreenId::for_entity(E::KIND),
            focused: false,
            view: ViewController::new(),
            gateway,
            action_tx: None,
            outcome_tx,
            outcome_rx,
            selected: 0,
            overlay: Overlay::Closed,
            throbber: ThrobberState::default(),
        }
    }

    // ── Effects ──────────────────────────────────────────────────────

    /// Run a controller request in the background.
    fn dispatch(&self, request: Request<E>) {
        let Some(action_tx) = self.action_tx.clone() else {
            return;
        };
        let gateway = self.gateway.clone();
        let outcome_tx = self.outcome_tx.clone();
        let id = self.id;
        debug!(kind = %E::KIND, ?request, "dispatching request");
        tokio::spawn(async move {
            let outcome = request.execute(&gateway).await;
            if outcome_tx.send(outcome).is_ok() {
                let _ = action_tx.send(Action::DataReady(id));
            }
        });
    }

    /// Apply every finished outcome.
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.view.complete(outcome);
        }
        if !self.view.mode().is_open() && matches!(self.overlay, Overlay::Form(_)) {
            self.overlay = Overlay::Closed;
        }
        self.clamp_selection();
        self.flush_notifications();
    }

    fn flush_notifications(&mut self) {
        for notification in self.view.drain_notifications() {
            self.notify(notification);
        }
    }

    fn notify(&self, notification: Notification) {
        if let Some(tx) = &self.action_tx {
            let _ = tx.send(Action::Notify(notification));
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    fn selected_id(&self) -> Option<EntityId> {
        self.view.records().get(self.selected).and_then(Entity::id)
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.view.records().len().saturating_sub(1));
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.view.records().len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    // ── Intents ──────────────────────────────────────────────────────

    fn open_form(&mut self) {
        let fields: Vec<&'static FieldSpec> = match self.view.mode() {
            FormMode::EditPartial(_) => E::quick_fields().collect(),
            _ => E::FIELDS.iter().collect(),
        };
        let title = self.view.mode().title(E::KIND.title());
        self.overlay = Overlay::Form(FormOverlay::new(title, fields, self.view.draft()));
    }

    fn edit_selected(&mut self, quick: bool) {
        let Some(id) = self.selected_id() else {
            self.notify(Notification::info(format!("No {} selected", E::KIND.noun())));
            return;
        };
        let opened = if quick {
            self.view.open_quick_update(id)
        } else {
            self.view.open_edit(id)
        };
        match opened {
            Ok(()) => self.open_form(),
            Err(err) => {
                let verb = if quick { "update" } else { "edit" };
                self.notify(Notification::error(format!(
                    "Cannot {verb} {}: {err}",
                    E::KIND.noun()
                )));
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.view.records().len().saturating_sub(1);
            }
            KeyCode::Char('r') => {
                let request = self.view.refresh();
                self.dispatch(request);
            }
            KeyCode::Char('a') => {
                self.view.open_add();
                self.open_form();
            }
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(false),
            KeyCode::Char('u') => self.edit_selected(true),
            KeyCode::Char('d') => match self.selected_id() {
                Some(id) => self.view.request_delete(id),
                None => self.notify(Notification::info(format!("No {} selected", E::KIND.noun()))),
            },
            KeyCode::Char('f') => {
                self.overlay = Overlay::Filters(FilterPanel::new(
                    E::FILTERS,
                    E::QUICK_FILTERS,
                    self.view.filters(),
                ));
            }
            KeyCode::Char('c') => {
                let request = self.view.clear_filters();
                self.dispatch(request);
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Overlay::Form(form) = &mut self.overlay else {
            return;
        };
        match form.handle_key(key, self.view.draft_mut()) {
            FormEvent::Submit => match self.view.save() {
                Some(request) => self.dispatch(request),
                None => self.flush_notifications(),
            },
            FormEvent::Cancel => {
                self.view.cancel();
                self.overlay = Overlay::Closed;
            }
            FormEvent::Edited | FormEvent::Handled => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let Overlay::Filters(panel) = &mut self.overlay else {
            return;
        };
        let request = match panel.handle_key(key, self.view.filters_mut()) {
            FilterEvent::Apply => self.view.apply_filters(),
            FilterEvent::Quick(quick) => self.view.apply_quick_filter(quick),
            FilterEvent::Close => {
                self.overlay = Overlay::Closed;
                return;
            }
            FilterEvent::Handled => return,
        };
        match request {
            Some(request) => {
                self.overlay = Overlay::Closed;
                self.dispatch(request);
            }
            // Bad input: keep the panel open so it can be corrected.
            None => self.flush_notifications(),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let confirmed = match key.code {
            KeyCode::Char('y' | 'Y') => true,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => false,
            _ => return,
        };
        if let Some(request) = self.view.resolve_delete(confirmed) {
            self.dispatch(request);
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let filter = self
            .view
            .applied_filter()
            .map_or_else(|| "all records".to_owned(), describe_filter);
        let count = self.view.records().len();
        let noun = E::KIND.noun();
        let line = Line::from(vec![
            Span::styled(" Showing ", theme::key_hint()),
            Span::styled(filter, Style::default().fg(theme::LICHEN)),
            Span::styled(
                format!("  ·  {count} {noun}{}", if count == 1 { "" } else { "s" }),
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        if self.view.is_loading() && !matches!(self.overlay, Overlay::Form(_)) {
            let width = 14.min(area.width);
            let spinner_area = Rect::new(area.right().saturating_sub(width), area.y, width, 1);
            let throbber = Throbber::default()
                .label("Loading...")
                .style(Style::default().fg(theme::LICHEN))
                .throbber_style(Style::default().fg(theme::FERN));
            frame.render_stateful_widget(throbber, spinner_area, &mut self.throbber.clone());
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if self.view.records().is_empty() {
            let text = if self.view.is_loading() {
                format!("Loading {}s...", E::KIND.noun())
            } else {
                format!("No {}s found", E::KIND.noun())
            };
            let empty = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(theme::key_hint())
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            std::iter::once("ID").chain(E::COLUMNS.iter().map(|key| column_label::<E>(key))),
        )
        .style(theme::table_header());

        let rows = self.view.records().iter().map(|record| {
            let image = to_json_map(record).unwrap_or_default();
            let id = record.id().map(|id| id.to_string()).unwrap_or_default();
            let cells = std::iter::once(Cell::from(id)).chain(E::COLUMNS.iter().map(|key| {
                let text = image.get(*key).map(value_text).unwrap_or_default();
                if STATUS_KEYS.contains(key) {
                    Cell::from(text).style(theme::severity(record.severity()))
                } else {
                    Cell::from(text)
                }
            }));
            Row::new(cells).style(theme::table_row())
        });

        let widths = std::iter::once(Constraint::Length(6))
            .chain(E::COLUMNS.iter().map(|_| Constraint::Fill(1)));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let mut pairs = vec![("j/k", "move"), ("a", "add"), ("e", "edit")];
        if E::supports_quick_update() {
            pairs.push(("u", "quick update"));
        }
        pairs.extend([("d", "delete"), ("f", "filter"), ("c", "clear"), ("r", "refresh")]);
        frame.render_widget(Paragraph::new(key_hints(&pairs)), area);
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect, id: EntityId) {
        let name = self
            .view
            .record(id)
            .map_or_else(|| format!("#{id}"), |r| format!("{} (#{id})", r.display_name()));
        let rect = centered(area, 56, 6);
        let inner = popup(frame, rect, "Confirm", Style::default().fg(theme::AMBER));
        let text = vec![
            Line::from(Span::styled(
                format!(" Are you sure you want to delete this {}?", E::KIND.noun()),
                Style::default().fg(theme::MIST),
            )),
            Line::from(Span::styled(format!(" {name}"), theme::key_hint())),
            Line::from(""),
            key_hints(&[("y", "delete"), ("n", "cancel")]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }
}

impl<E: Entity> Component for EntityScreen<E> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        let request = self.view.refresh();
        self.dispatch(request);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.view.pending_delete().is_some() {
            self.handle_confirm_key(key);
        } else {
            match self.overlay {
                Overlay::Form(_) => self.handle_form_key(key),
                Overlay::Filters(_) => self.handle_filter_key(key),
                Overlay::Closed => self.handle_list_key(key),
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DataReady(id) if *id == self.id => self.drain_outcomes(),
            Action::Tick if self.view.is_loading() => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", E::KIND.heading()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // filter / count / spinner
            Constraint::Length(3), // stat cards
            Constraint::Min(3),    // table
            Constraint::Length(1), // key hints
        ])
        .split(inner);

        self.render_status_line(frame, layout[0]);
        render_stats(frame, layout[1], &self.view.stats());
        self.render_table(frame, layout[2]);
        self.render_hints(frame, layout[3]);

        match &self.overlay {
            Overlay::Form(form) => {
                let saving = self.view.is_loading().then_some(&self.throbber);
                form.render(frame, area, self.view.draft(), saving);
            }
            Overlay::Filters(panel) => {
                panel.render(frame, area, &format!("Filter {}s", E::KIND.title()));
            }
            Overlay::Closed => {}
        }

        if let Some(id) = self.view.pending_delete() {
            self.render_confirm(frame, area, id);
        }
    }

    fn captures_input(&self) -> bool {
        !matches!(self.overlay, Overlay::Closed) || self.view.pending_delete().is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

fn column_label<E: Entity>(key: &str) -> &str {
    E::field(key).map_or(key, |f| f.label)
}

fn describe_filter(filter: &Filter) -> String {
    match filter {
        Filter::Zone(zone) => format!("zone {zone}"),
        Filter::ConservationStatus(status) | Filter::HealthStatus(status) => {
            format!("status {status}")
        }
        Filter::Type(kind) => format!("type {kind}"),
        Filter::Medicinal => "medicinal only".into(),
        Filter::Active => "active only".into(),
        Filter::Date(date) => format!("date {date}"),
        Filter::DateRange { start, end } => format!("{start} to {end}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use canopy_core::{Animal, ApiClient, Tree, TransportConfig, Visitor};
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn screen<E: Entity>() -> (EntityScreen<E>, mpsc::UnboundedReceiver<Action>) {
        let client = ApiClient::new("http://127.0.0.1:9/api", &TransportConfig::default()).unwrap();
        let mut screen = EntityScreen::new(HttpGateway::new(Arc::new(client)));
        let (tx, rx) = mpsc::unbounded_channel();
        // Mounted without `init`, so nothing is fetched.
        screen.action_tx = Some(tx);
        (screen, rx)
    }

    fn press(screen: &mut EntityScreen<impl Entity>, code: KeyCode) {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    fn notifications(rx: &mut mpsc::UnboundedReceiver<Action>) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(action) = rx.try_recv() {
            if let Action::Notify(n) = action {
                out.push(n);
            }
        }
        out
    }

    #[test]
    fn add_opens_and_escape_closes_the_form() {
        let (mut screen, _rx) = screen::<Animal>();
        press(&mut screen, KeyCode::Char('a'));
        assert_eq!(screen.view.mode(), FormMode::Add);
        assert!(screen.captures_input());

        press(&mut screen, KeyCode::Esc);
        assert_eq!(screen.view.mode(), FormMode::Closed);
        assert!(!screen.captures_input());
    }

    #[test]
    fn saving_an_invalid_draft_reports_and_stays_open() {
        let (mut screen, mut rx) = screen::<Tree>();
        press(&mut screen, KeyCode::Char('a'));
        press(&mut screen, KeyCode::Enter);

        assert_eq!(screen.view.mode(), FormMode::Add);
        assert!(!screen.view.is_loading());
        let notes = notifications(&mut rx);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.starts_with("Failed to save tree"));
    }

    #[test]
    fn editing_with_an_empty_list_is_a_no_op() {
        let (mut screen, mut rx) = screen::<Animal>();
        press(&mut screen, KeyCode::Char('e'));
        press(&mut screen, KeyCode::Char('d'));

        assert_eq!(screen.view.mode(), FormMode::Closed);
        assert!(screen.view.pending_delete().is_none());
        assert_eq!(notifications(&mut rx)[0].message, "No animal selected");
    }

    #[test]
    fn half_date_range_keeps_the_filter_panel_open() {
        let (mut screen, mut rx) = screen::<Visitor>();
        press(&mut screen, KeyCode::Char('f'));
        // Zone, Date, From, To
        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Tab);
        for c in "2024-01-01".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        press(&mut screen, KeyCode::Enter);

        assert!(matches!(screen.overlay, Overlay::Filters(_)));
        let notes = notifications(&mut rx);
        assert!(notes[0].message.contains(canopy_core::filter::DATE_RANGE_INCOMPLETE));
    }

    #[test]
    fn list_keys_are_not_captured() {
        let (mut screen, _rx) = screen::<Animal>();
        assert!(!screen.captures_input());
        press(&mut screen, KeyCode::Char('f'));
        assert!(screen.captures_input());
        press(&mut screen, KeyCode::Esc);
        assert!(!screen.captures_input());
    }

    #[test]
    fn renders_heading_and_empty_state() {
        let (screen, _rx) = screen::<Tree>();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| screen.render(frame, frame.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(ratatui::buffer::Cell::symbol).collect();
        assert!(text.contains("Tree Management"));
        assert!(text.contains("No trees found"));
        assert!(text.contains("Total Trees"));
    }
}
