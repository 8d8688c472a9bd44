//! All UI actions. Actions are the only way state changes outside a
//! component's own key handling.

use canopy_core::{Notification, Session};

use crate::screen::ScreenId;

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Session ───────────────────────────────────────────────────
    LoggedIn(Session),
    /// Login or signup was refused; the message is shown on the form.
    AuthFailed(String),
    Logout,

    // ── Data ──────────────────────────────────────────────────────
    /// A background request for this screen finished; its outcome is
    /// waiting on the screen's own channel.
    DataReady(ScreenId),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
