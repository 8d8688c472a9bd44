// ── Session context ──
//
// Explicit replacement for an ambient "current user" slot. Login sets it,
// logout clears it, nothing expires it.

use canopy_api::AuthUser;
use chrono::{DateTime, Utc};
use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct Session {
    pub user: AuthUser,
    /// Bearer token issued at login, if the service hands one out.
    pub token: Option<SecretString>,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: AuthUser, token: Option<SecretString>) -> Self {
        Self {
            user,
            token,
            logged_in_at: Utc::now(),
        }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn new(current: Option<Session>) -> Self {
        Self { current }
    }

    pub fn login(&mut self, session: Session) {
        tracing::info!(user = session.username(), "session started");
        self.current = Some(session);
    }

    /// Clear the session, returning whatever was there.
    pub fn logout(&mut self) -> Option<Session> {
        let previous = self.current.take();
        if let Some(ref session) = previous {
            tracing::info!(user = session.username(), "session ended");
        }
        previous
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&SecretString> {
        self.current.as_ref().and_then(|s| s.token.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> AuthUser {
        AuthUser {
            id: Some(1),
            username: name.into(),
            email: None,
            role: Some("ADMIN".into()),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn login_then_logout() {
        let mut ctx = SessionContext::default();
        assert!(!ctx.is_authenticated());

        ctx.login(Session::new(user("ranger"), Some("tok".to_string().into())));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.current().map(Session::username), Some("ranger"));
        assert!(ctx.token().is_some());

        let previous = ctx.logout();
        assert_eq!(previous.map(|s| s.user.username), Some("ranger".to_owned()));
        assert!(ctx.current().is_none());
        assert!(ctx.logout().is_none());
    }
}
