// ── Authentication forms ──
//
// Local checks run before anything is sent, then the login / signup
// call produces a `Session`.

use canopy_api::ApiClient;
use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;
use crate::session::Session;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.username.trim().is_empty() {
            return Err(CoreError::validation("Username is required"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(CoreError::validation("Password is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub accepted_terms: bool,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.username.trim().is_empty() {
            return Err(CoreError::validation("Username is required"));
        }
        if self.email.trim().is_empty() {
            return Err(CoreError::validation("Email is required"));
        }
        if self.password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(CoreError::validation("Password must be over 8 characters"));
        }
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(CoreError::validation("Passwords do not match"));
        }
        if !self.accepted_terms {
            return Err(CoreError::validation("Please agree to terms & conditions"));
        }
        Ok(())
    }
}

pub async fn login(client: &ApiClient, form: &LoginForm) -> Result<Session, CoreError> {
    form.validate()?;
    let resp = client.login(form.username.trim(), &form.password).await?;
    Ok(Session::new(resp.user, resp.token.map(SecretString::from)))
}

pub async fn signup(client: &ApiClient, form: &SignupForm) -> Result<Session, CoreError> {
    form.validate()?;
    let resp = client
        .signup(form.username.trim(), form.email.trim(), &form.password)
        .await?;
    Ok(Session::new(resp.user, resp.token.map(SecretString::from)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signup_form(password: &str, confirm: &str, accepted: bool) -> SignupForm {
        SignupForm {
            username: "warden".into(),
            email: "warden@forest.example".into(),
            password: password.to_string().into(),
            confirm_password: confirm.to_string().into(),
            accepted_terms: accepted,
        }
    }

    #[test]
    fn short_password_is_rejected_first() {
        let err = signup_form("short", "other", false).validate().unwrap_err();
        assert_eq!(err.to_string(), "Password must be over 8 characters");
    }

    #[test]
    fn mismatch_is_rejected() {
        let err = signup_form("longenough", "longenougH", true).validate().unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn terms_must_be_accepted() {
        let err = signup_form("longenough", "longenough", false).validate().unwrap_err();
        assert_eq!(err.to_string(), "Please agree to terms & conditions");
    }

    #[test]
    fn valid_signup_passes() {
        assert!(signup_form("longenough", "longenough", true).validate().is_ok());
    }

    #[test]
    fn login_needs_both_fields() {
        let form = LoginForm {
            username: " ".into(),
            password: "x".to_string().into(),
        };
        assert!(form.validate().is_err());
    }
}
