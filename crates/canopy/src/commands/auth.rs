//! Login, signup and session commands.

use dialoguer::Input;
use secrecy::SecretString;

use canopy_core::auth::{self, LoginForm, SignupForm};
use canopy_core::{Session, SessionContext};

use crate::cli::{LoginArgs, OutputFormat, SignupArgs};
use crate::config::{self, SessionStore, Settings};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(args: LoginArgs, settings: &Settings) -> Result<(), CliError> {
    let username = match args.username {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = util::read_password("Password: ", args.password_env.as_deref())?;

    let form = LoginForm {
        username,
        password: SecretString::from(password),
    };
    let client = config::connect(settings, None)?;
    let session = util::with_spinner(settings, "Signing in".into(), auth::login(&client, &form)).await?;
    remember(&session, settings)
}

pub async fn signup(args: SignupArgs, settings: &Settings) -> Result<(), CliError> {
    let password = util::read_password("Password: ", args.password_env.as_deref())?;
    let confirm_password = match args.password_env {
        Some(_) => password.clone(),
        None => util::read_password("Confirm password: ", None)?,
    };

    let form = SignupForm {
        username: args.username,
        email: args.email,
        password: SecretString::from(password),
        confirm_password: SecretString::from(confirm_password),
        accepted_terms: args.accept_terms,
    };
    // Local checks first, so a bad form never reaches the service.
    form.validate()?;

    let client = config::connect(settings, None)?;
    let session =
        util::with_spinner(settings, "Creating account".into(), auth::signup(&client, &form)).await?;
    remember(&session, settings)
}

pub fn logout(settings: &Settings) -> Result<(), CliError> {
    let mut context = SessionContext::new(config::stored_session());
    let previous = context.logout();
    SessionStore::default().clear()?;

    if !settings.quiet {
        match previous {
            Some(session) => eprintln!("Logged out {}", session.username()),
            None => eprintln!("No active session"),
        }
    }
    Ok(())
}

pub fn whoami(settings: &Settings) -> Result<(), CliError> {
    let context = SessionContext::new(config::stored_session());
    let session = context.current().ok_or(CliError::NoSession)?;
    let user = &session.user;

    let out = match settings.output {
        OutputFormat::Table | OutputFormat::Plain => {
            let mut lines = vec![format!("Username:   {}", user.username)];
            if let Some(ref email) = user.email {
                lines.push(format!("Email:      {email}"));
            }
            if let Some(ref role) = user.role {
                lines.push(format!("Role:       {role}"));
            }
            lines.push(format!(
                "Logged in:  {}",
                session.logged_in_at.format("%Y-%m-%d %H:%M UTC")
            ));
            lines.join("\n")
        }
        OutputFormat::JsonCompact => serde_json::to_string(user)?,
        OutputFormat::Yaml => serde_yaml::to_string(user)?,
        OutputFormat::Json => serde_json::to_string_pretty(user)?,
    };
    output::print_output(&out, settings.quiet);
    Ok(())
}

fn remember(session: &Session, settings: &Settings) -> Result<(), CliError> {
    SessionStore::default().save(session)?;
    if !settings.quiet {
        eprintln!("Logged in as {}", session.username());
    }
    Ok(())
}
