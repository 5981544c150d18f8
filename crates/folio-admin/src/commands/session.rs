use super::print_json;
use crate::app::App;
use anyhow::{bail, Result};
use folio_core::{FolioError, ValidationError};
use tracing::info;

pub(super) async fn login(app: &App, email: &str, password: Option<String>) -> Result<()> {
    let Some(password) = password.or_else(|| std::env::var("FOLIO_PASSWORD").ok()) else {
        bail!("{}", FolioError::from(ValidationError::MissingCredentials).user_message());
    };

    let outcome = match app.session.login(email, &password).await {
        Ok(outcome) => outcome,
        Err(e) => bail!("{}", e.user_message()),
    };
    app.persist_session(&outcome.session)?;
    println!("Signed in as {}", email.trim());
    Ok(())
}

pub(super) async fn logout(app: &App) -> Result<()> {
    app.session.logout().await;
    app.clear_session()?;
    info!("[Auth] Returned to login");
    println!("Signed out");
    Ok(())
}

pub(super) fn whoami(app: &App, json: bool) -> Result<()> {
    app.require_login()?;
    let Some(session) = app.session.current_session() else {
        bail!("Not signed in");
    };
    if json {
        return print_json(&session.user);
    }
    match &session.user.email {
        Some(email) => println!("{} ({})", email, session.user.id),
        None => println!("{}", session.user.id),
    }
    Ok(())
}
