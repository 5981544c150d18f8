//! Command handlers.
//!
//! Every backend call goes through a [`RequestState`] so failures surface as
//! the same short messages the dashboard would show.

mod profile;
mod projects;
mod session;

use crate::app::App;
use crate::cli::Command;
use anyhow::{anyhow, Result};
use folio_core::RequestState;
use serde::Serialize;
use std::future::Future;

pub async fn run(app: &App, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Login { email, password } => session::login(app, &email, password).await,
        Command::Logout => session::logout(app).await,
        Command::Whoami => session::whoami(app, json),
        Command::Stats => {
            app.require_login()?;
            let stats = request(app.content.dashboard_stats()).await?;
            if json {
                print_json(&stats)
            } else {
                println!("Projects: {}", stats.projects);
                Ok(())
            }
        }
        Command::Profile(cmd) => {
            app.require_login()?;
            profile::run(app, cmd, json).await
        }
        Command::Projects(cmd) => {
            app.require_login()?;
            projects::run(app, cmd, json).await
        }
    }
}

/// Run one backend operation, turning its failure into the user-facing message.
async fn request<T, F>(op: F) -> Result<T>
where
    F: Future<Output = folio_core::Result<T>>,
{
    let state = RequestState::new();
    state
        .run(op)
        .await
        .ok_or_else(|| anyhow!(state.last_error().unwrap_or_default()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
