use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use super::prompt::{self, with_spinner};
use super::Context;
use crate::forms::{AuthForm, AuthMode};
use crate::nav::Route;

#[derive(Args)]
pub struct LoginCommand {
    /// Account email
    #[arg(short, long)]
    email: Option<String>,

    /// Password; prompted for when omitted
    #[arg(long, env = "FITNESS_TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args)]
pub struct SignupCommand {
    /// Display name
    #[arg(short, long)]
    name: Option<String>,

    /// Account email
    #[arg(short, long)]
    email: Option<String>,

    /// Password; prompted for when omitted
    #[arg(long, env = "FITNESS_TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let mut form = AuthForm::login();
        if let Some(email) = self.email {
            form.set_email(email);
        }
        if let Some(password) = self.password {
            form.set_password(password);
        }

        authenticate(ctx, form).await
    }
}

impl SignupCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let mut form = AuthForm::signup();
        if let Some(name) = self.name {
            form.set_name(name);
        }
        if let Some(email) = self.email {
            form.set_email(email);
        }
        if let Some(password) = self.password {
            form.set_password(password);
        }

        authenticate(ctx, form).await
    }
}

/// Submit the credential form until it succeeds, or once when nobody is
/// there to correct it
async fn authenticate(ctx: &Context, mut form: AuthForm) -> Result<()> {
    let route = match form.mode() {
        AuthMode::Login => Route::Login,
        AuthMode::Signup => Route::Signup,
    };
    let mut session = ctx.session_for(route)?;
    let interactive = prompt::is_interactive();

    if interactive {
        println!("Fitness Tracker - {}", form.title());
        println!();
        prompt::fill_fields(form.fields_mut(), true)?;
    }

    loop {
        let error = match form.credentials() {
            Ok(credentials) => {
                let result = with_spinner(
                    format!("{}...", form.submit_label()),
                    credentials.send(session.api()),
                )
                .await;

                match result {
                    Ok(response) => {
                        let user = session.establish(response);
                        println!("{} {} successful!", "✓".green(), form.submit_label());
                        println!();
                        println!("Welcome, {}!", user.name);
                        println!("Email: {}", user.email);
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::warn!("{} failed: {}", form.submit_label(), e);
                        form.fields_mut().fail(e.to_string());
                        e.to_string()
                    }
                }
            }
            Err(e) => e.to_string(),
        };

        if !interactive {
            bail!("{} failed: {}", form.submit_label(), error);
        }

        println!("{} {}", "✗".red(), error);
        println!();
        prompt::fill_fields(form.fields_mut(), false)?;
    }
}
