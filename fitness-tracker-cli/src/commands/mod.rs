mod admin;
mod config_cmd;
mod dashboard;
mod entity;
mod goals;
mod login;
mod logout;
mod profile;
mod prompt;
mod ui;
mod workouts;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::api::ApiError;
use crate::config::{ApiConfig, Config};
use crate::nav::{self, Route};
use crate::session::Session;

pub use admin::AdminCommand;
pub use dashboard::DashboardCommand;
pub use goals::GoalsSubcommands;
pub use login::{LoginCommand, SignupCommand};
pub use logout::LogoutCommand;
pub use profile::ProfileCommand;
pub use ui::UiCommand;
pub use workouts::WorkoutsSubcommands;

#[derive(Parser)]
#[command(name = "fitness-tracker")]
#[command(about = "Track workouts and fitness goals from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FITNESS_TRACKER_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the Fitness Tracker API
    #[arg(long, global = true, env = "FITNESS_TRACKER_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login to Fitness Tracker
    Login(LoginCommand),

    /// Create an account
    Signup(SignupCommand),

    /// Logout from Fitness Tracker
    Logout(LogoutCommand),

    /// Show the signed in user
    #[command(alias = "whoami")]
    Profile(ProfileCommand),

    /// Manage workouts
    #[command(subcommand)]
    Workouts(WorkoutsSubcommands),

    /// Manage goals
    #[command(subcommand)]
    Goals(GoalsSubcommands),

    /// Show recent workouts and goals
    Dashboard(DashboardCommand),

    /// Show statistics for every user (admin only)
    Admin(AdminCommand),

    /// Launch the interactive terminal UI
    Ui(UiCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Settings every command resolves its configuration from
pub struct Context {
    config_path: Option<PathBuf>,
    api_url: Option<String>,
}

impl Context {
    pub fn new(config_path: Option<PathBuf>, api_url: Option<String>) -> Self {
        Self {
            config_path,
            api_url,
        }
    }

    /// Configuration file in use, whether or not it exists yet
    pub fn config_file(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Config::config_file(),
        }
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Load the configuration file as saved
    pub fn load_config(&self) -> Result<Config> {
        Config::load_from(self.config_file()?)
    }

    /// Backend settings for this run: the saved ones with command line
    /// overrides applied. Overrides are never written back to the file.
    pub fn api_config(&self, config: &Config) -> ApiConfig {
        let mut api = config.api.clone();
        if let Some(url) = &self.api_url {
            api.base_url = url.clone();
        }
        api
    }

    pub fn session(&self) -> Result<Session> {
        let config = self.load_config()?;
        let api = self.api_config(&config);
        Session::restore_with_api(config, &api)
    }

    /// Open the session and check it may visit `route`
    pub fn session_for(&self, route: Route) -> Result<Session> {
        let session = self.session()?;
        require_route(&session, route)?;
        Ok(session)
    }
}

/// Fail unless the session is allowed on `route`
pub fn require_route(session: &Session, route: Route) -> Result<()> {
    let resolved = nav::resolve(route, session.user());
    if resolved == route {
        return Ok(());
    }

    tracing::debug!("{} redirected to {}", route, resolved);
    match resolved {
        Route::Login => bail!("You are not logged in. Use 'fitness-tracker login' to authenticate."),
        _ if route.requires_admin() => bail!("Admin access required."),
        _ => bail!("You are already logged in. Use 'fitness-tracker logout' first."),
    }
}

/// Drop a session the server no longer accepts
pub(crate) fn check_session<T>(session: &mut Session, result: &Result<T, ApiError>) {
    if let Err(e) = result {
        expire_if_rejected(session, e);
    }
}

pub(crate) fn expire_if_rejected(session: &mut Session, error: &ApiError) -> bool {
    if !error.is_unauthorized() {
        return false;
    }

    tracing::warn!("Session rejected by server: {}", error);
    session.logout();
    eprintln!(
        "{} Your session has expired. Use 'fitness-tracker login' to sign in again.",
        "!".yellow()
    );
    true
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the interactive UI will own the terminal
    pub fn is_ui(&self) -> bool {
        matches!(self.command, Commands::Ui(_))
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let ctx = Context::new(self.config, self.api_url);

        match self.command {
            Commands::Login(cmd) => cmd.execute(&ctx).await,
            Commands::Signup(cmd) => cmd.execute(&ctx).await,
            Commands::Logout(cmd) => cmd.execute(&ctx).await,
            Commands::Profile(cmd) => cmd.execute(&ctx).await,
            Commands::Workouts(subcmd) => subcmd.execute(&ctx).await,
            Commands::Goals(subcmd) => subcmd.execute(&ctx).await,
            Commands::Dashboard(cmd) => cmd.execute(&ctx).await,
            Commands::Admin(cmd) => cmd.execute(&ctx).await,
            Commands::Ui(cmd) => cmd.execute(&ctx).await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&ctx),
                ConfigSubcommands::Edit => config_cmd::edit_config(&ctx),
                ConfigSubcommands::Init { force } => config_cmd::init_config(&ctx, force),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::api::AuthResponse;

    fn session_with(role: Option<Role>) -> Session {
        let mut session = Session::restore(Config::default()).unwrap();
        if let Some(role) = role {
            session.establish(AuthResponse {
                user: User {
                    id: "u1".to_string(),
                    name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                    role,
                },
                token: "tok".to_string(),
            });
        }
        session
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_require_route() {
        let anonymous = session_with(None);
        assert!(require_route(&anonymous, Route::Login).is_ok());
        assert!(require_route(&anonymous, Route::Workouts).is_err());

        let user = session_with(Some(Role::User));
        assert!(require_route(&user, Route::Goals).is_ok());
        let err = require_route(&user, Route::Admin).unwrap_err();
        assert_eq!(err.to_string(), "Admin access required.");

        let admin = session_with(Some(Role::Admin));
        assert!(require_route(&admin, Route::Admin).is_ok());
    }

    #[test]
    fn test_api_url_override() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(
            Some(dir.path().join("config.toml")),
            Some("http://example.test/api".to_string()),
        );

        let config = ctx.load_config().unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(ctx.api_config(&config).base_url, "http://example.test/api");
        assert_eq!(ctx.session().unwrap().api().base_url(), "http://example.test/api");
    }
}
