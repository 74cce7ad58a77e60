use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;
use crate::nav::Route;
use crate::ui::{App, Tui};

#[derive(Args)]
pub struct UiCommand {
    /// Page to open first, e.g. /workouts
    #[arg(long, default_value = "/")]
    route: Route,
}

impl UiCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let session = ctx.session()?;
        let app = App::new(session, self.route);

        // The terminal is restored when `tui` is dropped
        let mut tui = Tui::new(app).context("Failed to start terminal UI")?;
        tui.run().await
    }
}
