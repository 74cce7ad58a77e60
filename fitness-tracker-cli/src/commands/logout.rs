use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::Context;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let mut session = ctx.session()?;

        if !session.is_authenticated() {
            println!("You are not logged in.");
            return Ok(());
        }

        session.logout();

        println!("{} Logged out successfully!", "✓".green());

        Ok(())
    }
}
