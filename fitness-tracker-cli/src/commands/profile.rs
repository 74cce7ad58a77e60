use anyhow::Result;
use clap::Args;

use super::Context;
use crate::nav::Route;
use crate::pages::profile_rows;

#[derive(Args)]
pub struct ProfileCommand {}

impl ProfileCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let session = ctx.session_for(Route::Profile)?;

        if let Some(user) = session.user() {
            println!("Authenticated as:");
            println!();
            for (label, value) in profile_rows(user) {
                println!("  {:<6} {}", format!("{}:", label), value);
            }
        }

        Ok(())
    }
}
