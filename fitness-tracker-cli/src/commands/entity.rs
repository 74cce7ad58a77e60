// List, add, edit and delete for any collection the backend exposes

use anyhow::{bail, Context as _, Result};
use colored::Colorize;
use dialoguer::Confirm;

use super::prompt::{self, with_spinner};
use super::{check_session, expire_if_rejected, Context};
use crate::forms::{EntityForm, FormError};
use crate::models::Resource;
use crate::nav::Route;
use crate::pages::{EntityPage, ListPage, PageState, LOADING_MESSAGE};
use crate::session::Session;

fn label<F: EntityForm>() -> &'static str {
    <F::Resource as Resource>::LABEL
}

/// Print a fetched collection, one block per item. Returns an error when the
/// fetch failed so the command exits non-zero.
pub fn print_page<T>(
    title: &str,
    page: &ListPage<T>,
    empty_message: &str,
    render: impl Fn(&T) -> String,
) -> Result<()> {
    println!("{}", title.bold());
    println!("────────────────────────────────");

    match page.state() {
        PageState::Loading => println!("{}", LOADING_MESSAGE),
        PageState::Empty => println!("{}", empty_message.dimmed()),
        PageState::Ready(items) => {
            for item in items {
                println!("{}", render(item));
            }
        }
        PageState::Failed(message) => {
            println!("{} {}", "✗".red(), message);
            println!();
            bail!("Failed to load {}", title.to_lowercase());
        }
    }

    println!();
    Ok(())
}

pub async fn list<F: EntityForm>(
    ctx: &Context,
    route: Route,
    empty_message: &str,
    render: impl Fn(&F::Resource) -> String,
) -> Result<()> {
    let mut session = ctx.session_for(route)?;
    let mut page = EntityPage::<F>::new();

    let result = with_spinner(
        format!("Loading {}s...", label::<F>().to_lowercase()),
        page.refresh(session.api()),
    )
    .await;
    check_session(&mut session, &result);

    print_page(route.title(), page.list(), empty_message, render)
}

/// Values given on the command line, by field index
pub type Presets = Vec<(usize, Option<String>)>;

pub async fn add<F: EntityForm>(ctx: &Context, route: Route, presets: Presets) -> Result<()> {
    let mut session = ctx.session_for(route)?;
    let mut page = EntityPage::<F>::new();
    page.open_add();

    submit(&mut session, &mut page, presets, true).await
}

pub async fn edit<F: EntityForm>(
    ctx: &Context,
    route: Route,
    id: &str,
    presets: Presets,
) -> Result<()> {
    let mut session = ctx.session_for(route)?;
    let mut page = EntityPage::<F>::new();

    let result = with_spinner(
        format!("Loading {}s...", label::<F>().to_lowercase()),
        page.refresh(session.api()),
    )
    .await;
    check_session(&mut session, &result);
    result.with_context(|| format!("Failed to load {}s", label::<F>().to_lowercase()))?;

    if !page.open_edit(id) {
        bail!("{} {} not found", label::<F>(), id);
    }

    // Without flags every field is offered for editing
    let only_empty = presets.iter().any(|(_, value)| value.is_some());
    submit(&mut session, &mut page, presets, only_empty).await
}

/// Fill the open form and submit it, asking again after a failure when
/// someone is at the terminal
async fn submit<F: EntityForm>(
    session: &mut Session,
    page: &mut EntityPage<F>,
    presets: Presets,
    only_empty: bool,
) -> Result<()> {
    let interactive = prompt::is_interactive();

    let Some(form) = page.form_mut() else {
        bail!("No {} form open", label::<F>().to_lowercase());
    };
    for (index, value) in presets {
        if let Some(value) = value {
            form.fields_mut().set(index, value);
        }
    }
    let title = form.title();
    if interactive {
        println!("{}", title.bold());
        prompt::fill_fields(form.fields_mut(), only_empty)?;
    }

    loop {
        let result = with_spinner(
            format!("Saving {}...", label::<F>().to_lowercase()),
            page.submit(session.api()),
        )
        .await;

        let error = match result {
            Ok(Some(item)) => {
                println!("{} {} saved ({})", "✓".green(), label::<F>(), item.id());
                return report_count(session, page.list(), label::<F>());
            }
            Ok(None) => bail!("No {} form open", label::<F>().to_lowercase()),
            Err(e) => e,
        };

        if let FormError::Api(api_error) = &error {
            if expire_if_rejected(session, api_error) {
                return Err(error.into());
            }
        }
        if !interactive {
            return Err(anyhow::Error::new(error).context(format!("{} failed", title)));
        }

        println!("{} {}", "✗".red(), error);
        println!();
        if let Some(form) = page.form_mut() {
            prompt::fill_fields(form.fields_mut(), false)?;
        }
    }
}

pub async fn delete<F: EntityForm>(ctx: &Context, route: Route, id: &str, force: bool) -> Result<()> {
    let mut session = ctx.session_for(route)?;
    let name = label::<F>().to_lowercase();

    if !force {
        if !prompt::is_interactive() {
            bail!("Refusing to delete {} {} without confirmation; pass --force", name, id);
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} {}?", name, id))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut page = EntityPage::<F>::new();
    let result = with_spinner(format!("Deleting {}...", name), page.delete(session.api(), id)).await;
    check_session(&mut session, &result);

    match result {
        Ok(()) => {
            println!("{} {} {} deleted", "✓".green(), label::<F>(), id);
            report_count(&mut session, page.list(), label::<F>())
        }
        Err(e) => Err(anyhow::anyhow!(page
            .notice()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Could not delete {}: {}", name, e)))),
    }
}

/// Print the size of the collection refetched after a mutation. The
/// mutation went through either way, but a failed refetch fails the command.
fn report_count<T>(session: &mut Session, list: &ListPage<T>, label: &str) -> Result<()> {
    let name = label.to_lowercase();

    if let Some(error) = list.error() {
        expire_if_rejected(session, error);
        return Err(anyhow::Error::new(error.clone()).context(format!("Could not reload {}s", name)));
    }

    println!("You now have {} {}s.", list.items().len(), name);
    Ok(())
}
