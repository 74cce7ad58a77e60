// Terminal interaction shared by the commands

use anyhow::Result;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

use crate::forms::{FieldKind, FieldSet};

/// Whether a person is at the terminal to answer prompts
pub fn is_interactive() -> bool {
    console::user_attended()
}

/// Ask for field values. With `only_empty` fields that already hold a value
/// are left alone; otherwise every field is asked for with its current value
/// offered as the starting text.
pub fn fill_fields(fields: &mut FieldSet, only_empty: bool) -> Result<()> {
    for index in 0..fields.fields().len() {
        let field = &fields.fields()[index];
        if only_empty && !field.value.is_empty() {
            continue;
        }

        let label = field.label;
        let current = field.value.clone();

        let value = match field.kind {
            FieldKind::Secret => Password::new().with_prompt(label).interact()?,
            FieldKind::Choice(choices) => {
                let default = choices.iter().position(|c| *c == current).unwrap_or(0);
                let selected = Select::new()
                    .with_prompt(label)
                    .items(choices)
                    .default(default)
                    .interact()?;
                choices.get(selected).copied().unwrap_or_default().to_string()
            }
            FieldKind::Text | FieldKind::Number => Input::<String>::new()
                .with_prompt(label)
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?,
        };

        fields.set(index, value);
    }

    Ok(())
}

/// Await a request behind a spinner on stderr
pub async fn with_spinner<T>(message: impl Into<String>, request: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let output = request.await;
    spinner.finish_and_clear();
    output
}
