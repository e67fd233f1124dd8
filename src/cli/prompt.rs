//! Interactive step prompting
//!
//! Binds each field of the active step to a themed dialoguer prompt with
//! live validation, pre-populating from accumulated values when a step is
//! re-entered. Secrets go through masked password prompts and are never
//! echoed.

use console::style;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Input, Password, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::display_value;
use crate::core::config::ThemePreference;
use crate::core::field::{FieldId, InputKind};
use crate::core::record::FormRecord;
use crate::core::step::StepDef;
use crate::core::wizard::Wizard;
use crate::schema::validator::StepValidator;

/// What the user chose to do after filling in the active step
pub enum StepOutcome {
    /// Proceed with the entered values (Next, or Submit on the last step)
    Forward(FormRecord),
    /// Go back one step; entered values are discarded
    Back,
    /// Abort the wizard
    Cancel,
}

/// Prompt theme for a display preference
///
/// Colorful prompt glyphs assume a dark background; the light preference
/// falls back to the unstyled theme.
pub fn theme_for(pref: ThemePreference) -> Box<dyn Theme> {
    match pref {
        ThemePreference::Light => Box::new(SimpleTheme),
        ThemePreference::Dark | ThemePreference::System => Box::new(ColorfulTheme::default()),
    }
}

/// Collect the active step's fields, then ask how to proceed
pub fn prompt_step(wizard: &Wizard, theme: &dyn Theme) -> Result<StepOutcome> {
    let step = wizard.active_step();
    let prefill = wizard.prefill();
    let validator = wizard.validator();

    println!();
    println!(
        "{} Step {} of {}: {}",
        style("◆").cyan(),
        wizard.position() + 1,
        wizard.registry().len(),
        style(step.name).bold()
    );
    println!();

    let mut entered = FormRecord::new();
    for field in step.fields {
        let value = prompt_field(*field, step, validator, &entered, &prefill, theme)?;
        entered.set(*field, value);
    }

    if wizard.is_last() {
        print_summary(wizard.accumulated(), &entered);
    }

    prompt_navigation(wizard, entered, theme)
}

/// One prompt for one field, validated live against the step schema
fn prompt_field(
    field: FieldId,
    step: &StepDef,
    validator: &StepValidator,
    entered: &FormRecord,
    prefill: &FormRecord,
    theme: &dyn Theme,
) -> Result<String> {
    let check = |input: &String| -> std::result::Result<(), String> {
        let mut candidate = entered.clone();
        candidate.set(field, input.as_str());
        match validator.check_field(step, field, &candidate) {
            Some(message) => Err(message),
            None => Ok(()),
        }
    };

    let value: String = match field.kind() {
        // Masked prompts re-ask until the entry passes the step schema
        InputKind::Password => loop {
            let entry = Password::with_theme(theme)
                .with_prompt(field.label())
                .allow_empty_password(true)
                .interact()
                .into_diagnostic()?;
            match check(&entry) {
                Ok(()) => break entry,
                Err(message) => eprintln!("{} {}", style("✗").red(), message),
            }
        },
        _ => match prefill.get(field) {
            Some(initial) => Input::with_theme(theme)
                .with_prompt(field.label())
                .with_initial_text(initial)
                .allow_empty(true)
                .validate_with(check)
                .interact_text()
                .into_diagnostic()?,
            None => Input::with_theme(theme)
                .with_prompt(field.label())
                .allow_empty(true)
                .validate_with(check)
                .interact_text()
                .into_diagnostic()?,
        },
    };

    Ok(value)
}

/// Navigation select: forward (Next/Submit), back, or cancel
fn prompt_navigation(wizard: &Wizard, entered: FormRecord, theme: &dyn Theme) -> Result<StepOutcome> {
    let forward = if wizard.is_last() { "Submit" } else { "Next" };

    let mut items = vec![forward];
    if !wizard.is_first() {
        items.push("Previous");
    }
    items.push("Cancel");

    let selection = Select::with_theme(theme)
        .with_prompt("Continue")
        .items(&items)
        .default(0)
        .interact()
        .into_diagnostic()?;

    Ok(match items[selection] {
        "Previous" => StepOutcome::Back,
        "Cancel" => StepOutcome::Cancel,
        _ => StepOutcome::Forward(entered),
    })
}

/// Final-step summary of everything about to be submitted
fn print_summary(accumulated: &FormRecord, entered: &FormRecord) {
    let mut merged = accumulated.clone();
    merged.merge(entered);

    println!();
    println!("{}", style("Summary").bold());
    println!(
        "  {} {}",
        style("Name:").dim(),
        display_value(FieldId::FullName, &merged)
    );
    println!(
        "  {} {}",
        style("Email:").dim(),
        display_value(FieldId::Email, &merged)
    );
    println!(
        "  {} {}",
        style("Phone:").dim(),
        display_value(FieldId::Phone, &merged)
    );
    println!(
        "  {} {}, {}, {}",
        style("Address:").dim(),
        display_value(FieldId::Street, &merged),
        display_value(FieldId::City, &merged),
        display_value(FieldId::Zip, &merged)
    );
    println!(
        "  {} {}",
        style("Username:").dim(),
        display_value(FieldId::Username, &merged)
    );
    println!();
}
