//! `regwiz run` command - the registration wizard

use console::style;
use miette::{miette, IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::progress::print_progress;
use crate::cli::prompt::{prompt_step, theme_for, StepOutcome};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{Config, ThemePreference};
use crate::core::record::FormRecord;
use crate::core::submission::{MockGateway, SubmissionReceipt, SubmissionState};
use crate::core::wizard::{Wizard, WizardError};
use crate::schema::validator::{parse_record, FieldIssue, RecordValidationError};

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Read a completed record from a YAML file instead of prompting
    #[arg(long, value_name = "FILE")]
    pub from_file: Option<PathBuf>,

    /// Validate only; stop before contacting the gateway
    #[arg(long)]
    pub dry_run: bool,

    /// Override the stub gateway latency in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
}

pub fn run(args: RunArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.submit_delay());

    match &args.from_file {
        Some(path) => run_from_file(path, args.dry_run, delay, global),
        None => {
            let theme = global.theme.unwrap_or_else(|| config.theme());
            run_interactive(theme, args.dry_run, delay, global)
        }
    }
}

fn run_interactive(
    theme_pref: ThemePreference,
    dry_run: bool,
    delay: Duration,
    global: &GlobalOpts,
) -> Result<()> {
    let mut wizard = Wizard::new();
    let theme = theme_for(theme_pref);

    if !global.quiet {
        println!();
        println!(
            "{} {}",
            style("◆").cyan(),
            style("Multi-Step Registration").bold()
        );
    }

    loop {
        if !global.quiet {
            println!();
            print_progress(wizard.position(), wizard.registry());
        }

        match prompt_step(&wizard, theme.as_ref())? {
            StepOutcome::Cancel => {
                println!("{} Registration cancelled", style("✗").yellow());
                return Ok(());
            }
            StepOutcome::Back => {
                wizard.retreat();
            }
            StepOutcome::Forward(candidate) => {
                if wizard.is_last() {
                    if dry_run {
                        let issues = wizard.validate_active_step(&candidate);
                        if issues.is_empty() {
                            println!(
                                "{} Record is valid; skipping submission",
                                style("✓").green()
                            );
                            return Ok(());
                        }
                        print_issues(&issues);
                        continue;
                    }
                    return submit_and_report(&mut wizard, &candidate, delay, global);
                }
                match wizard.advance(&candidate) {
                    Ok(_) => {}
                    Err(WizardError::Invalid(issues)) => print_issues(&issues),
                    Err(e) => return Err(miette!("{e}")),
                }
            }
        }
    }
}

fn run_from_file(path: &Path, dry_run: bool, delay: Duration, global: &GlobalOpts) -> Result<()> {
    let content = fs::read_to_string(path)
        .map_err(|e| miette!("failed to read {}: {e}", path.display()))?;
    let filename = path.file_name().unwrap_or_default().to_string_lossy();

    let record = parse_record(&content, &filename)?;
    let mut wizard = Wizard::new();

    // Each step picks its own fields out of the full record
    while !wizard.is_last() {
        let step = wizard.active_step();
        match wizard.advance(&record) {
            Ok(_) => {
                if global.verbose && !global.quiet {
                    println!("{} {}", style("✓").green(), step.name);
                }
            }
            Err(WizardError::Invalid(issues)) => {
                return Err(RecordValidationError::new(&filename, &content, &issues).into());
            }
            Err(e) => return Err(miette!("{e}")),
        }
    }

    let issues = wizard.validate_active_step(&record);
    if !issues.is_empty() {
        return Err(RecordValidationError::new(&filename, &content, &issues).into());
    }
    if global.verbose && !global.quiet {
        println!("{} {}", style("✓").green(), wizard.active_step().name);
    }

    if dry_run {
        if !global.quiet {
            println!("{} Record is valid; skipping submission", style("✓").green());
        }
        return Ok(());
    }

    submit_and_report(&mut wizard, &record, delay, global)
}

/// Drive the single in-flight submission and report its outcome
fn submit_and_report(
    wizard: &mut Wizard,
    candidate: &FormRecord,
    delay: Duration,
    global: &GlobalOpts,
) -> Result<()> {
    let gateway = MockGateway::new(delay);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .into_diagnostic()?;

    if !global.quiet {
        println!("{} Submitting...", style("→").blue());
    }

    match runtime.block_on(wizard.submit(&gateway, candidate)) {
        Ok(()) => {}
        Err(WizardError::Invalid(issues)) => {
            print_issues(&issues);
            return Err(miette!("registration not submitted"));
        }
        Err(e) => return Err(miette!("{e}")),
    }

    match wizard.submission() {
        SubmissionState::Success(receipt) => {
            report_receipt(receipt, global)?;
            Ok(())
        }
        SubmissionState::Failure(reason) => Err(miette!("submission failed: {reason}")),
        other => Err(miette!("submission did not settle: {other:?}")),
    }
}

fn report_receipt(receipt: &SubmissionReceipt, global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(receipt).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(receipt).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => {
            println!("{}", receipt.id);
        }
        _ => {
            println!("{} Registration submitted", style("✓").green());
            println!(
                "  {} {}",
                style("Receipt:").dim(),
                style(receipt.id.to_string()).cyan()
            );
            println!(
                "  {} {}",
                style("Received:").dim(),
                receipt.received.format("%Y-%m-%dT%H:%M:%SZ")
            );
        }
    }
    Ok(())
}

fn print_issues(issues: &[FieldIssue]) {
    for issue in issues {
        eprintln!(
            "{} {}: {}",
            style("✗").red(),
            style(issue.field.label()).bold(),
            issue.message
        );
    }
}
