//! `regwiz validate` command - validate a record file against the step schemas

use console::style;
use miette::{miette, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::schema::validator::{parse_record, FieldIssue, RecordValidationError, StepValidator};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Record file (YAML mapping of field names to values)
    pub file: PathBuf,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .map_err(|e| miette!("failed to read {}: {e}", args.file.display()))?;
    let filename = args.file.file_name().unwrap_or_default().to_string_lossy();

    let record = parse_record(&content, &filename)?;
    let validator = StepValidator::default();

    let mut all_issues: Vec<FieldIssue> = Vec::new();
    for (step, issues) in validator.validate_record(&record) {
        if !global.quiet {
            if issues.is_empty() {
                println!("{} {}", style("✓").green(), step.name);
            } else {
                println!(
                    "{} {}: {} error(s)",
                    style("✗").red(),
                    step.name,
                    issues.len()
                );
            }
        }
        all_issues.extend(issues);
    }

    if all_issues.is_empty() {
        if !global.quiet {
            println!();
            println!("{} {} is valid", style("✓").green(), args.file.display());
        }
        Ok(())
    } else {
        Err(RecordValidationError::new(&filename, &content, &all_issues).into())
    }
}
