//! `regwiz steps` command - step registry inspection

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::step::StepRegistry;

#[derive(clap::Subcommand, Debug)]
pub enum StepsCommands {
    /// List wizard steps and the fields they own
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show count only, not the steps
    #[arg(long)]
    pub count: bool,
}

#[derive(Serialize)]
struct StepRow {
    position: usize,
    id: &'static str,
    name: &'static str,
    fields: Vec<&'static str>,
}

pub fn run(cmd: StepsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        StepsCommands::List(args) => run_list(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let registry = StepRegistry::new();

    if args.count {
        println!("{}", registry.len());
        return Ok(());
    }

    let rows: Vec<StepRow> = registry
        .iter()
        .enumerate()
        .map(|(position, step)| StepRow {
            position,
            id: step.id.as_str(),
            name: step.name,
            fields: step.fields.iter().map(|f| f.as_str()).collect(),
        })
        .collect();

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&rows).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("position,id,name,fields");
            for row in &rows {
                println!(
                    "{},{},{},{}",
                    row.position,
                    row.id,
                    escape_csv(row.name),
                    escape_csv(&row.fields.join(" "))
                );
            }
        }
        OutputFormat::Md => {
            println!("| Position | Id | Name | Fields |");
            println!("|---|---|---|---|");
            for row in &rows {
                println!(
                    "| {} | {} | {} | {} |",
                    row.position,
                    row.id,
                    row.name,
                    row.fields.join(", ")
                );
            }
        }
        OutputFormat::Id => {
            for row in &rows {
                println!("{}", row.id);
            }
        }
        _ => {
            println!(
                "{:<10} {:<10} {:<18} {}",
                style("POSITION").bold(),
                style("ID").bold(),
                style("NAME").bold(),
                style("FIELDS").bold()
            );
            println!("{}", "-".repeat(72));

            for row in &rows {
                println!(
                    "{:<10} {:<10} {:<18} {}",
                    row.position,
                    row.id,
                    truncate_str(row.name, 16),
                    row.fields.join(", ")
                );
            }

            println!();
            println!("{} step(s)", style(rows.len()).cyan());
        }
    }

    Ok(())
}
