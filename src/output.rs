use std::io::Write;

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::linker::{LinkStats, OrderPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

/// What a `link` or `check` run did, reported after the document is handled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSummary {
    pub input: String,
    /// `None` when nothing was written (`check`).
    pub output: Option<String>,
    pub order_policy: OrderPolicy,
    #[serde(flatten)]
    pub stats: LinkStats,
}

pub fn print_summary(out: &mut dyn Write, summary: &LinkSummary, format: Format) -> Result<()> {
    let stats = &summary.stats;
    match format {
        Format::Json => writeln!(out, "{}", serde_json::to_string(summary)?)?,
        Format::Pretty => {
            match &summary.output {
                Some(output) => writeln!(
                    out,
                    "{} {} -> {}",
                    "linked".green().bold(),
                    summary.input,
                    output
                )?,
                None => writeln!(out, "{} {}", "checked".cyan().bold(), summary.input)?,
            }
            writeln!(
                out,
                "  projects: {} (order: {})",
                stats.projects, summary.order_policy
            )?;
            writeln!(
                out,
                "  tasks: {} in {} {} (longest {})",
                stats.tasks,
                stats.task_runs,
                plural(stats.task_runs, "run", "runs"),
                stats.longest_run
            )?;
        }
        Format::Minimal => {
            let verb = if summary.output.is_some() {
                "linked"
            } else {
                "checked"
            };
            writeln!(
                out,
                "{} {} {} {} {}",
                verb,
                stats.projects,
                stats.tasks,
                stats.task_runs,
                summary.output.as_deref().unwrap_or("-")
            )?;
        }
    }
    Ok(())
}

/// Diagnostic dump of a whole document on one line.
pub fn print_dump(out: &mut dyn Write, document: &Value) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(document)?)?;
    Ok(())
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
