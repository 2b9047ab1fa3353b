//! Command-line surface.

mod company;
mod quotes;

use crate::error::AppError;
use crate::models::{ExportFormat, QuoteId};
use crate::AppState;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quote-desk", version, about = "Create, edit and export price quotes")]
pub struct Cli {
    /// Configuration file; defaults to quote-desk/config/base.yaml when present.
    #[arg(long, global = true, env = "QUOTE_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List quotes with count, total value and quotes created this month.
    List,
    /// Show one quote with its items and totals.
    Show { id: String },
    /// Create a quote.
    New {
        /// JSON draft to start from.
        #[arg(long)]
        from: Option<PathBuf>,
        /// Edit such as `customer.name=Acme` or `item.1.quantity=2`.
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Edit and save an existing quote.
    Edit {
        id: String,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Append a blank line item; repeatable.
        #[arg(long = "add-item", action = ArgAction::Count)]
        add_item: u8,
        /// Remove line item N (1-based); repeatable.
        #[arg(long = "remove-item", value_name = "N")]
        remove_item: Vec<usize>,
    },
    /// Delete a quote.
    Delete { id: String },
    /// Export a quote as PDF or Excel.
    Export {
        id: String,
        #[arg(long, value_parser = parse_format)]
        format: ExportFormat,
        /// Output directory; defaults to `export.output_dir`.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Download the PDF rendered by the server instead of rendering locally.
        #[arg(long)]
        server: bool,
    },
    /// Company profile shown on every quote.
    #[command(subcommand)]
    Company(CompanyCommand),
}

#[derive(Debug, Subcommand)]
pub enum CompanyCommand {
    Show,
    /// Update profile fields, e.g. `email=info@example.com`.
    Set {
        #[arg(value_name = "KEY=VALUE", required = true)]
        fields: Vec<String>,
    },
    /// Upload a logo image (at most 5 MB).
    Logo { path: PathBuf },
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse()
}

pub async fn run(command: Command, state: &AppState) -> Result<(), AppError> {
    match command {
        Command::List => quotes::list(state).await,
        Command::Show { id } => quotes::show(state, &QuoteId::new(id)).await,
        Command::New { from, set } => quotes::create(state, from, &set).await,
        Command::Edit {
            id,
            set,
            add_item,
            remove_item,
        } => quotes::edit(state, &QuoteId::new(id), &set, add_item, &remove_item).await,
        Command::Delete { id } => quotes::delete(state, &QuoteId::new(id)).await,
        Command::Export {
            id,
            format,
            out,
            server,
        } => quotes::export(state, &QuoteId::new(id), format, out, server).await,
        Command::Company(CompanyCommand::Show) => company::show(state).await,
        Command::Company(CompanyCommand::Set { fields }) => company::set(state, &fields).await,
        Command::Company(CompanyCommand::Logo { path }) => company::logo(state, &path).await,
    }
}

/// Split `KEY=VALUE`, keeping any further `=` in the value.
pub(crate) fn split_assignment(raw: &str) -> Result<(&str, &str), AppError> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim(), v))
        .ok_or_else(|| AppError::BadInput(format!("Expected KEY=VALUE, got '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edit_flags() {
        let cli = Cli::parse_from([
            "quote-desk",
            "edit",
            "abc",
            "--set",
            "project=Shade",
            "--add-item",
            "--add-item",
            "--remove-item",
            "1",
        ]);
        match cli.command {
            Command::Edit {
                id,
                set,
                add_item,
                remove_item,
            } => {
                assert_eq!(id, "abc");
                assert_eq!(set, vec!["project=Shade"]);
                assert_eq!(add_item, 2);
                assert_eq!(remove_item, vec![1]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_export_format() {
        let cli = Cli::parse_from(["quote-desk", "export", "abc", "--format", "excel"]);
        assert!(matches!(
            cli.command,
            Command::Export {
                format: ExportFormat::Excel,
                server: false,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["quote-desk", "export", "abc", "--format", "doc"]).is_err());
    }

    #[test]
    fn assignments_keep_extra_equals() {
        assert_eq!(split_assignment("notes=a=b").unwrap(), ("notes", "a=b"));
        assert!(split_assignment("notes").is_err());
    }
}
