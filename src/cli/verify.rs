use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};
use tracing::info;

use crate::cli::Cli;
use crate::error::Result;
use crate::filters::{load_filters, FilterSet};
use crate::fmt::money;
use crate::importer::{import_bank_file, import_budget_file};
use crate::models::Transaction;
use crate::reconciler::{reconcile, MatchOptions};
use crate::settings::{load_settings, save_settings, Settings};

pub fn run(cli: &Cli) -> Result<()> {
    let settings = apply_overrides(load_settings(), cli);
    settings.validate()?;
    if cli.save_settings {
        save_settings(&settings)?;
        info!("saved settings");
    }

    info!("comparing bank statement {} to budget entries {}", cli.bank, cli.budget);

    let filter_list = load_filters(&settings.resolve_filters_path())?;
    let filters = FilterSet::new(filter_list, settings.filter_window_days);
    if filters.is_empty() {
        info!("no filters in effect");
    }

    let mut bank = import_bank_file(Path::new(&cli.bank))?;
    let mut budget = import_budget_file(Path::new(&cli.budget))?;

    let options = MatchOptions {
        window_days: settings.window_days,
    };
    let result = reconcile(&mut bank, &mut budget, &filters, &options);
    info!(
        "{} matched, {} filtered by {} rules, {} missing",
        result.matched,
        result.filtered,
        filters.len(),
        result.missing.len()
    );

    println!("{}", render_report(&result.missing));
    Ok(())
}

fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(path) = &cli.filters {
        settings.filters_path = Some(path.clone());
    }
    if let Some(days) = cli.window_days {
        settings.window_days = days;
    }
    if let Some(days) = cli.filter_window_days {
        settings.filter_window_days = days;
    }
    settings
}

pub fn render_report(missing: &[Transaction]) -> String {
    if missing.is_empty() {
        return "There are no missing transactions.  Good job budgeter!"
            .green()
            .to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Details", "Amount"]);
    for t in missing {
        let amount = if t.amount < 0 {
            money(t.amount).red().to_string()
        } else {
            money(t.amount).green().to_string()
        };
        table.add_row(vec![
            Cell::new(t.date.format("%Y-%m-%d")),
            Cell::new(&t.description),
            Cell::new(t.details.as_deref().unwrap_or_default()),
            Cell::new(amount),
        ]);
    }
    let noun = if missing.len() == 1 { "transaction" } else { "transactions" };
    format!("There are {} missing {noun}:\n{table}", missing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clap::Parser;

    #[test]
    fn test_report_success_message() {
        assert!(render_report(&[]).contains("There are no missing transactions."));
    }

    #[test]
    fn test_report_lists_every_missing_transaction() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let missing = vec![
            Transaction::new(date, "COFFEE SHOP", None, -450),
            Transaction::new(date, "REFUND", Some("Shopping"), 123456),
        ];
        let report = render_report(&missing);
        assert!(report.starts_with("There are 2 missing transactions:"));
        assert!(report.contains("2024-03-05"));
        assert!(report.contains("COFFEE SHOP"));
        assert!(report.contains("Shopping"));
        assert!(report.contains("-$4.50"));
        assert!(report.contains("$1,234.56"));
    }

    #[test]
    fn test_cli_flags_override_settings() {
        let cli = Cli::parse_from([
            "budget-verifier",
            "bank.csv",
            "budget.csv",
            "--filters",
            "/tmp/f.json",
            "--window-days",
            "7",
        ]);
        let settings = apply_overrides(Settings::default(), &cli);
        assert_eq!(settings.filters_path.as_deref(), Some("/tmp/f.json"));
        assert_eq!(settings.window_days, 7);
        assert_eq!(settings.filter_window_days, 1);
    }

    #[test]
    fn test_bad_window_from_settings_is_caught_after_overrides() {
        let cli = Cli::parse_from(["budget-verifier", "bank.csv", "budget.csv"]);
        let from_file = Settings {
            window_days: 0,
            filter_window_days: 1_000_000_000,
            ..Settings::default()
        };
        let settings = apply_overrides(from_file.clone(), &cli);
        assert!(settings.validate().is_err());

        let cli = Cli::parse_from([
            "budget-verifier",
            "bank.csv",
            "budget.csv",
            "--window-days",
            "7",
            "--filter-window-days",
            "2",
        ]);
        assert!(apply_overrides(from_file, &cli).validate().is_ok());
    }

    #[test]
    fn test_cli_requires_both_paths() {
        assert!(Cli::try_parse_from(["budget-verifier", "bank.csv"]).is_err());
        assert!(Cli::try_parse_from(["budget-verifier", "a", "b", "c"]).is_err());
        assert!(Cli::try_parse_from(["budget-verifier", "a", "b", "--window-days", "0"]).is_err());
        assert!(Cli::try_parse_from([
            "budget-verifier",
            "a",
            "b",
            "--filter-window-days",
            "9223372036854775807",
        ])
        .is_err());
    }
}
