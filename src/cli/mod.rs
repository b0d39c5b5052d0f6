pub mod verify;

use clap::Parser;

use crate::settings::MAX_WINDOW_DAYS;

#[derive(Parser)]
#[command(
    name = "budget-verifier",
    about = "Report bank transactions that are missing from your budget export."
)]
pub struct Cli {
    /// Bank export CSV (Bank of America debit or credit card, Chase credit card)
    pub bank: String,
    /// Budget app export CSV
    pub budget: String,
    /// Filter rules JSON (default: ~/.config/budget-verifier/filters.json)
    #[arg(long)]
    pub filters: Option<String>,
    /// Days either side of a bank posting date a budget entry may fall (default: 5)
    #[arg(long = "window-days", value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS))]
    pub window_days: Option<i64>,
    /// Days either side of a dated filter's date it applies (default: 1)
    #[arg(long = "filter-window-days", value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS))]
    pub filter_window_days: Option<i64>,
    /// Log filter, candidate and match details
    #[arg(short, long)]
    pub verbose: bool,
    /// Remember --filters and the window options for future runs
    #[arg(long = "save-settings")]
    pub save_settings: bool,
}
