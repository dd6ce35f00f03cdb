mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use decor_quotes::services::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "decor-quotes", version, about = "Quote book for wedding and event decoration")]
struct Cli {
    /// SQLite file holding every collection and the settings.
    #[arg(long, env = "DECOR_QUOTES_DB", default_value = "decor-quotes.sqlite", global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the starter catalogue if this database has never been seeded.
    Seed,

    /// Dashboard figures for today.
    Stats,

    /// The number the next quote of this year would get.
    NextNumber,

    /// List quotes with their client names.
    Quotes {
        #[arg(long)]
        client: Option<i64>,
    },

    Quote {
        #[command(subcommand)]
        action: QuoteAction,
    },

    /// Write a full JSON backup.
    Export { path: Option<PathBuf> },

    /// Restore a JSON backup over the current data.
    Import { path: PathBuf },

    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum QuoteAction {
    Show { id: i64 },
    Duplicate { id: i64 },
    Delete { id: i64 },
    /// Re-derive totals and payment amounts from the stored items.
    Recompute { id: i64 },
    /// Print what a document renderer would receive for the quote.
    Document {
        id: i64,
        #[arg(long)]
        accent: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Show,
    PaymentSplit { deposit: f64, second: f64, balance: f64 },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut state = AppState::open(&cli.db)?;

    match cli.command {
        Command::Seed => commands::data::seed(&state),
        Command::Stats => commands::dashboard::stats(&state),
        Command::NextNumber => commands::dashboard::next_number(&state),
        Command::Quotes { client } => commands::quotes::list(&state, client),
        Command::Quote { action } => match action {
            QuoteAction::Show { id } => commands::quotes::show(&state, id),
            QuoteAction::Duplicate { id } => commands::quotes::duplicate(&state, id),
            QuoteAction::Delete { id } => commands::quotes::delete(&state, id),
            QuoteAction::Recompute { id } => commands::quotes::recompute(&state, id),
            QuoteAction::Document { id, accent } => commands::quotes::document(&state, id, accent.as_deref()),
        },
        Command::Export { path } => commands::data::export(&state, path),
        Command::Import { path } => commands::data::import(&mut state, &path),
        Command::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&state),
            SettingsAction::PaymentSplit {
                deposit,
                second,
                balance,
            } => commands::settings::payment_split(&mut state, deposit, second, balance),
        },
    }
}
