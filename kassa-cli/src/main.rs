//! Kassa CLI - CSV transaction import for the Kassa budgeting backend

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{categories, import, setup};

/// Kassa - import bank CSV exports into your budget
#[derive(Parser)]
#[command(name = "kassa", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import transactions from a CSV file
    Import {
        /// CSV file to import
        file: Option<PathBuf>,
        /// Field delimiter (auto-detected from the first line if omitted)
        #[arg(long)]
        delimiter: Option<char>,
        /// Quote character
        #[arg(long, default_value_t = '"')]
        quote: char,
        /// Preview validity counts and a sample without writing anything
        #[arg(long)]
        preview: bool,
        /// Create categories for unmatched names instead of asking
        #[arg(long)]
        auto_create_categories: bool,
        /// Manual category mapping, repeatable: --map "Name=category-id"
        #[arg(long = "map", value_name = "NAME=ID")]
        map: Vec<String>,
        /// Currency used when the file has no currency column
        #[arg(long)]
        currency: Option<String>,
        /// Use a saved import profile
        #[arg(long)]
        profile: Option<String>,
        /// Save the effective mapping under this profile name
        #[arg(long)]
        save_profile: Option<String>,
        /// List saved import profiles
        #[arg(long)]
        list_profiles: bool,
        /// Never prompt; leave unmatched categories unmapped
        #[arg(long)]
        no_input: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Override the date column
        #[arg(long)]
        date_column: Option<String>,
        /// Override the amount column
        #[arg(long)]
        amount_column: Option<String>,
        /// Override the currency column
        #[arg(long)]
        currency_column: Option<String>,
        /// Override the type column
        #[arg(long)]
        type_column: Option<String>,
        /// Override the category column
        #[arg(long)]
        category_column: Option<String>,
        /// Override the comment column
        #[arg(long)]
        comment_column: Option<String>,
    },

    /// List categories of the active tenant
    Categories {
        /// Include inactive categories
        #[arg(long)]
        include_inactive: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configure the backend connection
    Setup {
        /// Backend base URL
        url: String,
        /// Bearer token for authenticated calls
        #[arg(long)]
        token: Option<String>,
        /// Active tenant id (selects the default currency)
        #[arg(long)]
        tenant: Option<String>,
        /// Locale for auto-created category translations
        #[arg(long)]
        locale: Option<String>,
        /// Fallback currency when no tenant is reachable
        #[arg(long)]
        currency: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import {
            file,
            delimiter,
            quote,
            preview,
            auto_create_categories,
            map,
            currency,
            profile,
            save_profile,
            list_profiles,
            no_input,
            json,
            date_column,
            amount_column,
            currency_column,
            type_column,
            category_column,
            comment_column,
        } => {
            let overrides = import::ColumnOverrides {
                date: date_column,
                amount: amount_column,
                currency: currency_column,
                kind: type_column,
                category: category_column,
                comment: comment_column,
            };
            let options = import::ImportArgs {
                file,
                delimiter,
                quote,
                preview,
                auto_create_categories,
                map,
                currency,
                profile,
                save_profile,
                list_profiles,
                no_input,
                json,
                overrides,
            };
            import::run(options).await
        }
        Commands::Categories {
            include_inactive,
            json,
        } => categories::run(include_inactive, json).await,
        Commands::Setup {
            url,
            token,
            tenant,
            locale,
            currency,
        } => setup::run(&url, token, tenant, locale, currency),
    }
}
