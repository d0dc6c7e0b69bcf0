mod commands;
mod config;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::booking::BookingArgs;
use commands::catalog::{CompaniesArgs, ModelsArgs, PriceArgs, SelectArgs, VariantsArgs};
use commands::emi::EmiArgs;
use commands::quotation::QuoteArgs;

/// Two-wheeler dealership pricing and finance
#[derive(Parser)]
#[command(
    name = "dealer",
    version,
    about = "Two-wheeler dealership pricing and finance",
    long_about = "A CLI for dealership counter work with decimal precision: browse the \
                  vehicle catalog, look up on-road prices, quote flat-rate EMIs, \
                  print quotations and check booking requests."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Loan policy file (YAML or JSON); built-in defaults otherwise
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Log debug detail to stderr (repeat for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the companies in a catalog
    Companies(CompaniesArgs),
    /// List a company's models
    Models(ModelsArgs),
    /// List the variants of a model
    Variants(VariantsArgs),
    /// Look up the on-road price of a variant
    Price(PriceArgs),
    /// Resolve a (possibly partial) company / model / variant selection
    Select(SelectArgs),
    /// Quote flat-rate EMIs across tenures
    Emi(EmiArgs),
    /// Generate a customer quotation
    Quote(QuoteArgs),
    /// Validate a booking request
    Booking(BookingArgs),
    /// Print the effective loan and booking policy
    Policy,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        format!("dealer_finance_core={level},dealer={level}").into()
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match config::load(cli.policy.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Companies(args) => commands::catalog::run_companies(args),
        Commands::Models(args) => commands::catalog::run_models(args),
        Commands::Variants(args) => commands::catalog::run_variants(args),
        Commands::Price(args) => commands::catalog::run_price(args),
        Commands::Select(args) => commands::catalog::run_select(args),
        Commands::Emi(args) => commands::emi::run_emi(args, &settings.loan),
        Commands::Quote(args) => {
            let as_slip = matches!(cli.output, OutputFormat::Table);
            commands::quotation::run_quote(args, &settings.loan, as_slip)
        }
        Commands::Booking(args) => commands::booking::run_booking(args, &settings.booking),
        Commands::Policy => serde_json::to_value(&settings).map_err(Into::into),
        Commands::Version => {
            println!("dealer {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
