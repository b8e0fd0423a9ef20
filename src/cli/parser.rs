use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rLocalTime
#[derive(Parser)]
#[command(
    name = "rlocaltime",
    version = env!("CARGO_PKG_VERSION"),
    about = "Estimate per-day timezone and local time of device telemetry recorded in UTC",
    long_about = None
)]
pub struct Cli {
    /// Override configuration file path (useful for tests or batch setups)
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Estimate local time for one or more users (one input file per user)
    Estimate {
        #[arg(long = "input", short = 'i', value_name = "FILE", required = true, num_args = 1..)]
        inputs: Vec<String>,

        #[arg(
            long = "aliases",
            value_name = "FILE",
            help = "CSV of deprecated timezones and their alias (tz,alias)"
        )]
        aliases: Option<String>,

        #[arg(long = "output", short = 'o', value_name = "DIR")]
        output: Option<String>,

        #[arg(
            long = "day-series",
            value_name = "DIR",
            help = "Directory for the per-day estimate tables"
        )]
        day_series: Option<String>,

        #[arg(long = "no-day-series", help = "Do not write per-day estimate tables")]
        no_day_series: bool,

        #[arg(long = "start-date", value_name = "YYYY-MM-DD")]
        start_date: Option<String>,

        #[arg(long = "end-date", value_name = "YYYY-MM-DD")]
        end_date: Option<String>,

        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        #[arg(long = "summary", help = "Print a per-user summary of estimate types")]
        summary: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
