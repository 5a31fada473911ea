use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use delivery_cli::commands::estimate::{handle_estimate, EstimateCommandArgs};
use delivery_cli::commands::import::handle_import;
use delivery_cli::commands::maps::handle_maps;
use delivery_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Delivery maps and economical route estimates")]
struct Cli {
    /// SQLite database holding the maps.
    #[arg(long, global = true, env = "DELIVERY_DATABASE_PATH", default_value = "delivery.db")]
    database: PathBuf,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a map from a JSON document `{name, routes: [{origin, destination, distance}]}`.
    Import {
        /// Path to the map JSON file.
        file: PathBuf,
    },
    /// List stored maps and their routes.
    Maps,
    /// Estimate the cheapest delivery between two locations.
    Estimate {
        /// Map name (exact, or a SQL LIKE pattern).
        #[arg(long)]
        map: String,
        /// Origin location.
        #[arg(long = "from")]
        from: String,
        /// Destination location.
        #[arg(long = "to")]
        to: String,
        /// Price of one litre of fuel.
        #[arg(long)]
        liter_price: f64,
        /// Vehicle autonomy in kilometres per litre.
        #[arg(long)]
        autonomy: f64,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Import { file } => handle_import(&cli.database, &file, cli.format),
        Command::Maps => handle_maps(&cli.database, cli.format),
        Command::Estimate {
            map,
            from,
            to,
            liter_price,
            autonomy,
        } => {
            let args = EstimateCommandArgs {
                map,
                from,
                to,
                liter_price,
                autonomy,
            };
            handle_estimate(&cli.database, &args, cli.format)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
