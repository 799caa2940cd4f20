use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use rep3_core::field::PrimeField;
use rep3_net::{config::NetworkConfig, tcp::TcpNetwork, Network};
use tracing_subscriber::EnvFilter;

/// Jointly computes the sum of three private inputs and the product of the
/// first two, modulo a prime, without any party revealing its input.
#[derive(Parser)]
#[command(name = "co-calc", version)]
struct Cli {
    /// The prime modulus for all arithmetic
    #[arg(long, global = true, default_value_t = co_calc::DEFAULT_MODULUS)]
    modulus: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all three parties in this process over in-memory channels
    #[command(allow_negative_numbers = true)]
    Local {
        /// Party 0's private input
        p0: i64,
        /// Party 1's private input
        p1: i64,
        /// Party 2's private input (ignored by the multiplication)
        p2: i64,
    },
    /// Run a single party over TCP using a network config file
    Party {
        /// The config file path
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
        /// This party's private input
        #[arg(short, long, allow_negative_numbers = true)]
        secret: i64,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let field = PrimeField::new(cli.modulus).context("invalid modulus")?;

    match cli.command {
        Commands::Local { p0, p1, p2 } => {
            println!(
                "Calculating the sum of the inputs and the product of the \
                 first two inputs modulo {}",
                field.modulus()
            );
            let results = co_calc::run_local([p0, p1, p2], field)?;
            for result in results {
                println!("Sum calculated by party {}: {}", result.id, result.sum);
                println!(
                    "Product calculated by party {}: {}",
                    result.id, result.product
                );
            }
        }
        Commands::Party { config, secret } => {
            let config: NetworkConfig = toml::from_str(
                &std::fs::read_to_string(&config).context("while opening config file")?,
            )
            .context("while parsing config file")?;
            eyre::ensure!(
                config.parties.len() == 3,
                "the protocol requires exactly 3 parties, config lists {}",
                config.parties.len()
            );
            let net = TcpNetwork::new(config).context("while establishing connections")?;
            println!(
                "Calculating the sum of the inputs and the product of the \
                 first two inputs modulo {}",
                field.modulus()
            );
            let result = co_calc::run_party(&net, secret, field)?;
            println!("Sum calculated by party {}: {}", result.id, result.sum);
            println!(
                "Product calculated by party {}: {}",
                result.id, result.product
            );
            tracing::debug!("connection stats:\n{}", net.get_connection_stats());
        }
    }

    Ok(())
}
