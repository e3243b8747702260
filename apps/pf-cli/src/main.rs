mod config;
mod error;

use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use pf_core::sig;
use pf_thermo::{CATALOG_IDS, Chemical};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "procflow CLI - material stream inspection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the stream described in a YAML file and print its report
    Show {
        /// Path to the stream YAML file
        stream_path: PathBuf,
    },
    /// Print one named property of the stream in a YAML file
    Property {
        /// Path to the stream YAML file
        stream_path: PathBuf,
        /// Property name (e.g., T, F_mass, H, rho)
        name: String,
        /// Units (defaults to the property's canonical units)
        #[arg(short, long)]
        units: Option<String>,
    },
    /// Resolve a flow unit string to its basis and conversion factor
    Units {
        /// Flow units (e.g., kg/hr, lb/hr, mol/s)
        units: String,
    },
    /// List the built-in chemical catalog
    Catalog,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { stream_path } => cmd_show(&stream_path),
        Commands::Property {
            stream_path,
            name,
            units,
        } => cmd_property(&stream_path, &name, units.as_deref()),
        Commands::Units { units } => cmd_units(&units),
        Commands::Catalog => cmd_catalog(),
    }
}

fn cmd_show(stream_path: &Path) -> CliResult<()> {
    let file = config::load(stream_path)?;
    let stream = file.build_stream()?;
    println!("{}", stream.show(&file.display)?);

    if !file.properties.is_empty() {
        println!();
        let width = file
            .properties
            .iter()
            .map(|p| p.name.len())
            .max()
            .unwrap_or(0);
        for prop in &file.properties {
            let units = match &prop.units {
                Some(units) => units.as_str(),
                None => pf_stream::canonical_units(&prop.name)?,
            };
            let value = stream.get_property(&prop.name, units)?;
            println!("  {:<width$}  {} {}", prop.name, sig(value, 6), units);
        }
    }
    Ok(())
}

fn cmd_property(stream_path: &Path, name: &str, units: Option<&str>) -> CliResult<()> {
    let file = config::load(stream_path)?;
    let stream = file.build_stream()?;
    let units = match units {
        Some(units) => units,
        None => pf_stream::canonical_units(name)?,
    };
    let value = stream.get_property(name, units)?;
    println!("{} {}", sig(value, 6), units);
    Ok(())
}

fn cmd_units(units: &str) -> CliResult<()> {
    let (basis, factor) = pf_stream::resolve(units)?;
    println!(
        "{units}: {basis:?} basis, 1 {} = {} {units}",
        basis.canonical_units(),
        sig(factor, 8)
    );
    Ok(())
}

fn cmd_catalog() -> CliResult<()> {
    println!("{:<10} {:>10} {:>10}", "ID", "MW", "Tb [K]");
    for id in CATALOG_IDS {
        let chem = Chemical::from_catalog(id).map_err(CliError::from)?;
        let tb = chem.tb.map_or_else(|| "-".to_string(), |tb| sig(tb, 6));
        println!("{:<10} {:>10} {:>10}", chem.id, sig(chem.mw, 6), tb);
    }
    Ok(())
}
