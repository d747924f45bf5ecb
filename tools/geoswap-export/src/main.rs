//! geoswap - geometry swap tool
//!
//! Inspects shrub and moby records in big-endian game files and memory
//! dumps, and converts OBJ meshes to collision chunks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geoswap_common::profile::BUILTIN_TITLE_ID;
use serde::Serialize;
use std::path::{Path, PathBuf};

use geoswap_export::{
    MobyTarget, ShrubSummary, collision, load_profiles, parse_hex, read_moby, read_shrub,
};

#[derive(Parser)]
#[command(name = "geoswap")]
#[command(about = "Geometry swap tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a shrub model and print a JSON summary
    Shrub {
        /// File containing the shrub header
        input: PathBuf,

        /// Header offset (hex)
        #[arg(long, value_parser = parse_hex, default_value = "0")]
        offset: usize,

        /// Number of faces (three indices each)
        #[arg(long)]
        faces: usize,

        /// File the header pointers refer to (defaults to the input)
        #[arg(long)]
        body: Option<PathBuf>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an OBJ mesh to a collision chunk
    Collision {
        /// Input OBJ file
        input: PathBuf,

        /// Output file (defaults to the input with a .col extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a moby record from a memory dump and print it as JSON
    Moby {
        /// Memory dump file
        dump: PathBuf,

        /// Address (hex) or a named address from the game profile
        #[arg(long)]
        at: String,

        /// Address of the first byte of the dump (hex)
        #[arg(long, value_parser = parse_hex, default_value = "0")]
        base: usize,

        /// Game title id used to resolve named addresses
        #[arg(long, default_value = BUILTIN_TITLE_ID)]
        game: String,

        /// Profile TOML file (defaults to the built-in profiles)
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List known game profiles
    Profiles {
        /// Profile TOML file (defaults to the built-in profiles)
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shrub {
            input,
            offset,
            faces,
            body,
            output,
        } => {
            tracing::info!("Reading shrub from {:?} at {:#x}", input, offset);
            let model = read_shrub(&input, offset, faces, body.as_deref())?;
            emit_json(&ShrubSummary::from_model(&model), output.as_deref())?;
        }

        Commands::Collision { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("col"));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            collision::convert_obj_to_collision(&input, &output)?;
            tracing::info!("Done!");
        }

        Commands::Moby {
            dump,
            at,
            base,
            game,
            profiles,
            output,
        } => {
            let profiles = load_profiles(profiles.as_deref())?;
            let address = MobyTarget::parse(&at).resolve(&profiles, &game)?;
            let record = read_moby(&dump, address, base)?;
            emit_json(&record, output.as_deref())?;
        }

        Commands::Profiles { profiles } => {
            let profiles = load_profiles(profiles.as_deref())?;
            for profile in profiles.iter() {
                println!(
                    "{}  {}  ({} planets, {} addresses)",
                    profile.title_id,
                    profile.name,
                    profile.planets.len(),
                    profile.addresses.len()
                );
                for (name, address) in &profile.addresses {
                    println!("    {:<24} {:#010x}", name, address);
                }
            }
        }
    }

    Ok(())
}

/// Pretty-print `value` as JSON to `output` or stdout.
fn emit_json(value: &impl Serialize, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
