use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use v2mappers::{CultureQuery, LogDiagnostics, MapperConfig, Mappers, ProvinceId};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Mapper config file (defaults to the standard layout in the current directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the size of every rule table
    Summary,

    /// Find the Victoria 2 culture for an EU4 province culture
    Culture {
        /// EU4 culture
        #[arg(long)]
        culture: String,

        /// Province religion
        #[arg(long, default_value = "")]
        religion: String,

        /// Province id
        #[arg(long, default_value_t = 0)]
        province: ProvinceId,

        /// Owner tag
        #[arg(long, default_value = "")]
        owner: String,
    },

    /// List the regions and areas of a province
    Regions {
        #[arg(value_name = "PROVINCE")]
        province: ProvinceId,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = std::str::FromStr::from_str(&cli.log_level).unwrap_or(log::LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let config = match &cli.config {
        Some(path) => MapperConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MapperConfig::in_dir("."),
    };
    let mut diagnostics = LogDiagnostics;
    let mappers = Mappers::load(&config, &mut diagnostics).context("Failed to load rule files")?;

    match cli.command {
        Commands::Summary => {
            for (table, size) in mappers.summary() {
                println!("{:<22} {}", table, size);
            }
        }
        Commands::Culture {
            culture,
            religion,
            province,
            owner,
        } => {
            let query = CultureQuery {
                culture: &culture,
                religion: &religion,
                province,
                owner: &owner,
            };
            match mappers.resolve_culture(&query, &mut diagnostics) {
                Some(destination) => println!("{}", destination),
                None => println!("no match"),
            }
        }
        Commands::Regions { province } => match mappers.regions.names(province) {
            Some(names) => {
                let mut names: Vec<&str> = names.iter().map(String::as_str).collect();
                names.sort_unstable();
                for name in names {
                    println!("{}", name);
                }
            }
            None => println!("province {} is in no region", province),
        },
    }

    Ok(())
}
