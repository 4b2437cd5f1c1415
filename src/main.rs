use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use geolink::{
    assign_regions, incoming_from_json, AddressRegistry, BatchLinkageRunner, BatchProgress,
    GeolinkConfig, LinkageContext, Region,
};

#[derive(Parser, Debug)]
#[command(name = "geolink")]
#[command(about = "Link free-text address listings to a registry and assign them to regions")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve incoming records against the registry and write a JSON report
    #[command(after_help = "\
Examples:
  geolink link --registry registry.json --incoming listings.json
  geolink link -r registry.json -i listings.json -c geolink.yaml -o report.json")]
    Link {
        /// JSON array of address records
        #[arg(long, short = 'r')]
        registry: PathBuf,

        /// JSON array of incoming records
        #[arg(long, short = 'i')]
        incoming: PathBuf,

        /// YAML configuration file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Assign registry addresses to user-drawn regions
    #[command(after_help = "\
Examples:
  geolink regions --registry registry.json --regions districts.json")]
    Regions {
        /// JSON array of address records
        #[arg(long, short = 'r')]
        registry: PathBuf,

        /// JSON array of regions, each with an id, optional name and a polygon of lat/lng points
        #[arg(long)]
        regions: PathBuf,

        /// YAML configuration file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<GeolinkConfig, Box<dyn Error>> {
    Ok(match path {
        Some(path) => GeolinkConfig::from_file(path)?,
        None => GeolinkConfig::default(),
    })
}

fn load_context(registry: &Path, config: &GeolinkConfig) -> Result<LinkageContext, Box<dyn Error>> {
    let registry = AddressRegistry::from_json(&fs::read_to_string(registry)?)?;
    Ok(LinkageContext::new(registry, config.linkage())?)
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => fs::write(path, json)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Link {
            registry,
            incoming,
            config,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let ctx = load_context(&registry, &config)?;
            let records = incoming_from_json(&fs::read_to_string(&incoming)?)?;

            let runner = BatchLinkageRunner::new(&ctx, config.batch.clone())?;
            let on_progress = |p: BatchProgress| {
                info!(processed = p.processed, total = p.total, "link_progress");
            };
            let report = runner.run_with(&records, Some(&on_progress), None)?;
            write_json(&report, output.as_deref())?;
        }
        Commands::Regions {
            registry,
            regions,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let ctx = load_context(&registry, &config)?;
            let regions: Vec<Region> = serde_json::from_str(&fs::read_to_string(&regions)?)?;

            let assignments = assign_regions(ctx.index(), &regions);
            info!(
                regions = assignments.len(),
                assigned = assignments.iter().map(|a| a.members.len()).sum::<usize>(),
                "regions_assigned"
            );
            write_json(&assignments, None)?;
        }
    }

    Ok(())
}
