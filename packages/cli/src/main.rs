#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the violence map toolchain.
//!
//! Every data command loads the dataset, applies the filter given on the
//! command line, and prints the result as pretty JSON on stdout. `serve`
//! starts the API server with the same dataset settings.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use violence_map_dataset::Dataset;
use violence_map_query::{
    animation_frames, apply, default_filter, frame_map, layer_groups, to_map_points,
    to_timeline_events,
};
use violence_map_server::{ServerConfig, run_server};
use violence_map_server_models::{
    ApiAnimation, ApiFacets, ApiMap, ApiTimeline, FilterQueryParams,
};

#[derive(Parser)]
#[command(name = "violence_map_cli", about = "Political-violence incident map toolchain")]
struct Cli {
    /// Incident CSV file (defaults to `VIOLENCE_MAP_DATA`, then `data/incidents.csv`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Column mapping TOML (defaults to `VIOLENCE_MAP_COLUMNS`, then the bundled mapping)
    #[arg(long, global = true)]
    columns: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print headline figures for the dataset
    Summary,
    /// Print distinct filter values and the default filter
    Facets,
    /// Print map markers, framing, and layer groups
    Map {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print timeline events in chronological order
    Timeline {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print one map frame per year
    Animation {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Start the API server
    Serve,
}

#[derive(Args)]
struct FilterArgs {
    /// First year to include (defaults to the dataset's first year)
    #[arg(long)]
    from_year: Option<i32>,
    /// Last year to include (defaults to the dataset's last year)
    #[arg(long)]
    to_year: Option<i32>,
    /// Comma-separated list of action types to include
    #[arg(long)]
    action_types: Option<String>,
    /// Comma-separated list of victim genders to include
    #[arg(long)]
    genders: Option<String>,
    /// Comma-separated list of victim ethnicities to include
    #[arg(long)]
    ethnicities: Option<String>,
}

impl From<FilterArgs> for FilterQueryParams {
    fn from(args: FilterArgs) -> Self {
        Self {
            from_year: args.from_year,
            to_year: args.to_year,
            action_types: args.action_types,
            genders: args.genders,
            ethnicities: args.ethnicities,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(columns) = cli.columns {
        config.columns_path = Some(columns);
    }

    match cli.command {
        Commands::Summary => print_json(&load(&config)?.summary())?,
        Commands::Facets => {
            let dataset = load(&config)?;
            print_json(&ApiFacets {
                facets: dataset.facets(),
                default_filter: default_filter(&dataset),
            })?;
        }
        Commands::Map { filter } => {
            let dataset = load(&config)?;
            let spec = FilterQueryParams::from(filter).to_filter_spec(dataset.year_bounds());
            let view = apply(&dataset, &spec);
            print_json(&ApiMap {
                points: to_map_points(&view),
                frame: frame_map(&view),
                layers: layer_groups(&view),
                empty: view.is_empty(),
            })?;
        }
        Commands::Timeline { filter } => {
            let dataset = load(&config)?;
            let spec = FilterQueryParams::from(filter).to_filter_spec(dataset.year_bounds());
            let view = apply(&dataset, &spec);
            let events = to_timeline_events(&view);
            let empty = events.is_empty();
            print_json(&ApiTimeline { events, empty })?;
        }
        Commands::Animation { filter } => {
            let dataset = load(&config)?;
            let spec = FilterQueryParams::from(filter).to_filter_spec(dataset.year_bounds());
            let view = apply(&dataset, &spec);
            print_json(&ApiAnimation {
                frames: animation_frames(&view),
            })?;
        }
        Commands::Serve => {
            // The server brings its own runtime; nothing else here is async.
            actix_web::rt::System::new().block_on(run_server(config))?;
        }
    }

    Ok(())
}

fn load(config: &ServerConfig) -> Result<Dataset, Box<dyn std::error::Error>> {
    let mapping = config.column_mapping()?;

    Dataset::load(&config.data_path, &mapping).map_err(|e| {
        log::error!("Failed to load {}: {e}", config.data_path.display());
        e.into()
    })
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_flags_map_to_query_params() {
        let cli = Cli::try_parse_from([
            "violence_map_cli",
            "--data",
            "incidents.csv",
            "map",
            "--from-year",
            "2010",
            "--genders",
            "Feminino,Masculino",
        ])
        .unwrap();

        assert_eq!(cli.data, Some(PathBuf::from("incidents.csv")));
        let Commands::Map { filter } = cli.command else {
            panic!("expected map command");
        };
        let spec = FilterQueryParams::from(filter).to_filter_spec((2000, 2023));
        assert_eq!(spec.year_range.min, 2010);
        assert_eq!(spec.year_range.max, 2023);
        assert_eq!(spec.genders.len(), 2);
    }
}
