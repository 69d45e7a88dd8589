use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use culturemap_common::{load_config, Config, FileConfig};

mod cmd;

#[derive(Parser)]
#[command(name = "culturemap", about = "Filter, enrich and export the cultural facilities catalog")]
#[command(version)]
struct Cli {
    /// Path to an optional TOML config file (map defaults, cleaning rules)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct category labels in a catalog
    Categories {
        /// GeoJSON FeatureCollection to read
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Print the visible subset for a filter as JSON lines
    Filter(cmd::filter::FilterArgs),

    /// Strip unused feature properties from a GeoJSON catalog
    Clean(cmd::clean::CleanArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("culturemap=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!(config = %path.display(), "Loading config");
            load_config(path)?
        }
        None => FileConfig::default(),
    };

    match cli.command {
        Commands::Categories { catalog } => cmd::categories::run(&catalog),
        Commands::Filter(args) => {
            let config = Config::from_env()?;
            config.log_redacted();
            cmd::filter::run(args, &config, &file_config).await
        }
        Commands::Clean(args) => cmd::clean::run(args, &file_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_with_coordinates() {
        let cli = Cli::try_parse_from([
            "culturemap", "filter", "--catalog", "lieux.geojson", "--category", "Musée", "--category",
            "Cinéma", "--lat", "46.6", "--lng", "1.88", "--radius", "25", "--enrich",
        ])
        .unwrap();

        match cli.command {
            Commands::Filter(args) => {
                assert_eq!(args.categories, vec!["Musée", "Cinéma"]);
                assert_eq!(args.lat, Some(46.6));
                assert_eq!(args.radius, Some(25.0));
                assert!(args.enrich);
            }
            _ => panic!("expected filter"),
        }
    }

    #[test]
    fn near_conflicts_with_coordinates() {
        let parsed = Cli::try_parse_from([
            "culturemap", "filter", "--catalog", "lieux.geojson", "--near", "Bourges", "--lat", "46.6",
            "--lng", "1.88",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn around_default_conflicts_with_near() {
        let parsed = Cli::try_parse_from([
            "culturemap", "filter", "--catalog", "lieux.geojson", "--around-default", "--near", "Bourges",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn latitude_requires_longitude() {
        let parsed = Cli::try_parse_from(["culturemap", "filter", "--catalog", "lieux.geojson", "--lat", "46.6"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "culturemap", "categories", "--catalog", "lieux.geojson", "--config", "culturemap.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("culturemap.toml")));
    }
}
