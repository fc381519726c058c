//! Ancestor Timeline CLI
//!
//! Reads the people and place tables, runs the pipeline and writes the
//! expanded timeline CSV.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use timeline::{persistence, Pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// People table (CSV)
    #[arg(long)]
    people: Option<PathBuf>,

    /// Place table (CSV)
    #[arg(long)]
    places: Option<PathBuf>,

    /// Output timeline (CSV)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Last reference year, inclusive
    #[arg(long)]
    last_year: Option<i32>,

    /// Also print the JSON frame for this year to stdout
    #[arg(long)]
    frame: Option<i32>,
}

impl Args {
    fn resolve_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(path) = &self.people {
            config.people_path = path.clone();
        }
        if let Some(path) = &self.places {
            config.places_path = path.clone();
        }
        if let Some(path) = &self.output {
            config.output_path = path.clone();
        }
        if let Some(year) = self.last_year {
            config = config.with_last_reference_year(year);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = args.resolve_config()?;

    info!("Ancestor timeline starting...");

    let places = persistence::load_places(&config.places_path)
        .with_context(|| format!("reading places from {}", config.places_path.display()))?;
    let people = persistence::load_people(&config.people_path, config.unknown_life_span_years)
        .with_context(|| format!("reading people from {}", config.people_path.display()))?;
    info!("Loaded {} people and {} places", people.len(), places.len());

    let start = std::time::Instant::now();
    let timeline = Pipeline::from_config(&config).run(&people, &places);
    info!("Pipeline finished in {:?}", start.elapsed());

    let stats = persistence::save_timeline(&config.output_path, &timeline.records)
        .with_context(|| format!("writing timeline to {}", config.output_path.display()))?;
    info!(
        "Wrote {} rows ({} bytes) to {}",
        stats.rows,
        stats.file_bytes,
        config.output_path.display()
    );

    if let Some(year) = args.frame {
        println!("{}", timeline.frame(year).to_json()?);
    }

    Ok(())
}
