//! Routes command - run the random route job once.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use trafficgen::jobs::RandomRouteJob;
use trafficgen::sampler::PolygonSampler;

use super::common::{self, JobOverrides};
use crate::error::CliError;

/// Arguments for the routes command.
#[derive(Debug, clap::Args)]
pub struct RoutesArgs {
    #[command(flatten)]
    pub overrides: JobOverrides,

    /// Routes to query per city (overrides NUM_OF_ROUTES_PER_CITY)
    #[arg(long)]
    pub routes_per_city: Option<usize>,

    /// Seed for reproducible point sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run the routes command.
pub fn run(args: RoutesArgs) -> Result<(), CliError> {
    let mut config = common::load_config(&args.overrides)?;
    if let Some(routes) = args.routes_per_city {
        if routes == 0 {
            return Err(CliError::Config(
                "--routes-per-city must be at least 1".to_string(),
            ));
        }
        config = config.with_routes_per_city(routes);
    }

    let output = common::resolve_output(
        args.overrides.output.as_deref(),
        config.require_routes_output(),
    )?;
    info!(
        catalog = %config.catalog,
        output = %output,
        routes_per_city = config.routes_per_city,
        "Configuration loaded"
    );

    let client = common::http_client(&config)?;
    let catalog = common::catalog_source(&config.catalog, client.clone());
    let store = common::archive_store(&output, client.clone());
    let maps = common::maps_provider(&config, client)?;

    let job = RandomRouteJob::new(maps, store, config.routes_per_city)
        .with_sampler(PolygonSampler::with_max_attempts(config.max_sampling_attempts));

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let summary = job.run(catalog.as_ref(), &mut rng)?;
    println!("Routes job complete: {}", summary);
    Ok(())
}
