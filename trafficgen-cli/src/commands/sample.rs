//! Sample command - print random points inside a polygon.

use rand::rngs::StdRng;
use rand::SeedableRng;
use trafficgen::config::DEFAULT_MAX_SAMPLING_ATTEMPTS;
use trafficgen::coord::Polygon;
use trafficgen::sampler::PolygonSampler;

use crate::error::CliError;

/// Arguments for the sample command.
#[derive(Debug, clap::Args)]
pub struct SampleArgs {
    /// Polygon ring as "lon lat, lon lat, ..."
    #[arg(allow_hyphen_values = true)]
    pub polygon: String,

    /// Number of points to sample
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Give up after this many candidate draws
    #[arg(long, default_value_t = DEFAULT_MAX_SAMPLING_ATTEMPTS)]
    pub max_attempts: u64,
}

/// Run the sample command.
pub fn run(args: SampleArgs) -> Result<(), CliError> {
    let polygon: Polygon = args.polygon.parse()?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let points = PolygonSampler::with_max_attempts(args.max_attempts).sample(
        &polygon,
        args.count,
        &mut rng,
    )?;

    for point in points {
        println!("{}", point);
    }
    Ok(())
}
