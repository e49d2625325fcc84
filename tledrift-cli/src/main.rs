//! tledrift: catalog retrieval and SGP4 prediction-drift analysis.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};

use tledrift_core::{
    compute_errors, compute_errors_strict, sample_track, DriftSample, TleRecord, TleSequence,
    TrackWindow,
};

mod cache;
mod config;
mod discos;
mod error;
mod provider;
mod report;
mod spacetrack;

use cache::CatalogCache;
use config::Config;
use discos::DiscosClient;
use error::{CliError, Result};
use provider::{DiscosProvider, GpProvider};
use spacetrack::{EpochRange, SpaceTrackClient};

#[derive(Parser)]
#[command(name = "tledrift", version, about = "TLE drift analysis against Space-Track GP history")]
struct Cli {
    /// Cache directory (falls back to the configured data dir)
    #[arg(long, global = true, env = "TLEDRIFT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch GP history rows from Space-Track into the local cache
    Fetch {
        /// NORAD catalog numbers
        #[arg(required = true)]
        norad_ids: Vec<u32>,

        /// Epoch window start (YYYY-MM-DD)
        #[arg(long, default_value = "2020-01-01")]
        start: NaiveDate,

        /// Epoch window end (YYYY-MM-DD)
        #[arg(long, default_value = "2022-01-01")]
        end: NaiveDate,

        /// Cap the number of rows returned per object
        #[arg(long)]
        limit: Option<u32>,

        /// Refetch even when a cached file exists
        #[arg(long)]
        force: bool,
    },

    /// Fetch object metadata from DISCOSweb for whole launches
    Discos {
        /// COSPAR launch ids, e.g. 2013-066
        #[arg(required = true)]
        launch_ids: Vec<String>,

        /// Refetch even when a cached file exists
        #[arg(long)]
        force: bool,
    },

    /// Compute per-pair prediction drift for one object
    Errors {
        /// NORAD catalog number
        norad_id: u32,

        /// Epoch window start (YYYY-MM-DD)
        #[arg(long, default_value = "2020-01-01")]
        start: NaiveDate,

        /// Epoch window end (YYYY-MM-DD)
        #[arg(long, default_value = "2022-01-01")]
        end: NaiveDate,

        /// Write the full drift report CSV here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Abort on the first failed pair instead of recording it
        #[arg(long)]
        fail_fast: bool,

        /// Rows to show in the worst-drift table
        #[arg(long, default_value = "10")]
        top: usize,

        /// Refetch even when a cached file exists
        #[arg(long)]
        force: bool,
    },

    /// Sample an SGP4 trajectory from one cached element set
    Track {
        /// NORAD catalog number
        norad_id: u32,

        /// Orbital periods to cover
        #[arg(long, default_value = "3.0")]
        periods: f64,

        /// Sample step in seconds
        #[arg(long, default_value = "1.0")]
        step: f64,

        /// Window start offset in seconds (overrides --periods with --end-s)
        #[arg(long)]
        start_s: Option<f64>,

        /// Window end offset in seconds
        #[arg(long)]
        end_s: Option<f64>,

        /// Index of the element set in the cached sequence (default: newest)
        #[arg(long)]
        record_index: Option<usize>,

        /// Output CSV path
        #[arg(long, default_value = "orbit.csv")]
        output: PathBuf,

        /// Epoch window used when the cache must be filled (YYYY-MM-DD)
        #[arg(long, default_value = "2020-01-01")]
        start: NaiveDate,

        /// Epoch window end (YYYY-MM-DD)
        #[arg(long, default_value = "2022-01-01")]
        end: NaiveDate,

        /// Refetch even when a cached file exists
        #[arg(long)]
        force: bool,
    },
}

/// How the errors subcommand reports its results.
struct ErrorsSpec {
    output: Option<PathBuf>,
    fail_fast: bool,
    top: usize,
}

/// Window selection for the track subcommand.
struct TrackSpec {
    periods: f64,
    step: f64,
    start_s: Option<f64>,
    end_s: Option<f64>,
    record_index: Option<usize>,
}

impl TrackSpec {
    fn window(&self) -> Result<TrackWindow> {
        match (self.start_s, self.end_s) {
            (None, None) => Ok(TrackWindow::periods(self.periods, self.step)?),
            (Some(start), Some(end)) => Ok(TrackWindow::offsets(start, end, self.step)?),
            _ => Err(CliError::InvalidArgument(
                "--start-s and --end-s must be given together".to_string(),
            )),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let settings = config::load_config();
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| PathBuf::from(&settings.data.dir));
    let cache = CatalogCache::new(data_dir);

    let result = match cli.command {
        Commands::Fetch {
            norad_ids,
            start,
            end,
            limit,
            force,
        } => cmd_fetch(&settings, cache, &norad_ids, EpochRange { start, end }, limit, force).await,
        Commands::Discos { launch_ids, force } => {
            cmd_discos(&settings, cache, &launch_ids, force).await
        }
        Commands::Errors {
            norad_id,
            start,
            end,
            output,
            fail_fast,
            top,
            force,
        } => {
            let spec = ErrorsSpec {
                output,
                fail_fast,
                top,
            };
            cmd_errors(&settings, cache, norad_id, EpochRange { start, end }, spec, force).await
        }
        Commands::Track {
            norad_id,
            periods,
            step,
            start_s,
            end_s,
            record_index,
            output,
            start,
            end,
            force,
        } => {
            let spec = TrackSpec {
                periods,
                step,
                start_s,
                end_s,
                record_index,
            };
            cmd_track(
                &settings,
                cache,
                norad_id,
                EpochRange { start, end },
                spec,
                &output,
                force,
            )
            .await
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn gp_provider(settings: &Config, cache: CatalogCache) -> Result<GpProvider> {
    Ok(GpProvider::new(
        SpaceTrackClient::new()?,
        cache,
        settings.spacetrack_credentials(),
    ))
}

async fn cmd_fetch(
    settings: &Config,
    cache: CatalogCache,
    norad_ids: &[u32],
    range: EpochRange,
    limit: Option<u32>,
    force: bool,
) -> Result<()> {
    let cache_root = cache.root().to_path_buf();
    let mut provider = gp_provider(settings, cache)?;

    let mut table = Table::new();
    table.set_header(vec!["NORAD", "Rows", "First epoch", "Last epoch"]);

    for &norad_id in norad_ids {
        let rows = provider.records(norad_id, &range, limit, force).await?;
        let sequence = TleSequence::from_records(spacetrack::tle_records(&rows)?);

        let (first, last) = match sequence.span() {
            Some((first, last)) => (
                first.format("%Y-%m-%d %H:%M").to_string(),
                last.format("%Y-%m-%d %H:%M").to_string(),
            ),
            None => ("-".to_string(), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(norad_id),
            Cell::new(rows.len()),
            Cell::new(first),
            Cell::new(last),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("Cache: {}", cache_root.display());
    Ok(())
}

async fn cmd_discos(
    settings: &Config,
    cache: CatalogCache,
    launch_ids: &[String],
    force: bool,
) -> Result<()> {
    let client = match settings.discos_token() {
        Some(token) => Some(DiscosClient::new(token)?),
        None => None,
    };
    let provider = DiscosProvider::new(client, cache);

    let mut table = Table::new();
    table.set_header(vec![
        "Launch", "Satno", "Name", "Class", "Mass (kg)", "Shape", "Span (m)",
    ]);

    for launch_id in launch_ids {
        let objects = provider.objects(launch_id, force).await?;
        println!(
            "launch {launch_id}: {} object(s), satnos {:?}",
            objects.len(),
            discos::satnos(&objects)
        );

        for object in &objects {
            table.add_row(vec![
                Cell::new(launch_id),
                Cell::new(
                    object
                        .satno
                        .map(|n| n.to_string())
                        .unwrap_or("-".into()),
                ),
                Cell::new(object.name.as_deref().unwrap_or("-")),
                Cell::new(object.object_class.as_deref().unwrap_or("-")),
                Cell::new(
                    object
                        .mass
                        .map(|m| format!("{m:.1}"))
                        .unwrap_or("-".into()),
                ),
                Cell::new(object.shape.as_deref().unwrap_or("-")),
                Cell::new(
                    object
                        .span
                        .map(|s| format!("{s:.2}"))
                        .unwrap_or("-".into()),
                ),
            ]);
        }
    }

    println!();
    println!("{table}");
    Ok(())
}

async fn cmd_errors(
    settings: &Config,
    cache: CatalogCache,
    norad_id: u32,
    range: EpochRange,
    spec: ErrorsSpec,
    force: bool,
) -> Result<()> {
    let mut provider = gp_provider(settings, cache)?;
    let rows = provider.records(norad_id, &range, None, force).await?;

    // Cached files may span a wider window than this run asked for.
    let records: Vec<TleRecord> = spacetrack::tle_records(&rows)?
        .into_iter()
        .filter(|record| range.contains(record.epoch))
        .collect();
    let sequence = TleSequence::from_records(records);

    if sequence.len() < 2 {
        println!(
            "{} element set(s) for {norad_id} in the window: nothing to pair",
            sequence.len()
        );
        return Ok(());
    }

    let samples = if spec.fail_fast {
        compute_errors_strict(&sequence)?
    } else {
        compute_errors(&sequence)
    };

    for sample in &samples {
        if let Err(err) = &sample.error {
            log::warn!("pair at {}: {err}", sample.epoch);
        }
    }

    let stats = report::drift_stats(&samples);
    println!();
    println!(
        "Drift report for {norad_id}: {} pairs, {} failed",
        stats.pairs, stats.failures
    );
    if let (Some(mean), Some(max), Some(at)) = (
        stats.mean_magnitude_km,
        stats.max_magnitude_km,
        stats.max_epoch,
    ) {
        println!("  Mean |error|: {mean:.3} km");
        println!("  Max  |error|: {max:.3} km at {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    println!();
    println!("{}", drift_table(&samples, spec.top));

    if let Some(path) = spec.output.as_deref() {
        report::write_drift_csv(path, &samples)?;
        println!();
        println!("Report: {} ({} rows)", path.display(), samples.len());
    }
    Ok(())
}

async fn cmd_track(
    settings: &Config,
    cache: CatalogCache,
    norad_id: u32,
    range: EpochRange,
    spec: TrackSpec,
    output: &Path,
    force: bool,
) -> Result<()> {
    let mut provider = gp_provider(settings, cache)?;
    let rows = provider.records(norad_id, &range, None, force).await?;
    let sequence = TleSequence::from_records(spacetrack::tle_records(&rows)?);

    if sequence.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "no element sets cached for {norad_id}"
        )));
    }

    let index = spec.record_index.unwrap_or(sequence.len() - 1);
    let record = sequence.records().get(index).ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "record index {index} out of range (have {})",
            sequence.len()
        ))
    })?;

    let window = spec.window()?;
    let points = sample_track(record, &window)?;
    report::write_track_csv(output, &points)?;

    println!();
    println!(
        "Sampled {} point(s) for {norad_id} from the element set at {}",
        points.len(),
        record.epoch.format("%Y-%m-%d %H:%M:%S")
    );
    println!("Track: {}", output.display());
    Ok(())
}

/// Worst pairs first; failed pairs sort to the end with their status text.
fn drift_table(samples: &[DriftSample], top: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Epoch",
        "Elapsed (h)",
        "dX (km)",
        "dY (km)",
        "dZ (km)",
        "|error| (km)",
        "Status",
    ]);

    let mut ordered: Vec<&DriftSample> = samples.iter().collect();
    ordered.sort_by(|a, b| {
        let magnitude = |sample: &DriftSample| {
            sample
                .error
                .as_ref()
                .map(|error| error.magnitude_km)
                .unwrap_or(f64::NEG_INFINITY)
        };
        magnitude(b)
            .partial_cmp(&magnitude(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for sample in ordered.into_iter().take(top) {
        let epoch = sample.epoch.format("%Y-%m-%d %H:%M:%S").to_string();
        let elapsed = format!("{:.2}", sample.elapsed_seconds / 3600.0);
        match &sample.error {
            Ok(error) => table.add_row(vec![
                Cell::new(epoch),
                Cell::new(elapsed),
                Cell::new(format!("{:+.3}", error.error_km.x)),
                Cell::new(format!("{:+.3}", error.error_km.y)),
                Cell::new(format!("{:+.3}", error.error_km.z)),
                Cell::new(format!("{:.3}", error.magnitude_km)),
                Cell::new("ok"),
            ]),
            Err(err) => table.add_row(vec![
                Cell::new(epoch),
                Cell::new(elapsed),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(err.to_string()),
            ]),
        };
    }

    table
}
