use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cogeo::cog::{create_cog, create_cog_in_memory, CogOptions, CogProfile, ProfileName};
use cogeo::errors::Result;
use cogeo::raster::ResampleAlg;
use cogeo::{config, Dataset};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};

const PROGRESS_STEPS: u64 = 1000;

/// Convert a raster into a Cloud Optimized GeoTIFF.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source raster, any format GDAL can read
    input: PathBuf,

    /// Destination COG
    output: PathBuf,

    /// Source bands to copy, e.g. 1,2,3 (default: all except --alpha)
    #[arg(long, value_delimiter = ',')]
    bidx: Vec<usize>,

    /// Compression profile: ycbcr, jpeg, webp, zstd, lzw, deflate, packbits or raw
    #[arg(short, long, default_value_t = ProfileName::Deflate)]
    profile: ProfileName,

    /// Nodata value used for masking when the source has none
    #[arg(long)]
    nodata: Option<f64>,

    /// Source alpha band used for masking
    #[arg(long)]
    alpha: Option<usize>,

    /// Number of overview levels (default: until the raster fits in one block)
    #[arg(long)]
    overview_level: Option<u32>,

    /// Overview resampling kernel
    #[arg(long, default_value_t = ResampleAlg::NearestNeighbour)]
    overview_resampling: ResampleAlg,

    /// Extra GTiff creation option, e.g. --co PREDICTOR=2
    #[arg(long = "co", value_name = "KEY=VALUE")]
    creation_options: Vec<String>,

    /// Square block size in pixels
    #[arg(long)]
    blocksize: Option<usize>,

    /// Build the COG in memory and write it out in one go
    #[arg(long)]
    in_memory: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn cog_options(&self) -> Result<CogOptions> {
        let mut profile = CogProfile::named(self.profile);
        if let Some(blocksize) = self.blocksize {
            profile.set_block_size(blocksize);
        }
        for option in &self.creation_options {
            profile.set_creation_option(option)?;
        }
        Ok(CogOptions {
            bands: self.bidx.clone(),
            profile,
            nodata: self.nodata,
            alpha: self.alpha,
            overview_level: self.overview_level,
            overview_resampling: self.overview_resampling,
        })
    }
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(PROGRESS_STEPS);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {percent} % [{elapsed}/{duration}]") {
        bar.set_style(style);
    }
    bar
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.cog_options()?;
    debug!("options: {options:?}");

    let src = Dataset::open(&cli.input)?;
    info!(
        "converting {} ({}x{}, {} bands)",
        cli.input.display(),
        src.raster_size().0,
        src.raster_size().1,
        src.raster_count()
    );

    let bar = progress_bar(cli.quiet);
    let report = |done: f64| bar.set_position((done * PROGRESS_STEPS as f64) as u64);
    if cli.in_memory {
        let cog = create_cog_in_memory(&src, &options, Some(&report))?;
        cog.persist(&cli.output)?;
    } else {
        create_cog(&src, &cli.output, &options, Some(&report))?;
    }
    bar.finish_and_clear();

    info!("wrote {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    config::install_log_error_handler();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
