//! Satellite and radar imagery loops from the public NOAA archives.
//!
//! Fetches GOES-R ABI scenes or NEXRAD Level II volume scans from the open
//! S3 buckets, renders annotated frames, and writes static PNGs or looping
//! GIFs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use archive_client::{GoesArchive, NexradArchive};
use renderer::{Extent, FrameStyle};
use wx_common::time::parse_utc;
use wx_common::{Channel, RadarSelector, Satellite, SatelliteSelector, Sector, TimeWindow};

use wxloop::config::{RadarFrameConfig, SatelliteFrameConfig, SatelliteLoopConfig};
use wxloop::pipeline::{run_radar_frame, run_satellite_frame, run_satellite_loop};

#[derive(Parser, Debug)]
#[command(name = "wxloop")]
#[command(about = "Render satellite and radar imagery from the public NOAA archives")]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one satellite scene to a PNG
    Satellite(SatelliteArgs),
    /// Compile a satellite time window into a looping GIF
    SatelliteLoop(SatelliteLoopArgs),
    /// Render one radar volume scan to a PNG
    Radar(RadarArgs),
}

#[derive(ClapArgs, Debug)]
struct ProductArgs {
    /// Satellite (goes16, goes18, goes19)
    #[arg(long, default_value = "goes16")]
    satellite: Satellite,

    /// Scan sector (conus, fulldisk, meso1, meso2)
    #[arg(long, default_value = "conus")]
    sector: Sector,

    /// ABI band (C01..C16) or "geocolor"
    #[arg(long, default_value = "C02")]
    channel: Channel,
}

impl ProductArgs {
    fn selector(&self) -> Result<SatelliteSelector> {
        Ok(SatelliteSelector::new(
            self.satellite,
            self.sector,
            self.channel,
        )?)
    }
}

#[derive(ClapArgs, Debug)]
struct StyleArgs {
    /// Output width in pixels
    #[arg(long, default_value = "1200")]
    width: usize,

    /// Output height in pixels
    #[arg(long, default_value = "700")]
    height: usize,

    /// Regional crop preset (conus, southeast, northeast, ...)
    #[arg(long)]
    extent: Option<String>,

    /// Banner title override
    #[arg(long)]
    title: Option<String>,

    /// Skip the identifier/timestamp banner
    #[arg(long)]
    no_banner: bool,
}

impl StyleArgs {
    fn satellite_style(&self) -> Result<FrameStyle> {
        let mut style = FrameStyle::satellite(self.width, self.height);
        self.apply(&mut style)?;
        Ok(style)
    }

    fn radar_style(&self) -> Result<FrameStyle> {
        let mut style = FrameStyle::radar(self.width, self.height);
        self.apply(&mut style)?;
        Ok(style)
    }

    fn apply(&self, style: &mut FrameStyle) -> Result<()> {
        if let Some(name) = &self.extent {
            style.extent = Some(Extent::preset(name)?);
        }
        style.title = self.title.clone();
        style.banner = !self.no_banner;
        style.validate()?;
        Ok(())
    }
}

#[derive(ClapArgs, Debug)]
struct SatelliteArgs {
    #[command(flatten)]
    product: ProductArgs,

    /// Requested scene time (UTC, e.g. 2019-09-01T06:00)
    #[arg(long, value_parser = parse_utc)]
    at: DateTime<Utc>,

    #[command(flatten)]
    style: StyleArgs,

    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct SatelliteLoopArgs {
    #[command(flatten)]
    product: ProductArgs,

    /// Window start (UTC)
    #[arg(long, value_parser = parse_utc)]
    start: DateTime<Utc>,

    /// Window end (UTC, inclusive)
    #[arg(long, value_parser = parse_utc)]
    end: DateTime<Utc>,

    /// Minutes between frames
    #[arg(long, default_value = "60")]
    step_minutes: i64,

    /// GIF frame delay in milliseconds
    #[arg(long, default_value = "100")]
    delay_ms: u32,

    #[command(flatten)]
    style: StyleArgs,

    /// Output GIF path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct RadarArgs {
    /// Radar site id (e.g. KTLX)
    #[arg(long)]
    site: String,

    /// Requested volume time (UTC)
    #[arg(long, value_parser = parse_utc)]
    at: DateTime<Utc>,

    #[command(flatten)]
    style: StyleArgs,

    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Satellite(args) => {
            let selector = args.product.selector()?;
            let cfg = SatelliteFrameConfig {
                selector,
                at: args.at,
                style: args.style.satellite_style()?,
                output: args.output,
            };
            info!(product = %selector.product_name(), at = %cfg.at, "Starting satellite frame");

            let archive =
                GoesArchive::open(selector).context("failed to open satellite archive")?;
            run_satellite_frame(&archive, &cfg)
                .await
                .context("satellite frame run failed")?;
        }
        Command::SatelliteLoop(args) => {
            let selector = args.product.selector()?;
            let window =
                TimeWindow::new(args.start, args.end, Duration::minutes(args.step_minutes))?;
            let cfg = SatelliteLoopConfig {
                selector,
                window,
                style: args.style.satellite_style()?,
                frame_delay_ms: args.delay_ms,
                output: args.output,
            };
            info!(
                product = %selector.product_name(),
                frames = window.frame_count(),
                "Starting satellite loop"
            );

            let archive =
                GoesArchive::open(selector).context("failed to open satellite archive")?;
            run_satellite_loop(&archive, &cfg)
                .await
                .context("satellite loop run failed")?;
        }
        Command::Radar(args) => {
            let selector = RadarSelector::new(&args.site)?;
            let cfg = RadarFrameConfig {
                selector: selector.clone(),
                at: args.at,
                style: args.style.radar_style()?,
                output: args.output,
            };
            info!(site = %selector.site, at = %cfg.at, "Starting radar frame");

            let archive = NexradArchive::open(selector).context("failed to open radar archive")?;
            run_radar_frame(&archive, &cfg)
                .await
                .context("radar frame run failed")?;
        }
    }

    Ok(())
}
