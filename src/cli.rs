use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fracpaq::{AnalysisConfig, RoseScalar};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line options of the `fracpaq` binary.
///
/// Values given on the command line override those read from `--config`.
#[derive(Debug, Parser)]
#[command(name = "fracpaq")]
#[command(about = "Orientation statistics and stress analysis of 2-D fracture traces")]
pub struct Cli {
    /// Text file of segments (`x1 y1 x2 y2` per line) or polylines with `--traces`.
    pub input: PathBuf,

    /// Read each line as a polyline trace instead of a single segment.
    #[arg(long)]
    pub traces: bool,

    /// TOML file with `[stress]`, `[view]` and `[rose]` tables.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum principal stress.
    #[arg(long, allow_negative_numbers = true)]
    pub sigma1: Option<f64>,

    /// Minimum principal stress.
    #[arg(long, allow_negative_numbers = true)]
    pub sigma2: Option<f64>,

    /// Azimuth of sigma1 in degrees clockwise from north.
    #[arg(long, allow_negative_numbers = true)]
    pub theta: Option<f64>,

    /// Cohesion of the Coulomb criterion.
    #[arg(long, allow_negative_numbers = true)]
    pub cohesion: Option<f64>,

    /// Pore fluid pressure.
    #[arg(long, allow_negative_numbers = true)]
    pub pore_pressure: Option<f64>,

    /// Coefficient of friction.
    #[arg(long, allow_negative_numbers = true)]
    pub friction: Option<f64>,

    /// Mirror the map about its vertical axis.
    #[arg(long)]
    pub flip_x: bool,

    /// Mirror the map about its horizontal axis.
    #[arg(long)]
    pub flip_y: bool,

    /// Sectors of the simple orientation rose.
    #[arg(long)]
    pub bins: Option<usize>,

    /// Sectors of the stress rose.
    #[arg(long)]
    pub dir_bins: Option<usize>,

    /// Scalar shown on the stress rose (count, slip-tendency, dilation-tendency,
    /// susceptibility, csf).
    #[arg(long, default_value = "slip-tendency")]
    pub rose: RoseScalar,

    /// Print the results as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load the configuration file, if any, and apply command-line overrides.
    pub fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        let stress = &mut config.stress;
        for (target, value) in [
            (&mut stress.sigma1, self.sigma1),
            (&mut stress.sigma2, self.sigma2),
            (&mut stress.theta_deg, self.theta),
            (&mut stress.cohesion, self.cohesion),
            (&mut stress.pore_pressure, self.pore_pressure),
            (&mut stress.friction, self.friction),
        ] {
            if let Some(value) = value {
                *target = value;
            }
        }
        config.view.flip_x |= self.flip_x;
        config.view.flip_y |= self.flip_y;
        if let Some(bins) = self.bins {
            config.rose.bins = bins;
        }
        if let Some(dir_bins) = self.dir_bins {
            config.rose.dir_bins = dir_bins;
        }

        config
            .validate()
            .context("invalid command-line parameters")?;
        Ok(config)
    }
}

/// Install the stderr logger; `RUST_LOG` takes precedence over `verbose`.
pub fn init_logger(verbose: bool) {
    let default = if verbose { "fracpaq=debug,info" } else { "fracpaq=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "fracpaq",
            "map.txt",
            "--sigma1",
            "80",
            "--theta",
            "-30",
            "--flip-y",
            "--rose",
            "csf",
        ]);
        let config = cli.resolve_config().expect("valid flags");
        assert_eq!(config.stress.sigma1, 80.0);
        assert_eq!(config.stress.sigma2, 50.0);
        assert_eq!(config.stress.theta_deg, -30.0);
        assert!(config.view.flip_y);
        assert!(!config.view.flip_x);
        assert_eq!(cli.rose, RoseScalar::CriticallyStressed);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[stress]\nsigma1 = 70.0\nfriction = 0.8\n[rose]\nbins = 12")
            .expect("write");
        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::parse_from(["fracpaq", "map.txt", "--config", &path, "--friction", "0.4"]);
        let config = cli.resolve_config().expect("valid config");
        assert_eq!(config.stress.sigma1, 70.0);
        assert_eq!(config.stress.friction, 0.4);
        assert_eq!(config.rose.bins, 12);
    }

    #[test]
    fn zero_bins_flag_is_rejected() {
        let cli = Cli::parse_from(["fracpaq", "map.txt", "--dir-bins", "0"]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn unknown_scalar_is_a_usage_error() {
        assert!(Cli::try_parse_from(["fracpaq", "map.txt", "--rose", "porosity"]).is_err());
    }
}
