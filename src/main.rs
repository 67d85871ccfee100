use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use prism_field::{ConfigError, FieldConfig, HeroScene, ShapeSpec};

/// Interactive particle field that forms a logo or halo.
#[derive(Parser, Debug)]
#[command(name = "prism-field", version, about)]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of particles
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Shape preset
    #[arg(short, long, value_enum)]
    shape: Option<ShapePreset>,

    /// Image whose alpha channel is used as the shape
    #[arg(short, long, conflicts_with = "shape")]
    mask: Option<PathBuf>,

    /// RNG seed for reproducible fields
    #[arg(long)]
    seed: Option<u64>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ShapePreset {
    Halo,
    Logo,
    LogoWithHalo,
}

impl From<ShapePreset> for ShapeSpec {
    fn from(preset: ShapePreset) -> Self {
        match preset {
            ShapePreset::Halo => ShapeSpec::Halo,
            ShapePreset::Logo => ShapeSpec::Logo { diameter: 900.0 },
            ShapePreset::LogoWithHalo => ShapeSpec::LogoWithHalo,
        }
    }
}

impl Cli {
    /// Log filter requested by `-v`/`-q`, if any.
    fn level_filter(&self) -> Option<log::LevelFilter> {
        match (self.verbose, self.quiet) {
            (0, false) => None,
            (0, true) => Some(log::LevelFilter::Error),
            (1, _) => Some(log::LevelFilter::Info),
            (2, _) => Some(log::LevelFilter::Debug),
            _ => Some(log::LevelFilter::Trace),
        }
    }

    /// Apply command-line overrides on top of `config` and re-validate.
    fn merge_into(&self, config: &mut FieldConfig) -> Result<(), ConfigError> {
        if let Some(count) = self.count {
            config.particle_count = count;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(preset) = self.shape {
            config.shape = preset.into();
        }
        if let Some(mask) = &self.mask {
            config.shape = ShapeSpec::Image { path: mask.clone() };
        }
        config.validate()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = cli.level_filter() {
        logger.filter_level(level);
    }
    logger.init();

    let mut config = match &cli.config {
        Some(path) => FieldConfig::load(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => FieldConfig::default(),
    };
    cli.merge_into(&mut config).context("invalid command-line options")?;

    let scene = match HeroScene::from_config(config.clone()) {
        Ok(scene) => scene,
        Err(e) => {
            log::warn!("{e}; falling back to the halo");
            HeroScene::new(config)
        }
    };

    scene.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_field::config::MAX_PARTICLE_COUNT;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("prism-field").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(parse(&[]).level_filter(), None);
        assert_eq!(parse(&["-q"]).level_filter(), Some(log::LevelFilter::Error));
        assert_eq!(parse(&["-v"]).level_filter(), Some(log::LevelFilter::Info));
        assert_eq!(parse(&["-vv"]).level_filter(), Some(log::LevelFilter::Debug));
        assert_eq!(parse(&["-vvvv"]).level_filter(), Some(log::LevelFilter::Trace));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["prism-field", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_verbose_enables_info_in_logger() {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters("warn");
        builder.filter_level(parse(&["-v"]).level_filter().unwrap());
        let logger = builder.build();
        let info = log::Metadata::builder().level(log::Level::Info).target("prism_field").build();
        assert!(log::Log::enabled(&logger, &info));
    }

    #[test]
    fn test_overrides_merge_into_config() {
        let mut config = FieldConfig::default();
        parse(&["--count", "500", "--seed", "9", "--shape", "logo-with-halo"])
            .merge_into(&mut config)
            .unwrap();
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.shape, ShapeSpec::LogoWithHalo);
    }

    #[test]
    fn test_mask_overrides_config_shape() {
        let mut config = FieldConfig {
            shape: ShapeSpec::Halo,
            ..FieldConfig::default()
        };
        parse(&["--mask", "logo.png"]).merge_into(&mut config).unwrap();
        assert_eq!(config.shape, ShapeSpec::Image { path: PathBuf::from("logo.png") });
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = FieldConfig {
            particle_count: 42,
            ..FieldConfig::default()
        };
        parse(&[]).merge_into(&mut config).unwrap();
        assert_eq!(config.particle_count, 42);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_count_over_limit_rejected() {
        let mut config = FieldConfig::default();
        let count = (MAX_PARTICLE_COUNT + 1).to_string();
        let err = parse(&["--count", &count]).merge_into(&mut config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
