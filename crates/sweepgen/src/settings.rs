//! Sweep config loading and command-line overrides

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use sweepgen_core::config::{Preset, SweepConfig, Target};
use sweepgen_core::launcher::LauncherTemplate;
use sweepgen_core::render::SeedMode;

use crate::cli::{Args, TargetArg};

/// Parse a sweep config from YAML text
pub fn parse_config(yaml: &str) -> color_eyre::Result<SweepConfig> {
    serde_saphyr::from_str(yaml).map_err(|e| eyre!("failed to parse sweep config: {e}"))
}

/// Serialize a sweep config to YAML text
pub fn config_to_yaml(config: &SweepConfig) -> color_eyre::Result<String> {
    serde_saphyr::to_string(config).map_err(|e| eyre!("failed to serialize sweep config: {e}"))
}

pub fn load_config(path: &Path) -> color_eyre::Result<SweepConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read sweep config {}", path.display()))?;
    parse_config(&content).wrap_err_with(|| format!("in {}", path.display()))
}

/// Config file if given, otherwise the selected preset, with overrides applied
pub fn resolve_config(args: &Args) -> color_eyre::Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SweepConfig::new(Preset::from(args.preset).grid()),
    };
    apply_overrides(&mut config, args);
    Ok(config)
}

pub fn apply_overrides(config: &mut SweepConfig, args: &Args) {
    if let Some(target) = args.target {
        let wanted = match target {
            TargetArg::Local => "local",
            TargetArg::Cluster => "cluster",
        };
        if config.target.name() != wanted {
            config.target = match target {
                TargetArg::Local => Target::local(),
                TargetArg::Cluster => Target::cluster(),
            };
        }
    }

    if let Some(runs) = args.runs {
        config.target = config.target.clone().with_redundant_runs(runs);
    }

    if let Some(files) = args.files {
        if matches!(config.target, Target::Local { .. }) {
            tracing::warn!(files, "local target always writes a single batch file");
        }
        config.target = config.target.clone().with_file_count(files);
    }

    if let Some(seed) = args.seed {
        config.rng_seed = Some(seed);
    }
    if args.random_seeds {
        config.invocation.seed_mode = SeedMode::Random;
    }
    if args.shuffle {
        config.shuffle = true;
    }
    if args.keep_intermediate {
        config.files.keep_intermediate = true;
    }
}

/// Read the launcher template named on the command line, if any
pub fn load_template(
    args: &Args,
    config: &SweepConfig,
) -> color_eyre::Result<Option<LauncherTemplate>> {
    let Some(path) = &args.template else {
        return Ok(None);
    };

    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read launcher template {}", path.display()))?;
    let template = LauncherTemplate::new(text, config.placeholder.clone())
        .wrap_err_with(|| format!("invalid launcher template {}", path.display()))?;
    Ok(Some(template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sweepgen_core::expand::ReplicateOrder;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
grid:
  - name: stochasticity
    values: [2]
  - name: hydrochory
    values: [true, false]
  - name: implantation
    values: [0.0005, "0.0010"]
target:
  kind: cluster
  redundant_runs: 10
  file_count: 4
  classpath_entries: ["../jointvetch/", "../lib/mason.17.jar"]
invocation:
  seed_mode: random
replicate_order: tuple_major
scheduler: qsub
"#;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["sweepgen"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(CONFIG).unwrap();

        assert_eq!(config.grid.shape(), vec![1, 2, 2]);
        assert_eq!(config.grid.dimensions[1].values[0].as_str(), "true");
        assert_eq!(config.grid.dimensions[2].values[0].as_str(), "0.0005");
        assert_eq!(config.grid.dimensions[2].values[1].as_str(), "0.0010");
        assert_eq!(config.redundant_runs(), 10);
        assert_eq!(config.file_count(), 4);
        assert_eq!(config.target.output_suffix(), ".txt");
        assert_eq!(config.invocation.seed_mode, SeedMode::Random);
        assert_eq!(config.invocation.program, "jointvetch.HoltsCreek");
        assert_eq!(config.replicate_order, ReplicateOrder::TupleMajor);
        assert_eq!(config.scheduler, "qsub");
        assert_eq!(config.placeholder, "testrun");
    }

    #[test]
    fn test_unquoted_values_are_read_as_numbers() {
        let config = parse_config("grid:\n  - values: [0.0010, \"0.0010\", 0.00001, 2]\n").unwrap();
        let values: Vec<&str> = config.grid.dimensions[0]
            .values
            .iter()
            .map(|v| v.as_str())
            .collect();
        assert_eq!(values, vec!["0.001", "0.0010", "0.00001", "2"]);
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let mut config = SweepConfig::new(Preset::Hydrochory.grid());
        config.rng_seed = Some(2014);
        config.invocation.seed_mode = SeedMode::Random;
        let yaml = config_to_yaml(&config).unwrap();
        assert_eq!(parse_config(&yaml).unwrap(), config);
    }

    #[test]
    fn test_local_target_from_yaml() {
        let config = parse_config(
            "grid:\n  - values: [1, 2]\ntarget:\n  kind: local\n  output_root: /home/user/results/\n",
        )
        .unwrap();
        assert_eq!(config.target.name(), "local");
        assert_eq!(config.redundant_runs(), 30);
        assert_eq!(config.file_count(), 1);
        assert_eq!(config.target.output_root(), "/home/user/results/");
    }

    #[test]
    fn test_resolve_preset_with_overrides() {
        let config = resolve_config(&args(&[
            "--preset",
            "stochasticity",
            "--target",
            "cluster",
            "--runs",
            "2",
            "--files",
            "5",
            "--seed",
            "8",
            "--random-seeds",
            "--shuffle",
            "--keep-intermediate",
        ]))
        .unwrap();

        assert_eq!(config.grid, Preset::Stochasticity.grid());
        assert_eq!(config.redundant_runs(), 2);
        assert_eq!(config.file_count(), 5);
        assert_eq!(config.rng_seed, Some(8));
        assert_eq!(config.invocation.seed_mode, SeedMode::Random);
        assert!(config.shuffle);
        assert!(config.files.keep_intermediate);
    }

    #[test]
    fn test_target_override_keeps_matching_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sweep.yaml");
        fs::write(&path, CONFIG).unwrap();

        let path_str = path.to_str().unwrap();
        let same = resolve_config(&args(&["--config", path_str, "--target", "cluster"])).unwrap();
        assert_eq!(same.file_count(), 4);

        let switched = resolve_config(&args(&["--config", path_str, "--target", "local"])).unwrap();
        assert_eq!(switched.target, Target::local());
    }

    #[test]
    fn test_load_template_checks_placeholder() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("launcher.slurm");
        let bad = dir.path().join("broken.slurm");
        fs::write(&good, "#SBATCH -J testrun\n").unwrap();
        fs::write(&bad, "#SBATCH -J job\n").unwrap();
        let config = SweepConfig::default();

        let template = load_template(&args(&["--template", good.to_str().unwrap()]), &config)
            .unwrap()
            .unwrap();
        assert_eq!(template.render(1), "#SBATCH -J testrun01\n");

        assert!(load_template(&args(&["--template", bad.to_str().unwrap()]), &config).is_err());
        assert!(load_template(&args(&[]), &config).unwrap().is_none());
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let err = load_config(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read sweep config"));
    }
}
