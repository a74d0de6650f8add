//! End-to-end runs into a temporary directory

use std::fs;

use tempfile::tempdir;

use crate::config::{SweepBuilder, Target};
use crate::error::{ConfigError, Stage, SweepError};
use crate::launcher::LauncherTemplate;
use crate::model::{Dimension, ParamValue};
use crate::pipeline::{plan_sweep, run_sweep};

fn scenario() -> SweepBuilder {
    SweepBuilder::new()
        .dimension(Dimension::ints("stochasticity", [2]))
        .dimension(Dimension::bools("hydrochory", [true, false]))
        .dimension(Dimension::floats("implantation", [0.0, 0.1]))
        .target(Target::cluster())
        .redundant_runs(1)
        .file_count(2)
}

#[test]
fn test_run_writes_batches_launchers_and_scripts() {
    let dir = tempdir().unwrap();
    let config = scenario().build().unwrap();

    let report = run_sweep(&config, dir.path(), None).unwrap();

    assert_eq!(report.plan.command_count, 4);
    assert_eq!(report.plan.realized_batches, 2);
    assert_eq!(report.batch_files.len(), 2);
    assert_eq!(report.launcher_files.len(), 2);

    let batch1 = fs::read_to_string(dir.path().join("testrun01")).unwrap();
    let batch2 = fs::read_to_string(dir.path().join("testrun02")).unwrap();
    assert_eq!(batch1.lines().count(), 2);
    assert_eq!(batch2.lines().count(), 2);
    assert!(batch1.ends_with('\n'));
    assert!(batch1.contains(" 2 true 0.0 -quiet >> results/2_true_0.0.txt\n"));
    assert!(batch2.contains(">> results/2_false_0.1.txt\n"));

    let launch1 = fs::read_to_string(dir.path().join("launch01")).unwrap();
    let launch2 = fs::read_to_string(dir.path().join("launch02")).unwrap();
    assert!(launch1.contains("LAUNCHER_JOB_FILE=testrun01"));
    assert!(launch2.contains("#SBATCH -J testrun02"));

    let queue = fs::read_to_string(&report.queue_script).unwrap();
    assert_eq!(queue, "#!/bin/bash\nsbatch launch01\nsbatch launch02\n");

    let compile = fs::read_to_string(&report.compile_script).unwrap();
    assert_eq!(compile.lines().count(), 2);
    assert!(compile.contains("javac -classpath \"../jointvetch/:"));

    // Intermediate pool is cleaned up by default
    assert!(report.pool_file.is_none());
    assert!(!dir.path().join("runs.sh").exists());
}

#[test]
fn test_run_keeps_pool_when_asked() {
    let dir = tempdir().unwrap();
    let config = scenario().keep_intermediate(true).build().unwrap();

    let report = run_sweep(&config, dir.path(), None).unwrap();

    let pool = fs::read_to_string(report.pool_file.unwrap()).unwrap();
    assert_eq!(pool.lines().count(), 4);
}

#[test]
fn test_run_with_custom_template() {
    let dir = tempdir().unwrap();
    let config = scenario().build().unwrap();
    let template =
        LauncherTemplate::new("#SBATCH -J testrun\nparamrun testrun\n", "testrun").unwrap();

    run_sweep(&config, dir.path(), Some(&template)).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("launch02")).unwrap(),
        "#SBATCH -J testrun02\nparamrun testrun02\n"
    );
}

#[test]
fn test_more_files_than_commands() {
    let dir = tempdir().unwrap();
    let config = scenario().file_count(50).build().unwrap();

    let report = run_sweep(&config, dir.path(), None).unwrap();

    assert_eq!(report.plan.requested_batches, 50);
    assert_eq!(report.batch_files.len(), 4);
    assert_eq!(report.launcher_files.len(), 4);
    assert!(dir.path().join("testrun04").exists());
    assert!(!dir.path().join("testrun05").exists());
    assert!(!dir.path().join("launch05").exists());
}

#[test]
fn test_zero_commands_is_not_an_error() {
    let dir = tempdir().unwrap();
    let config = scenario().redundant_runs(0).build().unwrap();

    let report = run_sweep(&config, dir.path(), None).unwrap();

    assert_eq!(report.plan.command_count, 0);
    assert!(report.batch_files.is_empty());
    assert!(report.launcher_files.is_empty());
    assert_eq!(
        fs::read_to_string(&report.queue_script).unwrap(),
        "#!/bin/bash\n"
    );
}

#[test]
fn test_local_target_single_batch_without_classpath() {
    let dir = tempdir().unwrap();
    let config = scenario().local().redundant_runs(3).build().unwrap();

    let report = run_sweep(&config, dir.path(), None).unwrap();

    assert_eq!(report.batch_files.len(), 1);
    let batch = fs::read_to_string(&report.batch_files[0]).unwrap();
    assert_eq!(batch.lines().count(), 12);
    assert!(!batch.contains("-classpath"));
    assert!(batch.contains(">> results/2_true_0.0\n"));

    let compile = fs::read_to_string(&report.compile_script).unwrap();
    assert_eq!(compile, "#!/bin/bash\njavac jointvetch/*.java\n");
}

#[test]
fn test_config_error_before_any_write() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let config = scenario()
        .dimension(Dimension::named("empty", vec![]))
        .build_unchecked();

    let err = run_sweep(&config, &out, None).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Config(ConfigError::EmptyDimension { index: 3, .. })
    ));
    assert!(!out.exists());
}

#[test]
fn test_strict_keys_rejects_collisions() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let config = SweepBuilder::new()
        .dimension(Dimension::named(
            "a",
            vec![ParamValue::literal("1"), ParamValue::int(1)],
        ))
        .strict_keys(true)
        .build()
        .unwrap();

    let err = run_sweep(&config, &out, None).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Config(ConfigError::KeyCollision { count: 2, .. })
    ));
    assert!(!out.exists());

    // Non-strict runs only warn
    let lenient = SweepBuilder::new()
        .dimension(Dimension::named(
            "a",
            vec![ParamValue::literal("1"), ParamValue::int(1)],
        ))
        .build()
        .unwrap();
    assert_eq!(plan_sweep(&lenient).unwrap().collisions.len(), 1);
}

#[test]
fn test_filesystem_error_names_stage() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let config = scenario().build().unwrap();

    let err = run_sweep(&config, &blocker.join("out"), None).unwrap_err();
    match err {
        SweepError::Filesystem(e) => assert_eq!(e.stage, Stage::Prepare),
        other => panic!("expected filesystem error, got {other:?}"),
    }
}

#[test]
fn test_plan_matches_run() {
    let dir = tempdir().unwrap();
    let config = scenario().redundant_runs(5).file_count(3).build().unwrap();

    let plan = plan_sweep(&config).unwrap();
    let report = run_sweep(&config, dir.path(), None).unwrap();

    assert_eq!(plan, report.plan);
    assert_eq!(plan.command_count, 20);
    assert_eq!(plan.per_file, 7);
    assert_eq!(report.batch_files.len(), 3);
}

#[test]
fn test_custom_batch_prefix_reaches_launchers() {
    let dir = tempdir().unwrap();
    let config = scenario().batch_prefix("job").build().unwrap();

    let report = run_sweep(&config, dir.path(), None).unwrap();

    assert!(dir.path().join("job01").exists());
    assert!(!dir.path().join("testrun01").exists());
    for (index, launcher) in report.launcher_files.iter().enumerate() {
        let contents = fs::read_to_string(launcher).unwrap();
        let batch = format!("job{:02}", index + 1);
        assert!(contents.contains(&format!("LAUNCHER_JOB_FILE={batch}\n")));
        assert!(dir.path().join(&batch).exists());
    }
}

#[test]
fn test_launcher_prefix_matching_batches_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let config = scenario().launcher_prefix("testrun").build_unchecked();

    let err = run_sweep(&config, &out, None).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Config(ConfigError::FileNameClash { .. })
    ));
    assert!(!out.exists());
    assert!(scenario().launcher_prefix("testrun").build().is_err());
}

#[test]
fn test_pool_file_named_like_batch_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let mut config = scenario().build().unwrap();
    config.files.pool_file = "testrun02".to_string();

    let err = run_sweep(&config, &out, None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "configuration error: output files \"testrun02\" and \"testrunNN\" would overwrite each other"
    );
    assert!(!out.exists());
}

#[test]
fn test_every_command_survives_distinct_layout() {
    let dir = tempdir().unwrap();
    let config = scenario()
        .redundant_runs(3)
        .file_count(5)
        .batch_prefix("sweep")
        .launcher_prefix("submit")
        .keep_intermediate(true)
        .build()
        .unwrap();

    let report = run_sweep(&config, dir.path(), None).unwrap();

    let written: usize = report
        .batch_files
        .iter()
        .map(|path| fs::read_to_string(path).unwrap().lines().count())
        .sum();
    assert_eq!(written, report.plan.command_count);
    assert!(report.pool_file.unwrap().exists());
}
