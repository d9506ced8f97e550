//! End-to-end runs over a real git archive fixture

use std::fs;

use chrono::NaiveDate;
use git2::{Oid, Repository, RepositoryInitOptions, Signature, Time};
use tempfile::TempDir;

use mcbroken_lib::analytics::EconomicModel;
use mcbroken_lib::archive::GitArchive;
use mcbroken_lib::config::EstimatorConfig;
use mcbroken_lib::{estimate_for_date, parse_target_date, AppError, LossPipeline};

const CHICAGO: (f64, f64) = (-87.6298, 41.8781);
const LOS_ANGELES: (f64, f64) = (-118.2437, 34.0522);
const TORONTO: (f64, f64) = (-79.3832, 43.6532);

fn init_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(temp_dir.path(), &opts).expect("Failed to init git repo");
    (temp_dir, repo)
}

fn commit_snapshot(repo: &Repository, content: &str, seconds: i64) -> Oid {
    let mut builder = repo.treebuilder(None).expect("treebuilder");
    let blob = repo.blob(content.as_bytes()).expect("write blob");
    builder.insert("mcbroken.json", blob, 0o100644).expect("insert blob");
    let tree = repo.find_tree(builder.write().expect("write tree")).expect("find tree");

    let sig = Signature::new("archiver", "archiver@example.com", &Time::new(seconds, 0))
        .expect("signature");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, "Update mcbroken.json", &tree, &parents)
        .expect("commit")
}

fn restaurant(coordinates: (f64, f64), country: &str, is_broken: bool) -> String {
    format!(
        r#"{{"geometry":{{"coordinates":[{},{}]}},"properties":{{"country":"{}","is_active":true,"is_broken":{}}}}}"#,
        coordinates.0, coordinates.1, country, is_broken
    )
}

fn snapshot(hour: u32, broken_hours: u32) -> String {
    format!(
        "[{},{},{}]",
        restaurant(CHICAGO, "USA", hour < broken_hours),
        restaurant(LOS_ANGELES, "USA", false),
        restaurant(TORONTO, "Canada", true)
    )
}

fn at(y: i32, m: u32, d: u32, h: u32) -> i64 {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp()
}

/// An archive with one snapshot the evening before and 24 hourly snapshots
/// on 2021-06-01, Chicago broken for the first `broken_hours`
fn archive_fixture(broken_hours: u32) -> (TempDir, Repository) {
    let (temp_dir, repo) = init_repo();
    commit_snapshot(&repo, &snapshot(0, 24), at(2021, 5, 31, 23));
    for hour in 0..24 {
        commit_snapshot(&repo, &snapshot(hour, broken_hours), at(2021, 6, 1, hour));
    }
    (temp_dir, repo)
}

fn june_first() -> NaiveDate {
    parse_target_date("01/06/21").unwrap()
}

#[test]
fn test_full_day_over_git_archive() {
    let (temp_dir, _repo) = archive_fixture(12);
    let archive = GitArchive::open(temp_dir.path()).unwrap();

    let report = LossPipeline::new(&archive, &archive, EconomicModel::default())
        .run(june_first())
        .unwrap();

    // Toronto never counts as broken but still shares the national income
    assert_eq!(report.commit_count, 24);
    assert_eq!(report.breakdown.restaurant_count, 3);
    assert_eq!(report.breakdown.broken_hours, 12);
    assert_eq!(report.to_string(), "Lost revenue: 3712500$");
}

#[test]
fn test_date_without_commits() {
    let (temp_dir, _repo) = archive_fixture(12);
    let archive = GitArchive::open(temp_dir.path()).unwrap();

    let date = parse_target_date("02/06/21").unwrap();
    let result = LossPipeline::new(&archive, &archive, EconomicModel::default()).run(date);
    assert!(matches!(result, Err(AppError::NoDataForDate { date: d }) if d == date));
}

#[test]
fn test_unknown_branch_is_archive_unavailable() {
    let (temp_dir, _repo) = archive_fixture(1);
    let archive = GitArchive::open(temp_dir.path()).unwrap();

    let result = LossPipeline::new(&archive, &archive, EconomicModel::default())
        .with_branch("gh-pages")
        .run(june_first());
    let err = result.unwrap_err();
    assert!(matches!(err, AppError::ArchiveUnavailable(_)));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_malformed_snapshot_aborts_run() {
    let (temp_dir, repo) = archive_fixture(12);
    let bad = commit_snapshot(&repo, "<html>rate limited</html>", at(2021, 6, 1, 23) + 1800);
    let archive = GitArchive::open(temp_dir.path()).unwrap();

    let err = LossPipeline::new(&archive, &archive, EconomicModel::default())
        .run(june_first())
        .unwrap_err();
    match &err {
        AppError::MalformedSnapshot { commit, .. } => assert_eq!(commit.as_str(), bad.to_string()),
        other => panic!("expected MalformedSnapshot, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn test_estimate_for_date_clones_and_retains_snapshots() {
    let (source_dir, _repo) = archive_fixture(6);
    let work_dir = TempDir::new().unwrap();

    let config = EstimatorConfig {
        archive_url: source_dir.path().to_string_lossy().into_owned(),
        cache_dir: work_dir.path().join("cache"),
        retain_extracted: true,
        ..EstimatorConfig::default()
    };

    let report = estimate_for_date(&config, june_first(), false).unwrap();
    assert_eq!(report.breakdown.broken_hours, 6);
    assert!(config.cache_dir.join(".git").is_dir());

    let retained = fs::read_dir(config.extract_dir().unwrap()).unwrap().count();
    assert_eq!(retained, 24);

    // A second run reuses the clone, a reinit run rebuilds it
    let again = estimate_for_date(&config, june_first(), false).unwrap();
    assert_eq!(again, report);
    let fresh = estimate_for_date(&config, june_first(), true).unwrap();
    assert_eq!(fresh, report);
}

#[test]
fn test_estimate_for_date_unreachable_archive() {
    let work_dir = TempDir::new().unwrap();
    let config = EstimatorConfig {
        archive_url: work_dir.path().join("missing").to_string_lossy().into_owned(),
        cache_dir: work_dir.path().join("cache"),
        ..EstimatorConfig::default()
    };

    let result = estimate_for_date(&config, june_first(), false);
    assert!(matches!(result, Err(AppError::ArchiveUnavailable(_))));
}

#[test]
fn test_estimate_for_date_rejects_invalid_economics() {
    let work_dir = TempDir::new().unwrap();
    let mut config = EstimatorConfig {
        cache_dir: work_dir.path().join("cache"),
        ..EstimatorConfig::default()
    };
    config.economics.ice_cream_share = f64::NAN;

    let result = estimate_for_date(&config, june_first(), false);
    assert!(matches!(result, Err(AppError::Config(_))));
    // Validation happens before any clone is attempted
    assert!(!config.cache_dir.exists());
}
