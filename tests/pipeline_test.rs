mod common;

use assert_matches::assert_matches;

use common::{daily_records, export_text, field, scalar, write_utf16_export};
use portfolio_metrics::config::{MetricsConfig, PipelineConfig};
use portfolio_metrics::data_ingestion::ExportReader;
use portfolio_metrics::pipeline::{AccountSource, PipelineError, PortfolioPipeline};

fn keep_going() -> PortfolioPipeline {
    PortfolioPipeline::new(
        PipelineConfig {
            fail_fast: false,
            ..Default::default()
        },
        MetricsConfig::default(),
    )
}

#[test]
fn test_identical_accounts_double_total_return() {
    let balances = [1000.0, 1010.0, 1005.0, 1020.0];
    let outcome = PortfolioPipeline::default()
        .run(vec![
            AccountSource::new("A", daily_records(&balances)),
            AccountSource::new("B", daily_records(&balances)),
        ])
        .unwrap();

    let account = outcome.get("A").unwrap();
    let portfolio = outcome.get("Portfolio").unwrap();

    assert_eq!(account.stats.total_return, 20.0);
    assert_eq!(portfolio.stats.total_return, 40.0);
    assert_eq!(account.stats.win_loss_ratio, portfolio.stats.win_loss_ratio);
    assert_eq!(scalar(&portfolio.report, "Total Return"), "40.00");
    assert_eq!(scalar(&portfolio.report, "Win/Loss Ratio"), "2.00");
}

#[test]
fn test_portfolio_report_dates() {
    let outcome = PortfolioPipeline::default()
        .run(vec![AccountSource::new("A", daily_records(&[100.0, 120.0, 90.0, 95.0, 130.0]))])
        .unwrap();
    let report = &outcome.get("Portfolio").unwrap().report;

    assert_eq!(scalar(report, "Max Balance Reduction"), "30.00");
    assert_eq!(field(report, "Max Balance Reduction Dates", "Start"), "2024-01-02 00:00:00");
    assert_eq!(field(report, "Max Balance Reduction Dates", "End"), "2024-01-03 00:00:00");
    assert_eq!(field(report, "Max Balance Reduction Dates", "Recovery"), "2024-01-05 00:00:00");
    assert_eq!(field(report, "Longest Time Without New High", "Days"), "2");
    assert_eq!(field(report, "Worst Day", "Amount"), "-30.00");
    assert_eq!(field(report, "Worst Day", "Date"), "2024-01-03 00:00:00");
}

#[test]
fn test_run_directory_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_utf16_export(dir.path(), "ACC-2.csv", &export_text(&daily_records(&[500.0, 520.0])));
    write_utf16_export(dir.path(), "ACC-1.csv", &export_text(&daily_records(&[1000.0, 990.0, 1005.0])));

    let outcome = PortfolioPipeline::default()
        .run_directory(&ExportReader::default(), dir.path())
        .unwrap();

    let names: Vec<&str> = outcome.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["ACC-1", "ACC-2", "Portfolio"]);
    assert!(outcome.failures.is_empty());
}

#[test]
fn test_fail_fast_versus_keep_going() {
    let dir = tempfile::tempdir().unwrap();
    write_utf16_export(dir.path(), "GOOD.csv", &export_text(&daily_records(&[100.0, 110.0])));
    write_utf16_export(dir.path(), "BROKEN.csv", "header\nyesterday\t100\t100\t0\n");
    let reader = ExportReader::default();

    let result = PortfolioPipeline::default().run_directory(&reader, dir.path());
    assert_matches!(result, Err(PipelineError::Ingest { account, .. }) if account == "BROKEN");

    let outcome = keep_going().run_directory(&reader, dir.path()).unwrap();
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].account, "BROKEN");

    let names: Vec<&str> = outcome.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["GOOD", "Portfolio"]);
    assert_eq!(outcome.get("Portfolio").unwrap().stats.total_return, 10.0);
}

#[test]
fn test_custom_portfolio_name() {
    let pipeline = PortfolioPipeline::new(
        PipelineConfig {
            portfolio_name: "Combined".to_string(),
            ..Default::default()
        },
        MetricsConfig::default(),
    );
    let outcome = pipeline
        .run(vec![AccountSource::new("A", daily_records(&[1.0, 2.0]))])
        .unwrap();

    assert_eq!(outcome.reports.last().unwrap().name, "Combined");
}
