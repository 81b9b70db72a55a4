//! End-to-end pipeline tests
//!
//! Exercise the full daily run over mock provider/publisher and a
//! temp-dir ledger: the happy path, the backfill-then-run scenario, the
//! scrape-failure policy, and the non-fatal publish failure.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use stats_tracker::backfill::BackfillInput;
use stats_tracker::config::Settings;
use stats_tracker::ledger::{LedgerStore, Source};
use stats_tracker::pipeline::{run_daily, PipelineError};
use stats_tracker::provider::MockProvider;
use stats_tracker::publisher::MemoryPublisher;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn settings_in(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.ledger.path = dir
        .path()
        .join("stats.csv")
        .to_string_lossy()
        .into_owned();
    settings
}

fn backfill(d: NaiveDate, members: &str, price: &str, stock: &str) -> BackfillInput {
    BackfillInput {
        target_date: Some(d),
        members: Some(members.to_string()),
        price: Some(price.to_string()),
        stock: Some(stock.to_string()),
    }
}

#[tokio::test]
async fn first_run_reports_unavailable_deltas() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let provider = MockProvider::with_readings(22300, dec!(11.5000), 50500);
    let publisher = MemoryPublisher::new();

    let outcome = run_daily(
        &settings,
        &provider,
        &publisher,
        &BackfillInput::default(),
        date(2025, 11, 19),
        false,
    )
    .await
    .unwrap();

    assert!(outcome.published);
    assert!(outcome.message.contains("n/a"));
    assert!(!outcome.snapshot.deltas.is_available());

    // Today's row was persisted even without a baseline.
    let store = LedgerStore::load(&settings.ledger.path).unwrap();
    let row = store.find(date(2025, 11, 19)).unwrap();
    assert_eq!(row.members, 22300);
    assert_eq!(row.stock, 50500);
}

#[tokio::test]
async fn backfilled_yesterday_serves_as_baseline() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let provider = MockProvider::with_readings(22300, dec!(11.5000), 50500);
    let publisher = MemoryPublisher::new();

    // Manual backfill for 2025-11-18 supplied with the 2025-11-19 run.
    let outcome = run_daily(
        &settings,
        &provider,
        &publisher,
        &backfill(date(2025, 11, 18), "22000", "11.0000", "50000"),
        date(2025, 11, 19),
        false,
    )
    .await
    .unwrap();

    assert_eq!(outcome.snapshot.baseline_date, Some(date(2025, 11, 18)));
    assert_eq!(outcome.snapshot.deltas.members, Some(300));
    assert_eq!(outcome.snapshot.deltas.price, Some(dec!(0.5000)));
    assert_eq!(outcome.snapshot.deltas.stock, Some(500));

    let messages = publisher.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("+300"));
    assert!(messages[0].contains("+0.5000"));
    assert!(messages[0].contains("+500"));

    // Both rows persisted, dates ascending.
    let store = LedgerStore::load(&settings.ledger.path).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.find(date(2025, 11, 18)).unwrap().members, 22000);
    assert_eq!(store.find(date(2025, 11, 19)).unwrap().members, 22300);
}

#[tokio::test]
async fn invalid_backfill_input_aborts_and_leaves_ledger_untouched() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let provider = MockProvider::with_readings(22300, dec!(11.5000), 50500);
    let publisher = MemoryPublisher::new();

    let err = run_daily(
        &settings,
        &provider,
        &publisher,
        &backfill(date(2025, 11, 18), "22000", "abc", "50000"),
        date(2025, 11, 19),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::Backfill(_)));
    assert!(err.to_string().contains("price"));
    // No write of any kind happened.
    assert!(!std::path::Path::new(&settings.ledger.path).exists());
    assert!(publisher.messages().is_empty());
}

#[tokio::test]
async fn scrape_failure_keeps_saved_backfill_work() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let provider = MockProvider::failing();
    let publisher = MemoryPublisher::new();

    let err = run_daily(
        &settings,
        &provider,
        &publisher,
        &backfill(date(2025, 11, 18), "22000", "11.0000", "50000"),
        date(2025, 11, 19),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::Scrape(_)));
    // The backfill row was already saved; no row exists for today.
    let store = LedgerStore::load(&settings.ledger.path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.find(date(2025, 11, 18)).unwrap().members, 22000);
    assert!(store.find(date(2025, 11, 19)).is_none());
    assert!(publisher.messages().is_empty());
}

#[tokio::test]
async fn publish_failure_is_non_fatal_and_ledger_is_kept() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let provider = MockProvider::with_readings(22300, dec!(11.5000), 50500);
    let publisher = MemoryPublisher {
        fail: true,
        ..Default::default()
    };

    let outcome = run_daily(
        &settings,
        &provider,
        &publisher,
        &BackfillInput::default(),
        date(2025, 11, 19),
        false,
    )
    .await
    .unwrap();

    assert!(!outcome.published);
    let store = LedgerStore::load(&settings.ledger.path).unwrap();
    assert!(store.find(date(2025, 11, 19)).is_some());
}

#[tokio::test]
async fn dry_run_persists_but_does_not_publish() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let provider = MockProvider::with_readings(22300, dec!(11.5000), 50500);
    let publisher = MemoryPublisher::new();

    let outcome = run_daily(
        &settings,
        &provider,
        &publisher,
        &BackfillInput::default(),
        date(2025, 11, 19),
        true,
    )
    .await
    .unwrap();

    assert!(!outcome.published);
    assert!(publisher.messages().is_empty());
    assert!(std::path::Path::new(&settings.ledger.path).exists());
}

#[tokio::test]
async fn rerun_same_day_overwrites_today_row() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let publisher = MemoryPublisher::new();
    let today = date(2025, 11, 19);

    let first = MockProvider::with_readings(22300, dec!(11.5000), 50500);
    run_daily(&settings, &first, &publisher, &BackfillInput::default(), today, true)
        .await
        .unwrap();

    let second = MockProvider::with_readings(22310, dec!(11.6000), 50400);
    run_daily(&settings, &second, &publisher, &BackfillInput::default(), today, true)
        .await
        .unwrap();

    let store = LedgerStore::load(&settings.ledger.path).unwrap();
    assert_eq!(store.len(), 1);
    let row = store.find(today).unwrap();
    assert_eq!(row.members, 22310);
    assert_eq!(row.price, dec!(11.6000));
    assert_eq!(row.source, Source::Automated);
}

#[tokio::test]
async fn corrupt_ledger_aborts_before_any_write() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    std::fs::write(
        &settings.ledger.path,
        "date,members,price,stock\n2025-11-18,not-a-number,11.0,50\n",
    )
    .unwrap();
    let before = std::fs::read_to_string(&settings.ledger.path).unwrap();

    let provider = MockProvider::with_readings(22300, dec!(11.5000), 50500);
    let publisher = MemoryPublisher::new();
    let err = run_daily(
        &settings,
        &provider,
        &publisher,
        &BackfillInput::default(),
        date(2025, 11, 19),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::Store(_)));
    // The corrupt file is left exactly as found.
    let after = std::fs::read_to_string(&settings.ledger.path).unwrap();
    assert_eq!(before, after);
    assert!(publisher.messages().is_empty());
}

#[tokio::test]
async fn backfill_targeting_today_is_overwritten_by_the_scrape() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let provider = MockProvider::with_readings(22300, dec!(11.5000), 50500);
    let publisher = MemoryPublisher::new();
    let today = date(2025, 11, 19);

    // Operator error: backfill aimed at the run's own date. The
    // automated write executes later in the pipeline and wins.
    let outcome = run_daily(
        &settings,
        &provider,
        &publisher,
        &backfill(today, "1", "1.0", "1"),
        today,
        true,
    )
    .await
    .unwrap();

    let store = LedgerStore::load(&settings.ledger.path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.find(today).unwrap().members, 22300);
    assert_eq!(outcome.snapshot.observation.members, 22300);
}
