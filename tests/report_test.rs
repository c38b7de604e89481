//! Growth comparator, report periods and compiled report statistics.

mod common;

use chrono::NaiveDate;
use regex::Regex;

use chronox_admin::stats::growth::{Comparison, growth};
use chronox_admin::stats::report::{self, CHART_HEIGHT, DateRange, PeriodTotals, ReportStats, ReportType};
use chronox_admin::store::Collection;
use common::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// GROWTH
// ============================================================================

#[test]
fn test_growth_percentages() {
    assert_eq!(growth(120.0, 100.0), 20.0);
    assert_eq!(growth(50.0, 100.0), -50.0);
    assert_eq!(growth(0.0, 0.0), 0.0);
    assert_eq!(growth(50.0, 0.0), 0.0);
}

#[test]
fn test_growth_text_has_sign_and_one_decimal() {
    assert_eq!(Comparison::from_counts(120, 100).growth_text(), "+20.0%");
    assert_eq!(Comparison::from_counts(2, 3).growth_text(), "-33.3%");
}

// ============================================================================
// PERIODS
// ============================================================================

#[test]
fn test_monthly_range_is_last_thirty_days() {
    let range = DateRange::for_report(ReportType::Monthly, day(2024, 3, 15), None).unwrap();
    assert_eq!(range, DateRange { from: day(2024, 2, 14), to: day(2024, 3, 15) });

    let previous = range.previous(ReportType::Monthly);
    assert_eq!(previous, DateRange { from: day(2024, 1, 14), to: day(2024, 2, 15) });
}

#[test]
fn test_quarterly_range_is_calendar_quarter() {
    let range = DateRange::for_report(ReportType::Quarterly, day(2024, 5, 10), None).unwrap();
    assert_eq!(range, DateRange { from: day(2024, 4, 1), to: day(2024, 6, 30) });
    assert_eq!(range.previous(ReportType::Quarterly).from, day(2024, 1, 1));
}

#[test]
fn test_yearly_range_and_previous_year() {
    let range = DateRange::for_report(ReportType::Yearly, day(2024, 7, 4), None).unwrap();
    assert_eq!(range, DateRange { from: day(2024, 1, 1), to: day(2024, 12, 31) });
    assert_eq!(
        range.previous(ReportType::Yearly),
        DateRange { from: day(2023, 1, 1), to: day(2023, 12, 31) }
    );
}

#[test]
fn test_custom_range_is_validated() {
    assert!(DateRange::for_report(ReportType::Custom, day(2024, 3, 1), None).is_err());
    assert!(DateRange::new(day(2024, 3, 2), day(2024, 3, 1)).is_err());

    let custom = DateRange::new(day(2024, 3, 1), day(2024, 3, 31)).unwrap();
    let range = DateRange::for_report(ReportType::Custom, day(2024, 6, 1), Some(custom)).unwrap();
    assert_eq!(range, custom);
    assert_eq!(range.previous(ReportType::Custom).from, day(2024, 2, 1));
}

#[test]
fn test_report_type_parses() {
    assert_eq!("Yearly".parse::<ReportType>().unwrap(), ReportType::Yearly);
    assert!("weekly".parse::<ReportType>().is_err());
}

// ============================================================================
// STATISTICS
// ============================================================================

#[test]
fn test_stats_compile_interactions_and_rate() {
    let current = PeriodTotals { users: 10, posts: 4, likes: 6, comments: 2 };
    let previous = PeriodTotals { users: 5, posts: 0, likes: 1, comments: 1 };
    let stats = ReportStats::compile(&current, &previous);

    assert_eq!(stats.new_users.growth, 100.0);
    assert_eq!(stats.interactions.current, 8.0);
    assert_eq!(stats.interactions.growth, 300.0);
    assert_eq!(stats.interaction_rate.current, 200.0);
    assert_eq!(stats.interaction_rate.previous, 0.0);
    assert_eq!(stats.interaction_rate.growth, 0.0);
    assert!(stats.is_growing());
}

#[tokio::test]
async fn test_build_report_counts_both_periods() {
    let store = seeded_store();
    store.insert(Collection::Users, user_doc("u0", "early", "2024-02-10"));
    store.insert(Collection::Posts, post_doc("p0", "old", Some("u0"), "2024-02-11"));

    let range = DateRange::new(day(2024, 3, 1), day(2024, 3, 31)).unwrap();
    let report = report::build_report(&store, ReportType::Custom, range).await.unwrap();

    assert_eq!(report.stats.new_users.current, 3.0);
    assert_eq!(report.stats.new_users.previous, 1.0);
    assert_eq!(report.stats.new_users.growth, 200.0);
    assert_eq!(report.stats.new_posts.current, 3.0);
    assert_eq!(report.stats.interactions.current, 9.0);
    assert_eq!(report.stats.interactions.previous, 0.0);
    assert_eq!(report.stats.interaction_rate.current, 300.0);
    assert!(report.stats.is_growing());
}

#[tokio::test]
async fn test_report_document_fields() {
    let store = seeded_store();
    let range = DateRange::new(day(2024, 3, 1), day(2024, 3, 31)).unwrap();
    let report = report::build_report(&store, ReportType::Custom, range).await.unwrap();

    assert!(Regex::new(r"^\d{8}/BC-CX$").unwrap().is_match(&report.number()));
    assert!(Regex::new(r"^report-custom-\d{4}-\d{2}-\d{2}\.html$").unwrap().is_match(&report.filename()));
    assert_eq!(report.period_text(), "01/03/2024 - 31/03/2024");

    let analysis = report.analysis();
    assert_eq!(analysis.len(), 3);
    assert!(analysis[0].contains("3 new users"));

    let bars = report.chart_bars();
    assert_eq!(bars.len(), 3);
    // Interactions (9) are the tallest bar
    assert_eq!(bars[2].current_height, CHART_HEIGHT);
    assert_eq!(bars[2].current_y, 0);
    assert_eq!(bars[0].previous_height, 0);
}
