//! Period-over-period activity report.
//!
//! A report compares the counts of new users, posts and interactions in a
//! date range against the same range shifted back in time, then renders a
//! short narrative from whether each metric grew.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::growth::Comparison;
use crate::store::{self, Collection, DocumentStore, Query, StoreError};

/// Length of the rolling monthly report, in days before today.
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Monthly => "monthly",
            ReportType::Quarterly => "quarterly",
            ReportType::Yearly => "yearly",
            ReportType::Custom => "custom",
        }
    }

    /// Word used for the period in the narrative ("this month").
    pub fn period_noun(&self) -> &'static str {
        match self {
            ReportType::Monthly => "month",
            ReportType::Quarterly => "quarter",
            ReportType::Yearly => "year",
            ReportType::Custom => "period",
        }
    }

    /// How far back the comparison period lies.
    pub fn lookback(&self) -> Months {
        match self {
            ReportType::Monthly | ReportType::Custom => Months::new(1),
            ReportType::Quarterly => Months::new(3),
            ReportType::Yearly => Months::new(12),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(ReportType::Monthly),
            "quarterly" => Ok(ReportType::Quarterly),
            "yearly" => Ok(ReportType::Yearly),
            "custom" => Ok(ReportType::Custom),
            other => Err(format!("Unknown report type '{other}'")),
        }
    }
}

/// Inclusive range of calendar days, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

fn months_back(date: NaiveDate, months: Months) -> NaiveDate {
    date.checked_sub_months(months).unwrap_or(NaiveDate::MIN)
}

fn first_of(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, String> {
        if from > to {
            return Err(format!("Start date {from} is after end date {to}"));
        }
        Ok(Self { from, to })
    }

    /// Range covered by a report of `kind` generated on `today`.
    ///
    /// `custom` must be supplied for [`ReportType::Custom`] and is ignored
    /// otherwise.
    pub fn for_report(
        kind: ReportType,
        today: NaiveDate,
        custom: Option<DateRange>,
    ) -> Result<Self, String> {
        match kind {
            ReportType::Monthly => Self::new(today - Duration::days(MONTHLY_WINDOW_DAYS), today),
            ReportType::Quarterly => {
                let start = first_of(today.year(), today.month0() / 3 * 3 + 1);
                let end = start
                    .checked_add_months(Months::new(3))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                Self::new(start, end)
            }
            ReportType::Yearly => {
                let end = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(NaiveDate::MAX);
                Self::new(first_of(today.year(), 1), end)
            }
            ReportType::Custom => {
                custom.ok_or_else(|| "A custom report needs a start and end date".to_string())
            }
        }
    }

    /// The comparison period for a report of `kind`.
    pub fn previous(&self, kind: ReportType) -> Self {
        let back = kind.lookback();
        Self {
            from: months_back(self.from, back),
            to: months_back(self.to, back),
        }
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.from.and_time(NaiveTime::MIN).and_utc()
    }

    /// Last instant of the final day.
    pub fn end_utc(&self) -> DateTime<Utc> {
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        self.to.and_time(end_of_day).and_utc()
    }

    pub fn query(&self) -> Query {
        Query::new().created_between(self.start_utc(), self.end_utc())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.from.format("%d/%m/%Y"),
            self.to.format("%d/%m/%Y")
        )
    }
}

/// Documents created inside one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub users: u64,
    pub posts: u64,
    pub likes: u64,
    pub comments: u64,
}

impl PeriodTotals {
    pub fn interactions(&self) -> u64 {
        self.likes + self.comments
    }

    /// Interactions per post as a percentage; 0 without posts.
    pub fn interaction_rate(&self) -> f64 {
        if self.posts == 0 {
            return 0.0;
        }
        self.interactions() as f64 / self.posts as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportStats {
    pub new_users: Comparison,
    pub new_posts: Comparison,
    pub interactions: Comparison,
    pub interaction_rate: Comparison,
}

impl ReportStats {
    pub fn compile(current: &PeriodTotals, previous: &PeriodTotals) -> Self {
        Self {
            new_users: Comparison::from_counts(current.users, previous.users),
            new_posts: Comparison::from_counts(current.posts, previous.posts),
            interactions: Comparison::from_counts(current.interactions(), previous.interactions()),
            interaction_rate: Comparison::new(current.interaction_rate(), previous.interaction_rate()),
        }
    }

    /// Users and interactions both grew.
    pub fn is_growing(&self) -> bool {
        self.new_users.improved() && self.interactions.improved()
    }
}

pub async fn period_totals(store: &dyn DocumentStore, range: &DateRange) -> Result<PeriodTotals, StoreError> {
    let query = range.query();
    let (users, posts, likes, comments) = tokio::try_join!(
        store::count(store, Collection::Users, &query),
        store::count(store, Collection::Posts, &query),
        store::count(store, Collection::Likes, &query),
        store::count(store, Collection::Comments, &query),
    )?;
    Ok(PeriodTotals {
        users,
        posts,
        likes,
        comments,
    })
}

/// A compiled report ready to be rendered.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub kind: ReportType,
    pub range: DateRange,
    pub previous_range: DateRange,
    pub stats: ReportStats,
    pub generated_at: DateTime<Utc>,
}

pub async fn build_report(
    store: &dyn DocumentStore,
    kind: ReportType,
    range: DateRange,
) -> Result<Report, StoreError> {
    let previous_range = range.previous(kind);
    let (current, previous) = tokio::try_join!(
        period_totals(store, &range),
        period_totals(store, &previous_range),
    )?;
    log::debug!("Report {kind} {range}: current {current:?}, previous {previous:?}");
    Ok(Report {
        kind,
        range,
        previous_range,
        stats: ReportStats::compile(&current, &previous),
        generated_at: Utc::now(),
    })
}

/// One pair of bars in the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub x: u32,
    pub current: u64,
    pub previous: u64,
    pub current_height: u32,
    pub previous_height: u32,
    /// Top edge of each bar inside the chart area.
    pub current_y: u32,
    pub previous_y: u32,
}

pub const CHART_HEIGHT: u32 = 200;
const CHART_GROUP_WIDTH: u32 = 160;
const CHART_MARGIN: u32 = 40;

fn bar_height(value: u64, max: u64) -> u32 {
    if max == 0 {
        return 0;
    }
    (value as f64 / max as f64 * CHART_HEIGHT as f64).round() as u32
}

impl Report {
    /// Document number, `DDMMYYYY/BC-CX` from the generation date.
    pub fn number(&self) -> String {
        format!("{}/BC-CX", self.generated_at.format("%d%m%Y"))
    }

    pub fn filename(&self) -> String {
        format!(
            "report-{}-{}.html",
            self.kind,
            self.generated_at.format("%Y-%m-%d")
        )
    }

    pub fn period_text(&self) -> String {
        match self.kind {
            ReportType::Monthly => format!("Last 30 days ({})", self.range),
            ReportType::Quarterly => format!(
                "Q{} {} ({})",
                self.range.from.month0() / 3 + 1,
                self.range.from.year(),
                self.range
            ),
            ReportType::Yearly => format!("Year {} ({})", self.range.from.year(), self.range),
            ReportType::Custom => self.range.to_string(),
        }
    }

    /// Bars for new users, new posts and interactions, scaled to the tallest.
    pub fn chart_bars(&self) -> Vec<ChartBar> {
        let s = &self.stats;
        let values = [
            ("New users", s.new_users),
            ("New posts", s.new_posts),
            ("Interactions", s.interactions),
        ];
        let max = values
            .iter()
            .map(|(_, c)| c.current.max(c.previous) as u64)
            .max()
            .unwrap_or(0);
        values
            .iter()
            .enumerate()
            .map(|(i, (label, c))| {
                let current_height = bar_height(c.current as u64, max);
                let previous_height = bar_height(c.previous as u64, max);
                ChartBar {
                    label: *label,
                    x: CHART_MARGIN + i as u32 * CHART_GROUP_WIDTH,
                    current: c.current as u64,
                    previous: c.previous as u64,
                    current_height,
                    previous_height,
                    current_y: CHART_HEIGHT - current_height,
                    previous_y: CHART_HEIGHT - previous_height,
                }
            })
            .collect()
    }

    pub fn analysis(&self) -> Vec<String> {
        let s = &self.stats;
        let noun = self.kind.period_noun();
        let users = if s.new_users.improved() {
            "showing healthy growth in attracting new members."
        } else {
            "suggesting a new strategy is needed to attract members."
        };
        let posts = if s.new_posts.improved() {
            "users are increasingly active in sharing content."
        } else {
            "more incentives are needed to encourage posting."
        };
        let interactions = if s.interactions.improved() {
            "the community is becoming more lively and engaged."
        } else {
            "interaction features need improving to draw users in."
        };
        vec![
            format!(
                "This {noun} the platform registered {} new users, {users}",
                s.new_users.current
            ),
            format!("With {} new posts published, {posts}", s.new_posts.current),
            format!("A total of {} interactions shows {interactions}", s.interactions.current),
        ]
    }

    pub fn assessment(&self) -> &'static str {
        if self.stats.is_growing() {
            "The platform is developing well with steadily rising users and interactions."
        } else {
            "The platform needs adjustments to raise interaction and attract users."
        }
    }

    pub fn conclusion(&self) -> &'static str {
        if self.stats.is_growing() {
            "The figures show positive development. Current activities should be maintained and expanded."
        } else {
            "Timely adjustments are needed to improve the platform's performance."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interaction_rate_without_posts_is_zero() {
        let totals = PeriodTotals {
            users: 1,
            posts: 0,
            likes: 4,
            comments: 2,
        };
        assert_eq!(totals.interaction_rate(), 0.0);
    }

    #[test]
    fn end_covers_whole_last_day() {
        let range = DateRange::new(day(2024, 3, 1), day(2024, 3, 1)).unwrap();
        assert!(range.end_utc() > range.start_utc());
        assert_eq!(range.end_utc().date_naive(), day(2024, 3, 1));
    }

    #[test]
    fn bar_heights_scale_to_tallest() {
        assert_eq!(bar_height(50, 100), CHART_HEIGHT / 2);
        assert_eq!(bar_height(0, 0), 0);
    }
}
