use chrono::NaiveDate;
use diesel::{
    sql_types::{BigInt, Date, Text},
    QueryableByName,
};
use serde::Serialize;

use crate::utils::DATE_FMT;

#[derive(QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    #[diesel(sql_type = Date)]
    pub date: NaiveDate,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

#[derive(QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct IssueCount {
    #[diesel(sql_type = Text)]
    pub intent: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// Everything the analytics views and exports show, fetched on one connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analytics {
    pub total_count: i64,
    pub daily: Vec<DailyCount>,
    pub issues: Vec<IssueCount>,
}

/// Column-oriented form of [`Analytics`], the shape chart clients consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsSeries {
    pub total_count: i64,
    pub dates: Vec<String>,
    pub daily_counts: Vec<i64>,
    pub issues: Vec<String>,
    pub issue_counts: Vec<i64>,
}

impl From<&Analytics> for AnalyticsSeries {
    fn from(analytics: &Analytics) -> Self {
        let (dates, daily_counts) = analytics
            .daily
            .iter()
            .map(|row| (row.date.format(DATE_FMT).to_string(), row.count))
            .unzip();
        let (issues, issue_counts) = analytics
            .issues
            .iter()
            .map(|row| (row.intent.clone(), row.count))
            .unzip();
        Self {
            total_count: analytics.total_count,
            dates,
            daily_counts,
            issues,
            issue_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    #[rstest]
    fn series_keeps_order_and_pairs_columns() {
        let analytics = Analytics {
            total_count: 6,
            daily: vec![
                DailyCount { date: day(8), count: 1 },
                DailyCount { date: day(10), count: 3 },
            ],
            issues: vec![
                IssueCount { intent: "AC Repair".to_string(), count: 4 },
                IssueCount { intent: "HVAC".to_string(), count: 2 },
            ],
        };

        let series = AnalyticsSeries::from(&analytics);

        assert_eq!(series.total_count, 6);
        assert_eq!(series.dates, vec!["2024-03-08", "2024-03-10"]);
        assert_eq!(series.daily_counts, vec![1, 3]);
        assert_eq!(series.issues, vec!["AC Repair", "HVAC"]);
        assert_eq!(series.issue_counts, vec![4, 2]);
    }

    #[rstest]
    fn empty_analytics_serialize_to_empty_columns() {
        let series = AnalyticsSeries::from(&Analytics::default());
        let json = serde_json::to_value(&series).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "total_count": 0,
                "dates": [],
                "daily_counts": [],
                "issues": [],
                "issue_counts": [],
            })
        );
    }
}
