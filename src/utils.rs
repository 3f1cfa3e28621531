use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";
pub const FILE_STAMP_FMT: &str = "%Y%m%d_%H%M%S";

/// Wall-clock time on the server's local calendar.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format_date(time: Option<&NaiveDateTime>) -> String {
    time.map(|t| t.format(DATE_FMT).to_string())
        .unwrap_or_default()
}

pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FMT).to_string()
}

pub fn attachment_name(prefix: &str, now: &NaiveDateTime, ext: &str) -> String {
    format!("{}_{}.{}", prefix, now.format(FILE_STAMP_FMT), ext)
}

/// Escapes LIKE metacharacters so the text matches literally (backslash is
/// the default escape character in Postgres).
pub fn escape_like<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn get_str_pattern<S: AsRef<str>>(s: S) -> String {
    format!("%{}%", escape_like(s))
}

/// Half-open `[start, end)` range covering one calendar day.
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    (start, start + Duration::days(1))
}

pub fn window_start(now: NaiveDateTime, window_days: u32) -> NaiveDateTime {
    now - Duration::days(i64::from(window_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|day| day.and_hms_opt(h, min, 0))
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("AC", "%AC%")]
    #[case("50%", "%50\\%%")]
    #[case("hot_water", "%hot\\_water%")]
    #[case("a\\b", "%a\\\\b%")]
    fn patterns_match_literally(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(get_str_pattern(input), expected);
    }

    #[rstest]
    fn day_bounds_cover_exactly_one_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).expect("leap day");
        let (start, end) = day_bounds(day);
        assert_eq!(start, at(2024, 2, 29, 0, 0));
        assert_eq!(end, at(2024, 3, 1, 0, 0));
    }

    #[rstest]
    #[case(7, at(2024, 3, 3, 12, 30))]
    #[case(14, at(2024, 2, 25, 12, 30))]
    #[case(0, at(2024, 3, 10, 12, 30))]
    fn window_start_counts_back_whole_days(#[case] days: u32, #[case] expected: NaiveDateTime) {
        assert_eq!(window_start(at(2024, 3, 10, 12, 30), days), expected);
    }

    #[rstest]
    fn dates_and_attachments_are_formatted() {
        let t = at(2024, 3, 10, 9, 5);
        assert_eq!(format_date(Some(&t)), "2024-03-10");
        assert_eq!(format_date(None), "");
        assert_eq!(format_timestamp(&t), "2024-03-10 09:05:00");
        assert_eq!(
            attachment_name("analytics_report", &t, "csv"),
            "analytics_report_20240310_090500.csv"
        );
    }
}
