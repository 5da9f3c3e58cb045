//! 时间工具函数: 业务时区日期
//!
//! 业务日期一律按 UTC+5:30 计算，存储层使用 `YYYY-MM-DD` 文本。

use chrono::{Datelike, NaiveDate};

/// 存储层日期文本 (YYYY-MM-DD)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 当年 12 月 31 日
pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// [start, end] 内的每一天，end < start 时为空
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_end_of_year() {
        assert_eq!(end_of_year(d(2026, 3, 2)), d(2026, 12, 31));
        assert_eq!(end_of_year(d(2026, 12, 31)), d(2026, 12, 31));
    }

    #[test]
    fn test_days_inclusive() {
        let days: Vec<_> = days_inclusive(d(2026, 12, 30), d(2027, 1, 1)).collect();
        assert_eq!(days, vec![d(2026, 12, 30), d(2026, 12, 31), d(2027, 1, 1)]);
        assert_eq!(days_inclusive(d(2026, 3, 2), d(2026, 3, 1)).count(), 0);
        assert_eq!(days_inclusive(d(2026, 3, 2), d(2026, 3, 2)).count(), 1);
    }
}
