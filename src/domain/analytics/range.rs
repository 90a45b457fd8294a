//! Reporting windows ("last 7 days", "last 30 days", "last year").

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ResponseRecord;

/// A trailing window of whole UTC days ending today, or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl DateRange {
    /// Window length in days, `None` for [`DateRange::All`].
    pub fn days(self) -> Option<i64> {
        match self {
            DateRange::Week => Some(7),
            DateRange::Month => Some(30),
            DateRange::Year => Some(365),
            DateRange::All => None,
        }
    }

    /// First day inside the window ending on `today`.
    pub fn first_day(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days()
            .and_then(|days| today.checked_sub_signed(Duration::days(days - 1)))
    }

    /// Whether `record` falls inside the window.
    ///
    /// Records with unparseable timestamps only belong to [`DateRange::All`].
    pub fn includes(self, record: &ResponseRecord, today: NaiveDate) -> bool {
        let Some(first) = self.first_day(today) else {
            return true;
        };
        record
            .submitted_at
            .utc_day()
            .is_some_and(|day| day >= first && day <= today)
    }

    /// Records inside the window, in input order.
    pub fn filter<'r>(
        self,
        records: &'r [ResponseRecord],
        today: NaiveDate,
    ) -> impl Iterator<Item = &'r ResponseRecord> + 'r {
        records
            .iter()
            .filter(move |record| self.includes(record, today))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::Year => "year",
            DateRange::All => "all",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "7d" => Ok(DateRange::Week),
            "month" | "30d" => Ok(DateRange::Month),
            "year" | "365d" => Ok(DateRange::Year),
            "all" => Ok(DateRange::All),
            other => Err(format!(
                "unknown range '{other}', expected week, month, year or all"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SubmittedAt;
    use chrono::{TimeZone, Utc};

    fn record_on(id: i64, submitted_at: SubmittedAt) -> ResponseRecord {
        ResponseRecord {
            id,
            form_id: 1,
            submitted_at,
            submitted_by: None,
            responses: Default::default(),
        }
    }

    fn on(y: i32, m: u32, d: u32) -> SubmittedAt {
        SubmittedAt::At(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_first_day_of_windows() {
        assert_eq!(
            DateRange::Week.first_day(today()),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        assert_eq!(
            DateRange::Month.first_day(today()),
            NaiveDate::from_ymd_opt(2024, 2, 10)
        );
        assert_eq!(DateRange::All.first_day(today()), None);
    }

    #[test]
    fn test_week_window_bounds() {
        let records = vec![
            record_on(1, on(2024, 3, 3)),
            record_on(2, on(2024, 3, 4)),
            record_on(3, on(2024, 3, 10)),
            record_on(4, on(2024, 3, 11)),
            record_on(5, SubmittedAt::Raw("garbage".into())),
        ];

        let ids: Vec<i64> = DateRange::Week
            .filter(&records, today())
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);

        let all: Vec<i64> = DateRange::All
            .filter(&records, today())
            .map(|r| r.id)
            .collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("week".parse::<DateRange>(), Ok(DateRange::Week));
        assert_eq!("Month".parse::<DateRange>(), Ok(DateRange::Month));
        assert_eq!("365d".parse::<DateRange>(), Ok(DateRange::Year));
        assert!("fortnight".parse::<DateRange>().is_err());
        assert_eq!(DateRange::default().to_string(), "all");
    }

    #[test]
    fn test_deserialize_from_query_value() {
        let range: DateRange = serde_json::from_str("\"year\"").unwrap();
        assert_eq!(range, DateRange::Year);
    }
}
