use anyhow::bail;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The date of a transaction.
///
/// Records written by the registration form carry a full RFC 3339 timestamp such as
/// `2023-01-05T13:20:00.000Z`. Hand-written or imported payloads often carry only `2023-01-05`,
/// which is ordered as midnight UTC. The original text is kept so that a record serializes back to
/// exactly what was stored.
///
/// Equality and ordering compare the timestamp only.
///
/// A timestamp with an offset is an instant and is shown on the calendar day it falls on in the
/// viewer's time zone. A value without an offset (`2023-01-05` or `2023-01-05T08:30:00`) is a
/// wall-clock value and is always shown on its own day.
#[derive(Debug, Clone)]
pub struct TransactionDate {
    timestamp: DateTime<Utc>,
    calendar_date: Option<NaiveDate>,
    raw: String,
}

impl TransactionDate {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            calendar_date: None,
            raw: timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The calendar day this date is shown on for a viewer in `tz`.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.calendar_date
            .unwrap_or_else(|| self.timestamp.with_timezone(tz).date_naive())
    }

    /// The calendar day this date is shown on in the local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.date_in(&Local)
    }
}

impl FromStr for TransactionDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (timestamp, calendar_date) = if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            (dt.with_timezone(&Utc), None)
        } else if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            (ndt.and_utc(), Some(ndt.date()))
        } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            match date.and_hms_opt(0, 0, 0) {
                Some(ndt) => (ndt.and_utc(), Some(date)),
                None => bail!("Invalid date '{s}'"),
            }
        } else {
            bail!("Invalid date '{s}', expected an ISO-8601 date or timestamp")
        };
        Ok(Self {
            timestamp,
            calendar_date,
            raw: s.to_string(),
        })
    }
}

impl Display for TransactionDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for TransactionDate {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
    }
}

impl Eq for TransactionDate {}

impl PartialOrd for TransactionDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TransactionDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

impl From<DateTime<Utc>> for TransactionDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self::new(value)
    }
}

impl Serialize for TransactionDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for TransactionDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TransactionDate::from_str(&s).map_err(serde::de::Error::custom)
    }
}
