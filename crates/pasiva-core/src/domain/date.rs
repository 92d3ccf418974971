use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime};

use crate::ValidationError;

/// Calendar date of a market observation, `YYYY-MM-DD` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketDate(Date);

impl MarketDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let format = format_description!("[year]-[month]-[day]");
        Date::parse(input.trim(), &format)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    /// Date of a Unix timestamp, interpreted in UTC.
    pub fn from_unix_timestamp(seconds: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(seconds)
            .map(|dt| Self(dt.date()))
            .map_err(|_| ValidationError::InvalidDate {
                value: seconds.to_string(),
            })
    }

    /// Unix timestamp of this date's midnight, UTC.
    pub fn unix_timestamp(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    pub fn month(self) -> Month {
        self.0.month()
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        let format = format_description!("[year]-[month]-[day]");
        self.0
            .format(&format)
            .expect("calendar dates are always formattable")
    }

    /// `YYYYMMDD` form used in composition file names.
    pub fn compact(self) -> String {
        let format = format_description!("[year][month][day]");
        self.0
            .format(&format)
            .expect("calendar dates are always formattable")
    }
}

impl Display for MarketDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for MarketDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for MarketDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
