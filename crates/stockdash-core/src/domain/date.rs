use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

/// Calendar trading day, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parse `YYYY-MM-DD`. Anything after the first ten characters (a time
    /// component such as ` 00:00:00-05:00`) is ignored.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let head = trimmed.get(..10).unwrap_or(trimmed);
        Date::parse(head, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    /// Local calendar day of a unix timestamp for an exchange whose UTC
    /// offset is `gmt_offset_secs`.
    pub fn from_unix_timestamp(
        timestamp: i64,
        gmt_offset_secs: i64,
    ) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(timestamp.saturating_add(gmt_offset_secs))
            .map(|value| Self(value.date()))
            .map_err(|_| ValidationError::InvalidDate {
                value: timestamp.to_string(),
            })
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
