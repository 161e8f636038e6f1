// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Date formats used by the NASA services.
//!
//! Most endpoints exchange calendar dates as `YYYY-MM-DD`. EPIC reports acquisition times as
//! `YYYY-MM-DD HH:MM:SS`, and the image library's EXIF-derived metadata uses colons in the date
//! part with an optional UTC offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, ParseResult, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const EPIC_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const EXIF_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const EXIF_OFFSET_FORMAT: &str = "%Y:%m:%d %H:%M:%S%z";

/// A calendar date formatted as `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(pub NaiveDate);

impl Deref for Date {
    type Target = NaiveDate;

    fn deref(&self) -> &NaiveDate {
        &self.0
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Self(d)
    }
}

impl FromStr for Date {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        NaiveDate::parse_from_str(s, DATE_FORMAT).map(Self)
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// An EPIC acquisition time formatted as `YYYY-MM-DD HH:MM:SS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpicDate(pub NaiveDateTime);

impl Deref for EpicDate {
    type Target = NaiveDateTime;

    fn deref(&self) -> &NaiveDateTime {
        &self.0
    }
}

impl From<NaiveDateTime> for EpicDate {
    fn from(t: NaiveDateTime) -> Self {
        Self(t)
    }
}

impl FromStr for EpicDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        NaiveDateTime::parse_from_str(s, EPIC_DATE_FORMAT).map(Self)
    }
}

impl Display for EpicDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(EPIC_DATE_FORMAT))
    }
}

impl Serialize for EpicDate {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EpicDate {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Parse an EXIF-style timestamp from media metadata.
///
/// Accepts `YYYY:MM:DD HH:MM:SS` (taken as UTC) and `YYYY:MM:DD HH:MM:SS+HHMM`.
pub fn parse_exif_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_str(s, EXIF_OFFSET_FORMAT) {
        return Some(t);
    }
    NaiveDateTime::parse_from_str(s, EXIF_FORMAT)
        .ok()
        .map(|t| Utc.from_utc_datetime(&t).into())
}
