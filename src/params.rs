// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Typed request parameters and their query-string encodings.
//!
//! Every endpoint on `api.nasa.gov` requires an API key, so the encoders for those endpoints
//! refuse to produce a query without one. Query keys are always emitted in lexicographic order,
//! which keeps encodings stable and easy to compare.

use crate::date::DATE_FORMAT;
use crate::epic::EpicCollection;
use crate::error::{NasaError, NoApiKeySnafu, NoQuerySnafu};
use crate::mars::RoverCamera;
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use snafu::ensure;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use url::form_urlencoded;

/// Parameters which can be rendered into the query part of a request URL.
pub trait ParamEncoder {
    fn encode(&self) -> Result<String, NasaError>;
}

fn encode_pairs(values: &BTreeMap<&str, String>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(values)
        .finish()
}

/// Build a query string from `values` plus the mandatory `api_key`.
pub(crate) fn keyed_query<'a>(
    api_key: &str,
    values: impl IntoIterator<Item = (&'a str, String)>,
) -> Result<String, NasaError> {
    ensure!(!api_key.is_empty(), NoApiKeySnafu);
    let mut values: BTreeMap<&str, String> = values.into_iter().collect();
    values.insert("api_key", api_key.to_string());
    Ok(encode_pairs(&values))
}

/// Parameters for endpoints that only need an API key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiParam {
    pub api_key: String,
}

impl ApiParam {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl ParamEncoder for ApiParam {
    fn encode(&self) -> Result<String, NasaError> {
        keyed_query(&self.api_key, None)
    }
}

/// Astronomy Picture of the Day parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApodParams {
    pub api_key: String,
    /// Day of the picture; today's picture when unset.
    pub date: Option<NaiveDate>,
    /// Ask for the high resolution image URL.
    pub hd: bool,
}

impl ApodParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl ParamEncoder for ApodParams {
    fn encode(&self) -> Result<String, NasaError> {
        let mut values = vec![];
        if let Some(date) = self.date {
            values.push(("date", date.format(DATE_FORMAT).to_string()));
        }
        if self.hd {
            values.push(("hd", "true".to_string()));
        }
        keyed_query(&self.api_key, values)
    }
}

/// EPIC parameters.
///
/// Unlike the other parameter types, the EPIC encoding includes the request path, since the
/// date is addressed as a path segment rather than a query parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpicParams {
    pub api_key: String,
    /// Day of the images; the most recent day when unset.
    pub date: Option<NaiveDate>,
    pub collection: EpicCollection,
}

impl EpicParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl ParamEncoder for EpicParams {
    fn encode(&self) -> Result<String, NasaError> {
        let query = keyed_query(&self.api_key, None)?;
        let mut path = format!("api/{}", self.collection);
        if let Some(date) = self.date {
            path += &format!("/date/{}", date.format(DATE_FORMAT));
        }
        Ok(format!("{}?{}", path, query))
    }
}

/// Mars rover photo query parameters.
///
/// Photos are selected either by Martian sol or by Earth date; the Earth date wins when both
/// are given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarsPhotosParams {
    pub api_key: String,
    pub sol: u32,
    pub earth_date: Option<NaiveDate>,
    pub camera: Option<RoverCamera>,
    /// 1-based result page; the service returns every photo when unset.
    pub page: Option<u32>,
}

impl MarsPhotosParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl ParamEncoder for MarsPhotosParams {
    fn encode(&self) -> Result<String, NasaError> {
        let mut values = vec![];
        match self.earth_date {
            Some(date) => values.push(("earth_date", date.format(DATE_FORMAT).to_string())),
            None => values.push(("sol", self.sol.to_string())),
        }
        if let Some(camera) = self.camera {
            values.push(("camera", camera.slug().to_string()));
        }
        if let Some(page) = self.page.filter(|page| *page > 0) {
            values.push(("page", page.to_string()));
        }
        keyed_query(&self.api_key, values)
    }
}

/// Media kinds served by the image and video library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        };
        write!(f, "{}", name)
    }
}

/// Image and video library search parameters.
///
/// The library does not take an API key, but it does need at least one search term.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaSearchParams {
    /// Free text query.
    pub q: Option<String>,
    pub center: Option<String>,
    pub description: Option<String>,
    pub description_508: Option<String>,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub media_type: Vec<MediaType>,
    pub nasa_id: Option<String>,
    pub page: Option<u32>,
    pub photographer: Option<String>,
    pub secondary_creator: Option<String>,
    pub title: Option<String>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
}

impl MediaSearchParams {
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }
}

impl ParamEncoder for MediaSearchParams {
    fn encode(&self) -> Result<String, NasaError> {
        let mut values = BTreeMap::new();
        let text = [
            ("q", &self.q),
            ("center", &self.center),
            ("description", &self.description),
            ("description_508", &self.description_508),
            ("location", &self.location),
            ("nasa_id", &self.nasa_id),
            ("photographer", &self.photographer),
            ("secondary_creator", &self.secondary_creator),
            ("title", &self.title),
        ];
        for (key, value) in text.iter().copied() {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                values.insert(key, value.to_string());
            }
        }
        if !self.keywords.is_empty() {
            values.insert("keywords", self.keywords.iter().join(","));
        }
        if !self.media_type.is_empty() {
            values.insert("media_type", self.media_type.iter().join(","));
        }
        if let Some(year) = self.year_start {
            values.insert("year_start", year.to_string());
        }
        if let Some(year) = self.year_end {
            values.insert("year_end", year.to_string());
        }
        ensure!(!values.is_empty(), NoQuerySnafu);

        if let Some(page) = self.page.filter(|page| *page > 0) {
            values.insert("page", page.to_string());
        }
        Ok(encode_pairs(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_KEY: &str = "NASA_KEY";

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 4, 24).unwrap()
    }

    #[test]
    fn api_param() {
        assert_eq!(ApiParam::default().encode(), Err(NasaError::NoApiKey));
        assert_eq!(ApiParam::new(API_KEY).encode().unwrap(), "api_key=NASA_KEY");
    }

    #[test]
    fn apod_params() {
        assert_eq!(ApodParams::default().encode(), Err(NasaError::NoApiKey));

        let mut p = ApodParams::new(API_KEY);
        assert_eq!(p.encode().unwrap(), "api_key=NASA_KEY");

        p.date = Some(day());
        assert_eq!(p.encode().unwrap(), "api_key=NASA_KEY&date=2020-04-24");

        p.hd = true;
        assert_eq!(
            p.encode().unwrap(),
            "api_key=NASA_KEY&date=2020-04-24&hd=true"
        );
    }

    #[test]
    fn epic_params() {
        assert_eq!(EpicParams::default().encode(), Err(NasaError::NoApiKey));

        let mut p = EpicParams::new(API_KEY);
        assert_eq!(p.encode().unwrap(), "api/natural?api_key=NASA_KEY");

        p.date = Some(day());
        assert_eq!(
            p.encode().unwrap(),
            "api/natural/date/2020-04-24?api_key=NASA_KEY"
        );

        p.collection = EpicCollection::Enhanced;
        assert_eq!(
            p.encode().unwrap(),
            "api/enhanced/date/2020-04-24?api_key=NASA_KEY"
        );
    }

    #[test]
    fn mars_photos_params() {
        assert_eq!(
            MarsPhotosParams::default().encode(),
            Err(NasaError::NoApiKey)
        );

        let mut p = MarsPhotosParams::new(API_KEY);
        assert_eq!(p.encode().unwrap(), "api_key=NASA_KEY&sol=0");

        p.camera = Some(RoverCamera::Fhaz);
        assert_eq!(p.encode().unwrap(), "api_key=NASA_KEY&camera=fhaz&sol=0");

        p.sol = 1000;
        p.earth_date = Some(day());
        p.page = Some(2);
        assert_eq!(
            p.encode().unwrap(),
            "api_key=NASA_KEY&camera=fhaz&earth_date=2020-04-24&page=2"
        );

        p.page = Some(0);
        assert!(!p.encode().unwrap().contains("page"));
    }

    #[test]
    fn api_keys_are_exposed() {
        assert_eq!(ApiParam::new(API_KEY).api_key(), API_KEY);
        assert_eq!(ApodParams::new(API_KEY).api_key(), API_KEY);
        assert_eq!(EpicParams::new(API_KEY).api_key(), API_KEY);
        assert_eq!(MarsPhotosParams::new(API_KEY).api_key(), API_KEY);
    }

    #[test]
    fn media_search_params() {
        assert_eq!(
            MediaSearchParams::default().encode(),
            Err(NasaError::NoQuery)
        );
        let paging_only = MediaSearchParams {
            page: Some(3),
            ..Default::default()
        };
        assert_eq!(paging_only.encode(), Err(NasaError::NoQuery));

        let p = MediaSearchParams {
            keywords: vec!["apollo 11".into(), "moon".into()],
            media_type: vec![MediaType::Image, MediaType::Video],
            year_start: Some(1969),
            page: Some(2),
            ..MediaSearchParams::query("eagle")
        };
        assert_eq!(
            p.encode().unwrap(),
            "keywords=apollo+11%2Cmoon&media_type=image%2Cvideo&page=2&q=eagle&year_start=1969"
        );
    }
}
