// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::client::{with_query, Client};
use crate::date::Date;
use crate::error::NasaError;
use crate::params::{ApodParams, ParamEncoder};
use crate::types::fmt_as_json;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tracing::{event, Level};

/// Astronomy Picture of the Day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApodImage {
    pub date: Date,
    pub title: String,
    pub url: String,
    /// Only present for images.
    #[serde(default)]
    pub hdurl: Option<String>,
    pub explanation: String,
    /// `image` or `video`.
    pub media_type: String,
    /// Public domain pictures carry no copyright.
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub service_version: String,
}

impl Display for ApodImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_as_json(self, f)
    }
}

impl Client {
    /// Fetch the Astronomy Picture of the Day.
    pub async fn apod(&self, params: &ApodParams) -> Result<ApodImage, NasaError> {
        let query = params.encode()?;
        event!(Level::DEBUG, "fetching APOD for {:?}", params.date);
        let url = with_query(self.api_endpoint(&["planetary", "apod"])?, &query);
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn decode_apod() {
        let body = r#"{
            "date": "2020-04-24",
            "explanation": "Galaxies are fascinating.",
            "hdurl": "https://apod.nasa.gov/apod/image/2004/M61_hd.jpg",
            "media_type": "image",
            "service_version": "v1",
            "title": "M61",
            "url": "https://apod.nasa.gov/apod/image/2004/M61.jpg"
        }"#;
        let img: ApodImage = serde_json::from_str(body).unwrap();
        assert_eq!(*img.date, NaiveDate::from_ymd_opt(2020, 4, 24).unwrap());
        assert_eq!(img.copyright, None);
        assert_eq!(
            img.hdurl.as_deref(),
            Some("https://apod.nasa.gov/apod/image/2004/M61_hd.jpg")
        );

        let shown: ApodImage = serde_json::from_str(&img.to_string()).unwrap();
        assert_eq!(shown, img);
    }
}
