// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Earth Polychromatic Imaging Camera.
//!
//! The metadata endpoints only describe images; the image files themselves live in an archive
//! addressed by acquisition day and image id. [Client::epic] fills in those archive URLs for
//! every image it returns, for both the natural color and the enhanced collection:
//!
//! ```text
//! <api>/EPIC/archive/natural/2020/04/24/png/epic_1b_20200424002712.png?api_key=KEY
//! <api>/EPIC/archive/enhanced/2020/04/24/thumbs/epic_RGB_20200424002712.jpg?api_key=KEY
//! ```

use crate::client::{endpoint, parse_url, with_query, Client};
use crate::date::{Date, EpicDate};
use crate::error::NasaError;
use crate::params::{ApiParam, EpicParams, ParamEncoder};
use crate::types::{fmt_as_json, LatLon, Quaternions, Xyz};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tracing::{event, Level};
use url::form_urlencoded;

const NATURAL_ID_MARKER: &str = "_1b_";
const ENHANCED_ID_MARKER: &str = "_RGB_";

/// The two EPIC image collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpicCollection {
    Natural,
    Enhanced,
}

impl Default for EpicCollection {
    fn default() -> Self {
        Self::Natural
    }
}

impl Display for EpicCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural => write!(f, "natural"),
            Self::Enhanced => write!(f, "enhanced"),
        }
    }
}

/// Spacecraft geometry at acquisition time.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EpicCoords {
    #[serde(rename = "centroid_coordinates")]
    pub centroid: LatLon,
    #[serde(rename = "dscovr_j2000_position")]
    pub dscovr: Xyz,
    #[serde(rename = "lunar_j2000_position")]
    pub lunar: Xyz,
    #[serde(rename = "sun_j2000_position")]
    pub sun: Xyz,
    #[serde(rename = "attitude_quaternions")]
    pub attitude: Quaternions,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveUrls {
    /// Full resolution PNG.
    pub full: String,
    /// JPEG thumbnail.
    pub thumb: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpicUrls {
    pub natural: ArchiveUrls,
    pub enhanced: ArchiveUrls,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EpicImage {
    pub date: EpicDate,
    pub identifier: String,
    pub caption: String,
    /// Archive image id, e.g. `epic_1b_20200424002712`.
    pub image: String,
    pub version: String,
    #[serde(default)]
    pub coords: EpicCoords,
    /// Synthesized by the client, never part of the response.
    #[serde(skip_deserializing)]
    pub urls: EpicUrls,
}

pub type EpicImages = Vec<EpicImage>;

impl Display for EpicImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_as_json(self, f)
    }
}

impl EpicImage {
    /// The archive id of this image within `collection`.
    pub fn image_id(&self, collection: EpicCollection) -> String {
        match collection {
            EpicCollection::Natural => {
                self.image
                    .replacen(ENHANCED_ID_MARKER, NATURAL_ID_MARKER, 1)
            }
            EpicCollection::Enhanced => {
                self.image
                    .replacen(NATURAL_ID_MARKER, ENHANCED_ID_MARKER, 1)
            }
        }
    }

    fn archive_urls(
        &self,
        epic_base: &str,
        collection: EpicCollection,
        api_key: &str,
    ) -> ArchiveUrls {
        let id = self.image_id(collection);
        let day = self.date.format("%Y/%m/%d");
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("api_key", api_key)
            .finish();
        let url = |kind: &str, ext: &str| {
            format!(
                "{}/archive/{}/{}/{}/{}.{}?{}",
                epic_base, collection, day, kind, id, ext, query
            )
        };
        ArchiveUrls {
            full: url("png", "png"),
            thumb: url("thumbs", "jpg"),
        }
    }

    /// Fill in the natural color archive URLs.
    ///
    /// `epic_base` is the EPIC root, e.g. `https://api.nasa.gov/EPIC`.
    pub fn build_natural_urls(&mut self, epic_base: &str, api_key: &str) {
        self.urls.natural = self.archive_urls(epic_base, EpicCollection::Natural, api_key);
    }

    /// Fill in the enhanced color archive URLs.
    pub fn build_enhanced_urls(&mut self, epic_base: &str, api_key: &str) {
        self.urls.enhanced = self.archive_urls(epic_base, EpicCollection::Enhanced, api_key);
    }
}

pub fn build_urls(images: &mut [EpicImage], epic_base: &str, api_key: &str) {
    for image in images {
        image.build_natural_urls(epic_base, api_key);
        image.build_enhanced_urls(epic_base, api_key);
    }
}

#[derive(Deserialize)]
struct AvailableDate {
    date: Date,
}

impl Client {
    fn epic_base(&self) -> String {
        format!("{}/EPIC", self.api_base())
    }

    /// Fetch image metadata for a day, with archive URLs filled in.
    pub async fn epic(&self, params: &EpicParams) -> Result<EpicImages, NasaError> {
        let epic_base = self.epic_base();
        let url = parse_url(&format!("{}/{}", epic_base, params.encode()?))?;
        let mut images: EpicImages = self.get_json(url).await?;
        build_urls(&mut images, &epic_base, params.api_key());
        event!(
            Level::DEBUG,
            "built archive URLs for {} EPIC images",
            images.len()
        );
        Ok(images)
    }

    /// List the days for which `collection` has images.
    pub async fn epic_available_dates(
        &self,
        collection: EpicCollection,
        params: &ApiParam,
    ) -> Result<Vec<Date>, NasaError> {
        let query = params.encode()?;
        let base = parse_url(&self.epic_base())?;
        let collection = collection.to_string();
        let url = with_query(
            endpoint(&base, &["api", collection.as_str(), "all"])?,
            &query,
        );
        let dates: Vec<AvailableDate> = self.get_json(url).await?;
        Ok(dates.into_iter().map(|d| d.date).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.nasa.gov/EPIC";

    fn image(id: &str) -> EpicImage {
        EpicImage {
            date: "2020-04-24 00:27:12".parse().unwrap(),
            identifier: "20200424002712".into(),
            caption: "This image was taken by NASA's EPIC camera".into(),
            image: id.into(),
            version: "03".into(),
            coords: EpicCoords::default(),
            urls: EpicUrls::default(),
        }
    }

    #[test]
    fn natural_urls() {
        let mut img = image("epic_1b_20200424002712");
        img.build_natural_urls(BASE, "NASA_KEY");
        assert_eq!(
            img.urls.natural.full,
            "https://api.nasa.gov/EPIC/archive/natural/2020/04/24/png/epic_1b_20200424002712.png?api_key=NASA_KEY"
        );
        assert_eq!(
            img.urls.natural.thumb,
            "https://api.nasa.gov/EPIC/archive/natural/2020/04/24/thumbs/epic_1b_20200424002712.jpg?api_key=NASA_KEY"
        );
    }

    #[test]
    fn enhanced_urls() {
        let mut img = image("epic_1b_20200424002712");
        img.build_enhanced_urls(BASE, "NASA_KEY");
        assert_eq!(
            img.urls.enhanced.full,
            "https://api.nasa.gov/EPIC/archive/enhanced/2020/04/24/png/epic_RGB_20200424002712.png?api_key=NASA_KEY"
        );
        assert_eq!(
            img.urls.enhanced.thumb,
            "https://api.nasa.gov/EPIC/archive/enhanced/2020/04/24/thumbs/epic_RGB_20200424002712.jpg?api_key=NASA_KEY"
        );
    }

    #[test]
    fn enhanced_ids_map_back_to_natural() {
        let img = image("epic_RGB_20200424002712");
        assert_eq!(
            img.image_id(EpicCollection::Natural),
            "epic_1b_20200424002712"
        );
        assert_eq!(
            img.image_id(EpicCollection::Enhanced),
            "epic_RGB_20200424002712"
        );
    }

    #[test]
    fn archive_urls_encode_the_key() {
        let mut img = image("epic_1b_20200424002712");
        img.build_natural_urls(BASE, "A&B C");
        assert!(img.urls.natural.full.ends_with(".png?api_key=A%26B+C"));
        let url = url::Url::parse(&img.urls.natural.full).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("api_key".to_string(), "A&B C".to_string())]);
    }

    #[test]
    fn decode_response() {
        let body = r#"[{
            "identifier": "20200424002712",
            "caption": "This image was taken by NASA's EPIC camera onboard the NOAA DSCOVR spacecraft",
            "image": "epic_1b_20200424002712",
            "version": "03",
            "date": "2020-04-24 00:27:12",
            "coords": {
                "centroid_coordinates": {"lat": 20.5, "lon": 168.1},
                "dscovr_j2000_position": {"x": -1.0, "y": 2.0, "z": 3.0},
                "lunar_j2000_position": {"x": 4.0, "y": 5.0, "z": 6.0},
                "sun_j2000_position": {"x": 7.0, "y": 8.0, "z": 9.0},
                "attitude_quaternions": {"q0": 0.1, "q1": 0.2, "q2": 0.3, "q3": 0.4}
            }
        }]"#;
        let mut images: EpicImages = serde_json::from_str(body).unwrap();
        assert_eq!(images[0].coords.centroid.lat, 20.5);
        assert_eq!(images[0].coords.attitude.q3, 0.4);
        assert_eq!(images[0].urls, EpicUrls::default());

        build_urls(&mut images, BASE, "KEY");
        assert!(images[0].urls.natural.full.ends_with("png?api_key=KEY"));
        assert!(images[0].urls.enhanced.thumb.contains("/enhanced/2020/04/24/thumbs/"));
    }
}
