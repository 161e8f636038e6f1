// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! NASA Image and Video Library.
//!
//! Unlike the `api.nasa.gov` services, the library needs no API key. Responses follow the
//! Collection+JSON layout, so every endpoint wraps its payload in a `collection` object. Asset
//! metadata and captions are not served inline: the library answers with the `location` of a
//! file which has to be fetched separately.

use crate::client::{parse_url, with_query, Client};
use crate::date::parse_exif_timestamp;
use crate::error::NasaError;
use crate::params::{MediaSearchParams, ParamEncoder};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{event, Level};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaSearchMetadata {
    pub total_hits: u64,
}

/// Descriptive data for one search result.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MediaData {
    pub center: String,
    pub title: String,
    pub secondary_creator: String,
    pub keywords: Vec<String>,
    pub description: String,
    pub description_508: String,
    pub media_type: String,
    pub nasa_id: String,
    pub date_created: Option<DateTime<Utc>>,
}

/// A preview link attached to a search result.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MediaLink {
    pub render: String,
    pub href: String,
    pub rel: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MediaItem {
    pub data: Vec<MediaData>,
    pub links: Vec<MediaLink>,
    /// Location of the item's asset manifest.
    pub href: String,
}

/// A navigation link of a result page.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CollectionLink {
    pub prompt: String,
    pub href: String,
    pub rel: String,
}

/// One page of search or album results.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Media {
    pub metadata: MediaSearchMetadata,
    pub items: Vec<MediaItem>,
    pub links: Vec<CollectionLink>,
    pub version: String,
    pub href: String,
}

impl Media {
    /// The URL of the following result page, if there is one.
    pub fn next_page(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "next")
            .map(|link| link.href.as_str())
    }
}

#[derive(Deserialize)]
struct CollectionResponse<T> {
    collection: T,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetLink {
    pub href: String,
}

/// The files making up a media asset, in every available rendition.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MediaAssets {
    pub items: Vec<AssetLink>,
    pub version: String,
    pub href: String,
}

/// Embedded metadata of a media asset.
///
/// The library's own `AVAIL:` fields are typed. Everything else the metadata extraction found
/// (`EXIF:`, `File:`, `IPTC:`, `XMP:` and so on) is kept as raw JSON under its full key and can
/// be browsed per namespace with [MediaMetadata::namespace].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaMetadata {
    #[serde(rename = "AVAIL:Album")]
    pub album: Option<Value>,
    #[serde(rename = "AVAIL:Center")]
    pub center: String,
    #[serde(rename = "AVAIL:DateCreated")]
    pub date_created: String,
    #[serde(rename = "AVAIL:Description")]
    pub description: String,
    #[serde(rename = "AVAIL:Description508")]
    pub description_508: String,
    #[serde(rename = "AVAIL:Keywords")]
    pub keywords: Vec<String>,
    #[serde(rename = "AVAIL:Location")]
    pub location: String,
    #[serde(rename = "AVAIL:MediaType")]
    pub media_type: String,
    #[serde(rename = "AVAIL:NASAID")]
    pub nasa_id: String,
    #[serde(rename = "AVAIL:Owner")]
    pub owner: String,
    #[serde(rename = "AVAIL:Photographer")]
    pub photographer: String,
    #[serde(rename = "AVAIL:SecondaryCreator")]
    pub secondary_creator: String,
    #[serde(rename = "AVAIL:Title")]
    pub title: String,
    #[serde(rename = "SourceFile")]
    pub source_file: String,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl MediaMetadata {
    /// Fields of namespace `ns` (e.g. `EXIF`), keyed by their name within the namespace.
    pub fn namespace<'a>(
        &'a self,
        ns: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.other.iter().filter_map(move |(key, value)| {
            let (prefix, name) = split_key(key)?;
            if prefix == ns {
                Some((name, value))
            } else {
                None
            }
        })
    }

    /// The distinct namespaces present in the untyped fields.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self
            .other
            .keys()
            .filter_map(|key| split_key(key).map(|(prefix, _)| prefix))
            .collect();
        namespaces.sort_unstable();
        namespaces.dedup();
        namespaces
    }

    /// When the asset was created according to its EXIF data.
    pub fn exif_create_date(&self) -> Option<DateTime<FixedOffset>> {
        ["EXIF:CreateDate", "EXIF:DateTimeOriginal", "XMP:CreateDate"]
            .iter()
            .filter_map(|key| self.other.get(*key)?.as_str())
            .find_map(parse_exif_timestamp)
    }
}

fn split_key(key: &str) -> Option<(&str, &str)> {
    let mut parts = key.splitn(2, ':');
    Some((parts.next()?, parts.next()?))
}

#[derive(Deserialize)]
struct LocationResponse {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl Client {
    /// Search the image and video library.
    pub async fn media_search(&self, params: &MediaSearchParams) -> Result<Media, NasaError> {
        let query = params.encode()?;
        let url = with_query(self.images_endpoint(&["search"])?, &query);
        let res: CollectionResponse<Media> = self.get_json(url).await?;
        event!(
            Level::DEBUG,
            "media search matched {} items",
            res.collection.metadata.total_hits
        );
        Ok(res.collection)
    }

    /// Fetch the contents of a curated album.
    pub async fn media_album(&self, name: &str, page: Option<u32>) -> Result<Media, NasaError> {
        let mut url = self.images_endpoint(&["album", name])?;
        if let Some(page) = page.filter(|page| *page > 0) {
            url = with_query(url, &format!("page={}", page));
        }
        let res: CollectionResponse<Media> = self.get_json(url).await?;
        Ok(res.collection)
    }

    /// List the files of the asset `nasa_id`.
    pub async fn media_assets(&self, nasa_id: &str) -> Result<MediaAssets, NasaError> {
        let url = self.images_endpoint(&["asset", nasa_id])?;
        let res: CollectionResponse<MediaAssets> = self.get_json(url).await?;
        Ok(res.collection)
    }

    /// Fetch the embedded metadata of the asset `nasa_id`.
    pub async fn media_metadata(&self, nasa_id: &str) -> Result<MediaMetadata, NasaError> {
        let url = self.images_endpoint(&["metadata", nasa_id])?;
        let res: LocationResponse = self.get_json(url).await?;
        let location = res
            .location
            .as_deref()
            .and_then(|location| parse_url(location).ok())
            .ok_or(NasaError::NoMetadata)?;
        event!(
            Level::DEBUG,
            "fetching metadata for {} from {}",
            nasa_id,
            location
        );
        self.get_json(location).await
    }

    /// Fetch the caption file (SRT or VTT) of the video `nasa_id`, unparsed.
    pub async fn media_captions(&self, nasa_id: &str) -> Result<String, NasaError> {
        let url = self.images_endpoint(&["captions", nasa_id])?;
        let res: LocationResponse = self.get_json(url).await?;
        if let Some(reason) = res.reason.filter(|reason| !reason.is_empty()) {
            return Err(NasaError::Captions { reason });
        }
        let location = res.location.unwrap_or_default();
        self.get_text(parse_url(&location)?).await
    }
}
