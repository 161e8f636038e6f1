// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Mars rover photos and mission manifests.

use crate::client::{with_query, Client};
use crate::date::Date;
use crate::error::{NasaError, RoverCameraMissingSnafu};
use crate::params::{ApiParam, MarsPhotosParams, ParamEncoder};
use crate::types::fmt_as_json;
use serde::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tracing::{event, Level};

const MARS_PHOTOS_API: [&str; 3] = ["mars-photos", "api", "v1"];

/// Rover cameras known to the photo API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoverCamera {
    Fhaz,
    Rhaz,
    Mast,
    Chemcam,
    Mahli,
    Mardi,
    Navcam,
    Pancam,
    Minites,
}

impl RoverCamera {
    pub const ALL: [RoverCamera; 9] = [
        Self::Fhaz,
        Self::Rhaz,
        Self::Mast,
        Self::Chemcam,
        Self::Mahli,
        Self::Mardi,
        Self::Navcam,
        Self::Pancam,
        Self::Minites,
    ];

    /// Short name, as used in responses.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fhaz => "FHAZ",
            Self::Rhaz => "RHAZ",
            Self::Mast => "MAST",
            Self::Chemcam => "CHEMCAM",
            Self::Mahli => "MAHLI",
            Self::Mardi => "MARDI",
            Self::Navcam => "NAVCAM",
            Self::Pancam => "PANCAM",
            Self::Minites => "MINITES",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Self::Fhaz => "Front Hazard Avoidance Camera",
            Self::Rhaz => "Rear Hazard Avoidance Camera",
            Self::Mast => "Mast Camera",
            Self::Chemcam => "Chemistry and Camera Complex",
            Self::Mahli => "Mars Hand Lens Imager",
            Self::Mardi => "Mars Descent Imager",
            Self::Navcam => "Navigation Camera",
            Self::Pancam => "Panoramic Camera",
            Self::Minites => "Miniature Thermal Emission Spectrometer (Mini-TES)",
        }
    }

    /// Name used in request parameters.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Fhaz => "fhaz",
            Self::Rhaz => "rhaz",
            Self::Mast => "mast",
            Self::Chemcam => "chemcam",
            Self::Mahli => "mahli",
            Self::Mardi => "mardi",
            Self::Navcam => "navcam",
            Self::Pancam => "pancam",
            Self::Minites => "minites",
        }
    }
}

impl Display for RoverCamera {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RoverCamera {
    type Err = NasaError;

    fn from_str(s: &str) -> Result<Self, NasaError> {
        Self::ALL
            .iter()
            .copied()
            .find(|camera| camera.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| NasaError::Unknown {
                kind: "camera".into(),
                name: s.into(),
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rover {
    Curiosity,
    Opportunity,
    Spirit,
}

impl Rover {
    pub const ALL: [Rover; 3] = [Self::Curiosity, Self::Opportunity, Self::Spirit];

    pub fn name(self) -> &'static str {
        match self {
            Self::Curiosity => "Curiosity",
            Self::Opportunity => "Opportunity",
            Self::Spirit => "Spirit",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Curiosity => "curiosity",
            Self::Opportunity => "opportunity",
            Self::Spirit => "spirit",
        }
    }

    /// The cameras this rover carries.
    pub fn cameras(self) -> &'static [RoverCamera] {
        use RoverCamera::*;
        match self {
            Self::Curiosity => &[Fhaz, Rhaz, Mast, Chemcam, Mahli, Mardi, Navcam],
            // Spirit and Opportunity are twins.
            Self::Opportunity | Self::Spirit => &[Fhaz, Rhaz, Navcam, Pancam, Minites],
        }
    }

    pub fn has_camera(self, camera: RoverCamera) -> bool {
        has_camera(self, camera)
    }
}

impl Display for Rover {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rover {
    type Err = NasaError;

    fn from_str(s: &str) -> Result<Self, NasaError> {
        Self::ALL
            .iter()
            .copied()
            .find(|rover| rover.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| NasaError::Unknown {
                kind: "rover".into(),
                name: s.into(),
            })
    }
}

pub fn has_camera(rover: Rover, camera: RoverCamera) -> bool {
    rover.cameras().contains(&camera)
}

/// The camera a photo was taken with.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoCamera {
    pub id: u64,
    pub name: String,
    pub rover_id: u64,
    pub full_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CameraInfo {
    pub name: String,
    pub full_name: String,
}

/// Rover details as reported by the photo API.
///
/// Photo responses embed a trimmed down version of this record, so everything beyond the id and
/// name is optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoverInfo {
    pub id: u64,
    pub name: String,
    pub landing_date: Option<Date>,
    pub launch_date: Option<Date>,
    pub status: String,
    pub max_sol: u32,
    pub max_date: Option<Date>,
    pub total_photos: u64,
    pub cameras: Vec<CameraInfo>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoverPhoto {
    pub id: u64,
    pub sol: u32,
    pub camera: PhotoCamera,
    #[serde(rename = "img_src")]
    pub image: String,
    pub earth_date: Date,
    pub rover: RoverInfo,
}

/// One page of rover photos.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoverPhotos {
    pub photos: Vec<RoverPhoto>,
    /// The page that was requested, starting from 1.
    #[serde(skip_deserializing)]
    pub page: u32,
}

impl Display for RoverPhotos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_as_json(self, f)
    }
}

/// Photo counts for a single sol.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestSol {
    pub sol: u32,
    pub earth_date: Date,
    pub total_photos: u64,
    /// Short names of the cameras that took photos on this sol.
    pub cameras: Vec<String>,
}

/// Rover mission details.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissionManifest {
    pub name: String,
    pub landing_date: Date,
    pub launch_date: Date,
    pub status: String,
    pub max_sol: u32,
    pub max_date: Date,
    pub total_photos: u64,
    #[serde(default)]
    pub photos: Vec<ManifestSol>,
}

#[derive(Deserialize)]
struct ManifestResponse {
    photo_manifest: MissionManifest,
}

#[derive(Deserialize)]
struct RoversResponse {
    rovers: Vec<RoverInfo>,
}

impl Client {
    /// Fetch photos taken by `rover`.
    ///
    /// Fails before any request is made if `params` names a camera the rover does not carry.
    pub async fn mars_rover_photos(
        &self,
        rover: Rover,
        params: &MarsPhotosParams,
    ) -> Result<RoverPhotos, NasaError> {
        if let Some(camera) = params.camera {
            ensure!(
                rover.has_camera(camera),
                RoverCameraMissingSnafu {
                    rover: rover.name(),
                    camera: camera.name(),
                }
            );
        }
        let query = params.encode()?;
        let mut path = MARS_PHOTOS_API.to_vec();
        path.extend_from_slice(&["rovers", rover.slug(), "photos"]);
        let url = with_query(self.api_endpoint(&path)?, &query);

        let mut photos: RoverPhotos = self.get_json(url).await?;
        photos.page = params.page.filter(|page| *page > 1).unwrap_or(1);
        event!(
            Level::DEBUG,
            "{} returned {} photos on page {}",
            rover,
            photos.photos.len(),
            photos.page
        );
        Ok(photos)
    }

    pub async fn mars_mission_manifest(
        &self,
        rover: Rover,
        params: &ApiParam,
    ) -> Result<MissionManifest, NasaError> {
        let query = params.encode()?;
        let mut path = MARS_PHOTOS_API.to_vec();
        path.extend_from_slice(&["manifests", rover.slug()]);
        let url = with_query(self.api_endpoint(&path)?, &query);
        let res: ManifestResponse = self.get_json(url).await?;
        Ok(res.photo_manifest)
    }

    /// List every rover the photo API knows about.
    pub async fn mars_rovers(&self, params: &ApiParam) -> Result<Vec<RoverInfo>, NasaError> {
        let query = params.encode()?;
        let mut path = MARS_PHOTOS_API.to_vec();
        path.push("rovers");
        let url = with_query(self.api_endpoint(&path)?, &query);
        let res: RoversResponse = self.get_json(url).await?;
        Ok(res.rovers)
    }
}
