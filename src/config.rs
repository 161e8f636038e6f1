// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::error::NasaError;
use std::env;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.nasa.gov";
pub const DEFAULT_IMAGES_URL: &str = "https://images-api.nasa.gov";

pub const API_KEY_VAR: &str = "NASA_API_KEY";
pub const API_URL_VAR: &str = "NASA_API_URL";
pub const IMAGES_URL_VAR: &str = "NASA_IMAGES_URL";

/// Connection settings for a [Client](crate::Client).
///
/// `api_url` serves APOD, EPIC and the Mars rover photos; `images_url` serves the image and
/// video library. The API key is only a default for building parameters, each request still
/// carries its own key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    api_url: Url,
    images_url: Url,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: Url::parse(DEFAULT_API_URL).expect("DEFAULT_API_URL is a valid URL"),
            images_url: Url::parse(DEFAULT_IMAGES_URL)
                .expect("DEFAULT_IMAGES_URL is a valid URL"),
        }
    }
}

fn parse_base(url: &str) -> Result<Url, NasaError> {
    let parsed = Url::parse(url).map_err(|err| NasaError::InvalidUrl {
        url: url.to_string(),
        msg: err.to_string(),
    })?;
    if parsed.cannot_be_a_base() {
        return Err(NasaError::Config {
            msg: format!("{} cannot be used as a base URL", url),
        });
    }
    Ok(parsed)
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Load settings from `NASA_API_KEY`, `NASA_API_URL` and `NASA_IMAGES_URL`.
    ///
    /// Unset variables fall back to the public endpoints and no default API key.
    pub fn from_env() -> Result<Self, NasaError> {
        let mut config = Self {
            api_key: env::var(API_KEY_VAR).ok().filter(|key| !key.is_empty()),
            ..Default::default()
        };
        if let Ok(url) = env::var(API_URL_VAR) {
            config = config.with_api_url(&url)?;
        }
        if let Ok(url) = env::var(IMAGES_URL_VAR) {
            config = config.with_images_url(&url)?;
        }
        Ok(config)
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self, NasaError> {
        self.api_url = parse_base(url)?;
        Ok(self)
    }

    pub fn with_images_url(mut self, url: &str) -> Result<Self, NasaError> {
        self.images_url = parse_base(url)?;
        Ok(self)
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn images_url(&self) -> &Url {
        &self.images_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_url().as_str(), "https://api.nasa.gov/");
        assert_eq!(config.images_url().as_str(), "https://images-api.nasa.gov/");
    }

    #[test]
    fn overrides() {
        let config = ClientConfig::new("KEY")
            .with_api_url("http://127.0.0.1:8080/nasa")
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("KEY"));
        assert_eq!(config.api_url().as_str(), "http://127.0.0.1:8080/nasa");
    }

    // All environment cases live in one test so concurrent tests never see each other's
    // variables.
    #[test]
    fn from_env() {
        let clear = || {
            for var in [API_KEY_VAR, API_URL_VAR, IMAGES_URL_VAR].iter() {
                env::remove_var(var);
            }
        };

        clear();
        assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());

        env::set_var(API_KEY_VAR, "");
        assert_eq!(ClientConfig::from_env().unwrap().api_key, None);

        env::set_var(API_KEY_VAR, "ENV_KEY");
        env::set_var(API_URL_VAR, "http://127.0.0.1:8080/nasa");
        env::set_var(IMAGES_URL_VAR, "http://127.0.0.1:8081");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key.as_deref(), Some("ENV_KEY"));
        assert_eq!(config.api_url().as_str(), "http://127.0.0.1:8080/nasa");
        assert_eq!(config.images_url().as_str(), "http://127.0.0.1:8081/");

        env::set_var(API_URL_VAR, "not a url");
        assert!(matches!(
            ClientConfig::from_env(),
            Err(NasaError::InvalidUrl { url, .. }) if url == "not a url"
        ));

        clear();
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            ClientConfig::default().with_images_url("not a url"),
            Err(NasaError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::default().with_api_url("mailto:nasa@example.com"),
            Err(NasaError::Config { .. })
        ));
    }
}
