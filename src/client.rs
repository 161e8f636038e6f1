// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::config::ClientConfig;
use crate::error::{client_error, ClientError, NasaError};
use crate::params::ApiParam;
use futures::future::BoxFuture;
use serde::{de::DeserializeOwned, Deserialize};
use snafu::ResultExt;
use surf::{
    middleware::{Next, Redirect},
    Client as HttpClient, Request, Response, StatusCode,
};
use tracing::{event, Level};
use url::Url;

/// Deserialize the body of a response.
///
/// The Content-Type header is used to determine whether the body can be decoded. NASA's
/// services answer with `application/json`, except for the image library's metadata bucket,
/// which serves JSON documents as generic octet streams.
///
/// This function combined with the [parse_error_body] middleware defines the client-side
/// protocol for decoding NASA responses.
pub async fn response_body<T: DeserializeOwned>(res: &mut Response) -> Result<T, surf::Error> {
    if let Some(content_type) = res.content_type() {
        match content_type.essence() {
            "application/json"
            | "text/json"
            | "application/octet-stream"
            | "binary/octet-stream" => {
                let bytes = res.body_bytes().await?;
                serde_json::from_slice(&bytes).map_err(|err| {
                    client_error::<NasaError>(NasaError::Decode {
                        msg: err.to_string(),
                    })
                })
            }
            content_type => Err(surf::Error::from_str(
                StatusCode::UnsupportedMediaType,
                format!("unsupported content type {}", content_type),
            )),
        }
    } else {
        Err(surf::Error::from_str(
            StatusCode::UnsupportedMediaType,
            "unspecified content type in response",
        ))
    }
}

/// The error bodies produced by the different NASA services.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    // api.nasa.gov gateway, e.g. a missing or invalid key
    Gateway { error: GatewayError },
    // APOD
    Service { msg: String },
    // Mars rover photos
    Rover { errors: String },
    // Image and video library
    Library { reason: String },
}

#[derive(Deserialize)]
struct GatewayError {
    message: String,
}

/// Pull a human-readable message out of an error response body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope::Gateway { error }) => Some(error.message),
        Ok(ErrorEnvelope::Service { msg }) => Some(msg),
        Ok(ErrorEnvelope::Rover { errors }) => Some(errors),
        Ok(ErrorEnvelope::Library { reason }) => Some(reason),
        Err(_) => {
            let body = body.trim();
            if body.is_empty() {
                None
            } else {
                Some(body.to_string())
            }
        }
    }
}

pub async fn response_to_result(mut res: Response) -> surf::Result<Response> {
    if res.status() == StatusCode::Ok {
        Ok(res)
    } else {
        let status = res.status();
        let body = res.body_string().await.unwrap_or_default();
        let message =
            error_message(&body).unwrap_or_else(|| status.canonical_reason().to_string());
        event!(
            Level::WARN,
            "request failed with status {}: {}",
            status,
            message
        );
        Err(client_error::<NasaError>(NasaError::Api {
            status: status.into(),
            message,
        }))
    }
}

/// Client middleware which turns responses with non-success statuses into errors.
///
/// If the status code of the response is Ok (200), the response is passed through unchanged.
/// Otherwise, the body of the response is read as one of NASA's error envelopes and lifted into
/// a [surf::Error] wrapping [NasaError::Api]. This can then be recovered using
/// [Error::from_client_error](crate::Error::from_client_error).
///
/// If the request fails without producing a response at all, the [surf::Error] from the failed
/// request is passed through.
pub fn parse_error_body(
    req: Request,
    client: HttpClient,
    next: Next<'_>,
) -> BoxFuture<surf::Result<Response>> {
    Box::pin(async move {
        let res = next.run(req, client).await?;
        response_to_result(res).await
    })
}

/// Copy of `url` with the value of its `api_key` parameter masked, for logging.
pub(crate) fn redacted(url: &Url) -> Url {
    let mut redacted = url.clone();
    if url.query_pairs().any(|(key, _)| key == "api_key") {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "api_key" {
                    "***".to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted
}

/// Client middleware which logs requests and responses.
pub fn trace(req: Request, client: HttpClient, next: Next<'_>) -> BoxFuture<surf::Result<Response>> {
    Box::pin(async move {
        event!(
            Level::INFO,
            "--> sending request {{method: {}, url: {}}}",
            req.method(),
            redacted(req.url()),
        );
        let res = next.run(req, client).await?;
        event!(
            Level::INFO,
            "<-- received response {{status: {}, content-type: {:?}}}",
            res.status(),
            res.content_type(),
        );
        Ok(res)
    })
}

/// Async client for the NASA web APIs.
///
/// The endpoint bindings live next to their response types: see the `apod`, `epic`, `mars` and
/// `media` modules.
#[derive(Clone, Debug)]
pub struct Client {
    http: HttpClient,
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        // Outermost first: error statuses are lifted only after redirects are followed, and
        // trace sees every raw response, including failed ones.
        let http = HttpClient::new()
            .with(parse_error_body)
            .with(Redirect::default())
            .with(trace);
        Self { http, config }
    }

    /// A client configured from the environment, see [ClientConfig::from_env].
    pub fn from_env() -> Result<Self, NasaError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Key-only parameters using the configured default key.
    ///
    /// Encoding fails with [NasaError::NoApiKey] if no key was configured.
    pub fn api_param(&self) -> ApiParam {
        ApiParam::new(self.config.api_key.clone().unwrap_or_default())
    }

    pub(crate) fn api_endpoint(&self, segments: &[&str]) -> Result<Url, NasaError> {
        endpoint(self.config.api_url(), segments)
    }

    pub(crate) fn images_endpoint(&self, segments: &[&str]) -> Result<Url, NasaError> {
        endpoint(self.config.images_url(), segments)
    }

    /// Base for paths under the API host which arrive pre-encoded, such as EPIC's.
    pub(crate) fn api_base(&self) -> &str {
        self.config.api_url().as_str().trim_end_matches('/')
    }

    async fn send(&self, url: Url) -> Result<Response, NasaError> {
        self.http.get(url).await.context(ClientError)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, NasaError> {
        let mut res = self.send(url).await?;
        response_body(&mut res).await.context(ClientError)
    }

    pub(crate) async fn get_text(&self, url: Url) -> Result<String, NasaError> {
        let mut res = self.send(url).await?;
        res.body_string().await.context(ClientError)
    }
}

/// Append path `segments` to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, NasaError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| NasaError::Config {
            msg: format!("{} cannot be used as a base URL", base),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Attach an already encoded query string to `url`.
pub(crate) fn with_query(mut url: Url, query: &str) -> Url {
    url.set_query(Some(query));
    url
}

pub(crate) fn parse_url(url: &str) -> Result<Url, NasaError> {
    Url::parse(url).map_err(|err| NasaError::InvalidUrl {
        url: url.to_string(),
        msg: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelopes() {
        let gateway = r#"{"error":{"code":"API_KEY_INVALID","message":"An invalid api_key was supplied."}}"#;
        assert_eq!(
            error_message(gateway).as_deref(),
            Some("An invalid api_key was supplied.")
        );

        let apod = r#"{"code":400,"msg":"Date must be between Jun 16, 1995 and Apr 24, 2020.","service_version":"v1"}"#;
        assert_eq!(
            error_message(apod).as_deref(),
            Some("Date must be between Jun 16, 1995 and Apr 24, 2020.")
        );

        assert_eq!(
            error_message(r#"{"errors":"Invalid Rover Name"}"#).as_deref(),
            Some("Invalid Rover Name")
        );
        assert_eq!(
            error_message(r#"{"reason":"No captions for asset"}"#).as_deref(),
            Some("No captions for asset")
        );
        assert_eq!(
            error_message(" Bad Gateway\n").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(error_message(""), None);
    }

    #[test]
    fn endpoints_encode_segments() {
        let base = Url::parse("https://images-api.nasa.gov").unwrap();
        let url = endpoint(&base, &["asset", "as11-40-5874"]).unwrap();
        assert_eq!(url.as_str(), "https://images-api.nasa.gov/asset/as11-40-5874");

        let url = endpoint(&base, &["album", "Apollo 11"]).unwrap();
        assert_eq!(url.as_str(), "https://images-api.nasa.gov/album/Apollo%2011");

        let base = Url::parse("http://127.0.0.1:9000/proxy/").unwrap();
        let url = endpoint(&base, &["planetary", "apod"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/proxy/planetary/apod");
    }

    #[test]
    fn api_key_is_redacted() {
        let url = Url::parse("https://api.nasa.gov/planetary/apod?api_key=SECRET&hd=true").unwrap();
        let logged = redacted(&url);
        assert!(!logged.as_str().contains("SECRET"));
        assert!(logged.as_str().contains("hd=true"));

        let url = Url::parse("https://images-api.nasa.gov/search?q=moon").unwrap();
        assert_eq!(redacted(&url), url);
    }

    #[test]
    fn default_api_param_needs_key() {
        let client = Client::new(ClientConfig::default());
        assert_eq!(client.api_param().api_key(), "");

        let client = Client::new(ClientConfig::new("KEY"));
        assert_eq!(client.api_param().api_key(), "KEY");
    }
}
