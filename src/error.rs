// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use snafu::{ErrorCompat, IntoError, Snafu};
use std::convert::TryFrom;
use surf::StatusCode;

/// Errors which can be carried through the HTTP client layer.
///
/// When a request fails for any reason, the failure is lifted into a [surf::Error] by the client
/// middleware. If the failure was originally an instance of the crate's error type, it can be
/// downcasted back to this type once the request returns. The `client` module provides a
/// middleware handler that produces such errors from NASA's error responses.
///
/// Other errors (those which don't downcast to the error type, such as transport failures
/// generated inside [surf]) are converted using their [Display](std::fmt::Display) instance and
/// the `catch_all` function.
pub trait Error: std::error::Error + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn catch_all(msg: String) -> Self;
    fn status(&self) -> StatusCode;

    /// Convert from a generic client-side error to a specific error type.
    ///
    /// If `source` can be downcast to `Self`, it is simply downcasted. Otherwise, it is converted
    /// to a [String] using [Display](std::fmt::Display) and then converted to `Self` using
    /// [catch_all](Error::catch_all).
    fn from_client_error(source: surf::Error) -> Self {
        match source.downcast::<Self>() {
            Ok(err) => err,
            Err(err) => Self::catch_all(err.to_string()),
        }
    }
}

/// Everything that can go wrong while talking to a NASA API.
#[derive(Clone, Debug, Snafu, Serialize, Deserialize, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum NasaError {
    #[snafu(display("no API key provided; get one at https://api.nasa.gov"))]
    NoApiKey,

    #[snafu(display("media has no metadata"))]
    NoMetadata,

    #[snafu(display("must provide a search query"))]
    NoQuery,

    /// The rover does not carry the requested camera.
    #[snafu(display("rover {} does not have {} camera", rover, camera))]
    RoverCameraMissing { rover: String, camera: String },

    #[snafu(display("unknown {} {}", kind, name))]
    Unknown { kind: String, name: String },

    /// The service answered with a non-success status.
    #[snafu(display("NASA API responded with status {}: {}", status, message))]
    Api { status: u16, message: String },

    #[snafu(display("{}", reason))]
    Captions { reason: String },

    #[snafu(display("response body fails to deserialize: {}", msg))]
    Decode { msg: String },

    #[snafu(display("invalid URL {}: {}", url, msg))]
    InvalidUrl { url: String, msg: String },

    #[snafu(display("invalid configuration: {}", msg))]
    Config { msg: String },

    #[snafu(display("{}", msg))]
    Client { msg: String },
}

impl Error for NasaError {
    fn catch_all(msg: String) -> Self {
        Self::Client { msg }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NoApiKey => StatusCode::Unauthorized,
            Self::NoQuery
            | Self::RoverCameraMissing { .. }
            | Self::Unknown { .. }
            | Self::InvalidUrl { .. } => StatusCode::BadRequest,
            Self::NoMetadata | Self::Captions { .. } => StatusCode::NotFound,
            Self::Api { status, .. } => {
                StatusCode::try_from(*status).unwrap_or(StatusCode::InternalServerError)
            }
            Self::Decode { .. } | Self::Config { .. } | Self::Client { .. } => {
                StatusCode::InternalServerError
            }
        }
    }
}

/// Context for embedding network client errors into specific error types.
///
/// This type implements the [IntoError] trait from SNAFU, so it can be used with
/// [ResultExt::context](snafu::ResultExt::context) just like automatically generated SNAFU
/// contexts.
///
/// Calling `some_result.context(ClientError)` will convert a potential error from a [surf::Error]
/// to a specific error type `E` using the method `E::from_client_error`, provided by the
/// [Error] trait.
pub struct ClientError;

impl<E: Error + ErrorCompat + std::error::Error> IntoError<E> for ClientError {
    type Source = surf::Error;

    fn into_error(self, source: Self::Source) -> E {
        E::from_client_error(source)
    }
}

/// Convert a concrete error type into a client error.
///
/// The error is first converted into an [Error] using the [Into] instance. That error is then
/// upcasted into an anyhow error to be embedded in the [surf::Error], using the status code
/// indicated by [Error::status].
///
/// This is the inverse of [ClientError], and is used by the client middleware to carry NASA's
/// error responses out of the request pipeline.
pub fn client_error<E: Error>(error: impl Into<E>) -> surf::Error {
    let error = error.into();
    surf::Error::new(error.status(), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snafu::ResultExt;

    #[test]
    fn downcasts_lifted_errors() {
        let lifted = client_error::<NasaError>(NasaError::NoQuery);
        assert_eq!(lifted.status(), StatusCode::BadRequest);
        assert_eq!(NasaError::from_client_error(lifted), NasaError::NoQuery);
    }

    #[test]
    fn foreign_errors_become_catch_all() {
        let foreign = surf::Error::from_str(StatusCode::BadGateway, "connection reset");
        let res: Result<(), surf::Error> = Err(foreign);
        let err: NasaError = res.context(ClientError).unwrap_err();
        assert_eq!(
            err,
            NasaError::Client {
                msg: "connection reset".into()
            }
        );
    }

    #[test]
    fn api_status_passthrough() {
        let err = NasaError::Api {
            status: 429,
            message: "rate limited".into(),
        };
        assert_eq!(err.status(), StatusCode::TooManyRequests);

        let err = NasaError::Api {
            status: 999,
            message: "nonsense".into(),
        };
        assert_eq!(err.status(), StatusCode::InternalServerError);
    }

    #[test]
    fn camera_message() {
        let err = NasaError::RoverCameraMissing {
            rover: "Curiosity".into(),
            camera: "PANCAM".into(),
        };
        assert_eq!(err.to_string(), "rover Curiosity does not have PANCAM camera");
    }
}
