// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the NASA API bindings library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Typed bindings for NASA's public web APIs.
//!
//! Covered services are the Astronomy Picture of the Day, EPIC earth imagery, the Mars rover
//! photo archive and the NASA Image and Video Library. Every binding follows the same shape:
//! typed parameters are encoded into a query string (refusing to do so without an API key where
//! the service needs one), the request is issued through a [Client], and the JSON response is
//! decoded into the corresponding Rust data structure via serde. EPIC responses are additionally
//! post-processed to carry the archive URLs of each image.
//!
//! ```no_run
//! # async fn example() -> Result<(), nasa::NasaError> {
//! use nasa::{ApodParams, Client, ClientConfig};
//!
//! let client = Client::new(ClientConfig::new("DEMO_KEY"));
//! let apod = client.apod(&ApodParams::new("DEMO_KEY")).await?;
//! println!("{}: {}", apod.date, apod.title);
//! # Ok(())
//! # }
//! ```
//!
//! The [Client] is a thin wrapper around a `surf::Client` which follows redirects and has two
//! middlewares from the `client` module attached: one traces every request and response, the
//! other turns NASA's error responses into [NasaError::Api] values. Errors of every kind are recovered as a [NasaError]
//! through the [Error] trait and the [ClientError] context.

pub mod apod;
pub mod client;
pub mod config;
pub mod date;
pub mod epic;
pub mod error;
pub mod mars;
pub mod media;
pub mod params;
pub mod types;

pub use apod::*;
pub use client::Client;
pub use config::ClientConfig;
pub use date::*;
pub use epic::*;
pub use error::*;
pub use mars::*;
pub use media::*;
pub use params::*;
pub use types::*;

/// The crate version, as reported by Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
