//! Core library for the `avwx` CLI.
//!
//! This crate defines:
//! - Request options and their mapping onto text data server query parameters
//! - Decoding of the XML response envelope into METAR and TAF records
//! - Output projections (raw text, pretty TAF, JSON)
//! - The HTTP transport and client tying these together
//! - Configuration handling
//!
//! It is used by `avwx-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod options;
pub mod projection;
pub mod query;
pub mod response;
pub mod time;
pub mod transport;

pub use client::AvwxClient;
pub use config::{Config, DEFAULT_ENDPOINT, RequestDefaults};
pub use error::{Error, Result};
pub use model::{Metar, Report, ReportData, Taf};
pub use options::{MetarOptions, StationQuery, TafOptions, TimeEncoding, TimeType};
pub use projection::{OutputFormat, render};
pub use query::{EncodeQuery, QueryParams, ReportKind};
pub use response::{MetarResponse, Response, TafResponse, parse_metars, parse_tafs};
pub use time::parse_timestamp;
pub use transport::{HttpTransport, Transport};
