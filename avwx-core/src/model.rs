use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::query::ReportKind;

pub mod metar;
pub mod taf;

pub use metar::{Metar, MetarData, QualityControlFlags};
pub use taf::{Forecast, IcingCondition, Taf, TafData, TemperatureForecast, TurbulenceCondition};

/// A single decoded report.
pub trait Report {
    const KIND: ReportKind;

    fn station_id(&self) -> &str;

    /// The undecoded report as issued.
    fn raw_text(&self) -> &str;
}

/// The `<data>` section of a response for one report kind.
pub trait ReportData: DeserializeOwned + Serialize + Default {
    type Record: Report;

    fn records(&self) -> &[Self::Record];

    /// The `num_results` attribute as reported by the server.
    fn num_results(&self) -> i32;
}

/// One cloud layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyCondition {
    #[serde(rename(deserialize = "@sky_cover"))]
    pub sky_cover: String,

    #[serde(
        rename(deserialize = "@cloud_base_ft_agl"),
        deserialize_with = "lenient::i32"
    )]
    pub cloud_base_ft_agl: i32,

    /// Only reported in TAF forecasts (e.g. `CB`, `TCU`).
    #[serde(
        rename(deserialize = "@cloud_type"),
        skip_serializing_if = "String::is_empty"
    )]
    pub cloud_type: String,
}

/// Field deserializers that map empty or missing values to zero.
///
/// The server omits or empties fields it has no value for, and reports
/// booleans as `TRUE`.
pub(crate) mod lenient {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    use crate::time::parse_server_timestamp;

    fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let s = text(d)?;
        // Visibility is sometimes reported as "10+".
        let t = s.trim().trim_end_matches('+');
        if t.is_empty() {
            return Ok(0.0);
        }
        t.parse()
            .map_err(|_| D::Error::custom(format!("invalid number '{s}'")))
    }

    pub fn i32<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
        let s = text(d)?;
        let t = s.trim().trim_end_matches('+');
        if t.is_empty() {
            return Ok(0);
        }
        if let Ok(v) = t.parse::<i32>() {
            return Ok(v);
        }
        // Whole numbers written as decimals ("1500.0") are accepted.
        match t.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&v) => {
                Ok(v as i32)
            }
            _ => Err(D::Error::custom(format!("invalid integer '{s}'"))),
        }
    }

    /// Wind direction in degrees; variable winds (`VRB`) are 0.
    pub fn direction<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
        let s = text(d)?;
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("VRB") {
            return Ok(0);
        }
        t.parse()
            .map_err(|_| D::Error::custom(format!("invalid wind direction '{s}'")))
    }

    pub fn bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let s = text(d)?;
        match s.trim() {
            t if t.eq_ignore_ascii_case("true") || t == "1" => Ok(true),
            t if t.is_empty() || t.eq_ignore_ascii_case("false") || t == "0" => Ok(false),
            _ => Err(D::Error::custom(format!("invalid boolean '{s}'"))),
        }
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let s = text(d)?;
        if s.trim().is_empty() {
            return Ok(None);
        }
        parse_server_timestamp(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{s}'")))
    }
}
