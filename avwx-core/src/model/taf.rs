use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Report, ReportData, SkyCondition, lenient};
use crate::query::ReportKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TafData {
    #[serde(rename(deserialize = "@num_results"), deserialize_with = "lenient::i32")]
    pub num_results: i32,

    #[serde(rename(deserialize = "TAF"))]
    pub tafs: Vec<Taf>,
}

impl ReportData for TafData {
    type Record = Taf;

    fn records(&self) -> &[Taf] {
        &self.tafs
    }

    fn num_results(&self) -> i32 {
        self.num_results
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taf {
    pub raw_text: String,
    pub station_id: String,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub issue_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub bulletin_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub valid_time_from: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub valid_time_to: Option<DateTime<Utc>>,
    pub remarks: String,
    #[serde(deserialize_with = "lenient::f64")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub longitude: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub elevation_m: f64,
    pub forecast: Vec<Forecast>,
}

impl Report for Taf {
    const KIND: ReportKind = ReportKind::Tafs;

    fn station_id(&self) -> &str {
        &self.station_id
    }

    fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

/// One time-bounded segment of a TAF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Forecast {
    #[serde(deserialize_with = "lenient::timestamp")]
    pub fcst_time_from: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub fcst_time_to: Option<DateTime<Utc>>,
    /// `FM`, `BECMG`, `TEMPO` or `PROB`; empty for the initial segment.
    pub change_indicator: String,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub time_becoming: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::i32")]
    pub probability: i32,
    #[serde(deserialize_with = "lenient::direction")]
    pub wind_dir_degrees: i32,
    #[serde(deserialize_with = "lenient::i32")]
    pub wind_speed_kt: i32,
    #[serde(deserialize_with = "lenient::i32")]
    pub wind_gust_kt: i32,
    #[serde(deserialize_with = "lenient::i32")]
    pub wind_shear_hgt_ft_agl: i32,
    #[serde(deserialize_with = "lenient::i32")]
    pub wind_shear_dir_degrees: i32,
    #[serde(deserialize_with = "lenient::f64")]
    pub wind_shear_speed_kt: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub visibility_statute_mi: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub altim_in_hg: f64,
    #[serde(deserialize_with = "lenient::i32")]
    pub vert_vis_ft: i32,
    pub wx_string: String,
    pub not_decoded: String,
    pub sky_condition: Vec<SkyCondition>,
    pub turbulence_condition: Vec<TurbulenceCondition>,
    pub icing_condition: Vec<IcingCondition>,
    pub temperature: Vec<TemperatureForecast>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbulenceCondition {
    #[serde(
        rename(deserialize = "@turbulence_intensity"),
        deserialize_with = "lenient::i32"
    )]
    pub turbulence_intensity: i32,
    #[serde(
        rename(deserialize = "@turbulence_min_alt_ft_agl"),
        deserialize_with = "lenient::i32"
    )]
    pub turbulence_min_alt_ft_agl: i32,
    #[serde(
        rename(deserialize = "@turbulence_max_alt_ft_agl"),
        deserialize_with = "lenient::i32"
    )]
    pub turbulence_max_alt_ft_agl: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcingCondition {
    #[serde(
        rename(deserialize = "@icing_intensity"),
        deserialize_with = "lenient::i32"
    )]
    pub icing_intensity: i32,
    #[serde(
        rename(deserialize = "@icing_min_alt_ft_agl"),
        deserialize_with = "lenient::i32"
    )]
    pub icing_min_alt_ft_agl: i32,
    #[serde(
        rename(deserialize = "@icing_max_alt_ft_agl"),
        deserialize_with = "lenient::i32"
    )]
    pub icing_max_alt_ft_agl: i32,
}

/// Forecast temperature at a point in time within a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureForecast {
    #[serde(deserialize_with = "lenient::timestamp")]
    pub valid_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::f64")]
    pub sfc_temp_c: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub max_temp_c: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub min_temp_c: f64,
}
