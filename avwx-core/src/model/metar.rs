use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Report, ReportData, SkyCondition, lenient};
use crate::query::ReportKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetarData {
    #[serde(rename(deserialize = "@num_results"), deserialize_with = "lenient::i32")]
    pub num_results: i32,

    #[serde(rename(deserialize = "METAR"))]
    pub metars: Vec<Metar>,
}

impl ReportData for MetarData {
    type Record = Metar;

    fn records(&self) -> &[Metar] {
        &self.metars
    }

    fn num_results(&self) -> i32 {
        self.num_results
    }
}

/// Sensor and maintenance flags attached to an observation.
///
/// Flags the server does not report are `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityControlFlags {
    #[serde(deserialize_with = "lenient::bool")]
    pub corrected: bool,
    #[serde(deserialize_with = "lenient::bool")]
    pub auto: bool,
    #[serde(deserialize_with = "lenient::bool")]
    pub auto_station: bool,
    #[serde(deserialize_with = "lenient::bool")]
    pub maintenance_indicator_on: bool,
    #[serde(deserialize_with = "lenient::bool")]
    pub no_signal: bool,
    #[serde(deserialize_with = "lenient::bool")]
    pub lightning_sensor_off: bool,
    #[serde(deserialize_with = "lenient::bool")]
    pub freezing_rain_sensor_off: bool,
    #[serde(deserialize_with = "lenient::bool")]
    pub present_weather_sensor_off: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metar {
    pub raw_text: String,
    pub station_id: String,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub observation_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::f64")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub longitude: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub temp_c: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub dewpoint_c: f64,
    #[serde(deserialize_with = "lenient::direction")]
    pub wind_dir_degrees: i32,
    #[serde(deserialize_with = "lenient::i32")]
    pub wind_speed_kt: i32,
    #[serde(deserialize_with = "lenient::i32")]
    pub wind_gust_kt: i32,
    #[serde(deserialize_with = "lenient::f64")]
    pub visibility_statute_mi: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub altim_in_hg: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub sea_level_pressure_mb: f64,
    pub quality_control_flags: QualityControlFlags,
    pub wx_string: String,
    pub sky_condition: Vec<SkyCondition>,
    pub flight_category: String,
    #[serde(deserialize_with = "lenient::f64")]
    pub three_hr_pressure_tendency_mb: f64,
    #[serde(rename = "maxT_c", deserialize_with = "lenient::f64")]
    pub max_t_c: f64,
    #[serde(rename = "minT_c", deserialize_with = "lenient::f64")]
    pub min_t_c: f64,
    #[serde(rename = "maxT24hr_c", deserialize_with = "lenient::f64")]
    pub max_t_24hr_c: f64,
    #[serde(rename = "minT24hr_c", deserialize_with = "lenient::f64")]
    pub min_t_24hr_c: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub precip_in: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub pcp3hr_in: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub pcp6hr_in: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub pcp24hr_in: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub snow_in: f64,
    #[serde(deserialize_with = "lenient::i32")]
    pub vert_vis_ft: i32,
    pub metar_type: String,
    #[serde(deserialize_with = "lenient::f64")]
    pub elevation_m: f64,
}

impl Report for Metar {
    const KIND: ReportKind = ReportKind::Metars;

    fn station_id(&self) -> &str {
        &self.station_id
    }

    fn raw_text(&self) -> &str {
        &self.raw_text
    }
}
