//! Request options for the text data server.
//!
//! Every field is an `Option`: `None` means the parameter is not sent at
//! all, while `Some(false)`, `Some(0)` or `Some(vec![])` are sent as-is.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::error::Error;

/// Filters shared by METAR and TAF requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationQuery {
    pub stations: Option<Vec<String>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub hours_before_now: Option<u32>,
    pub most_recent: Option<bool>,
    pub most_recent_for_each_station: Option<bool>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
    pub radial_distance: Option<String>,
    pub flight_path: Option<Vec<String>>,
    pub min_degree_distance: Option<f64>,
    pub fields: Option<Vec<String>>,
}

impl StationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stations<I, S>(mut self, stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stations = Some(stations.into_iter().map(Into::into).collect());
        self
    }

    pub fn start_time(mut self, t: DateTime<Utc>) -> Self {
        self.start_time = Some(t);
        self
    }

    pub fn end_time(mut self, t: DateTime<Utc>) -> Self {
        self.end_time = Some(t);
        self
    }

    pub fn hours_before_now(mut self, hours: u32) -> Self {
        self.hours_before_now = Some(hours);
        self
    }

    pub fn most_recent(mut self, v: bool) -> Self {
        self.most_recent = Some(v);
        self
    }

    pub fn most_recent_for_each_station(mut self, v: bool) -> Self {
        self.most_recent_for_each_station = Some(v);
        self
    }

    /// Bounding box in degrees: `(min_lat, min_lon, max_lat, max_lon)`.
    pub fn bounding_box(mut self, min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        self.min_lat = Some(min_lat);
        self.min_lon = Some(min_lon);
        self.max_lat = Some(max_lat);
        self.max_lon = Some(max_lon);
        self
    }

    pub fn radial_distance(mut self, value: impl Into<String>) -> Self {
        self.radial_distance = Some(value.into());
        self
    }

    pub fn flight_path<I, S>(mut self, waypoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flight_path = Some(waypoints.into_iter().map(Into::into).collect());
        self
    }

    pub fn min_degree_distance(mut self, v: f64) -> Self {
        self.min_degree_distance = Some(v);
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn has_stations(&self) -> bool {
        self.stations.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// True when a bounding box edge, radial distance or flight path is set.
    pub fn has_spatial_filter(&self) -> bool {
        self.min_lat.is_some()
            || self.max_lat.is_some()
            || self.min_lon.is_some()
            || self.max_lon.is_some()
            || self.radial_distance.is_some()
            || self.flight_path.is_some()
    }

    /// Reject numeric filters the server cannot interpret: non-finite
    /// values, latitudes outside ±90 and longitudes outside ±180.
    pub fn validate(&self) -> Result<(), Error> {
        let bounds = [
            ("minLat", self.min_lat, 90.0),
            ("maxLat", self.max_lat, 90.0),
            ("minLon", self.min_lon, 180.0),
            ("maxLon", self.max_lon, 180.0),
            ("minDegreeDistance", self.min_degree_distance, f64::MAX),
        ];

        for (name, value, limit) in bounds {
            let Some(v) = value else { continue };
            if !v.is_finite() {
                return Err(Error::Configuration(format!("{name} must be a finite number, got {v}")));
            }
            if v.abs() > limit {
                return Err(Error::Configuration(format!(
                    "{name} {v} is out of range (-{limit}..={limit})"
                )));
            }
        }

        Ok(())
    }
}

/// Which TAF timestamp `start_time`/`end_time` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeType {
    Valid,
    Issue,
}

impl TimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeType::Valid => "valid",
            TimeType::Issue => "issue",
        }
    }
}

impl fmt::Display for TimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "valid" => Ok(TimeType::Valid),
            "issue" => Ok(TimeType::Issue),
            _ => Err(Error::Configuration(format!(
                "unknown time type '{s}', expected one of: valid, issue"
            ))),
        }
    }
}

/// How `startTime`/`endTime` are written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeEncoding {
    /// `YYYY-MM-DDTHH:MM:SSZ`.
    #[default]
    Iso8601,
    /// Unix seconds. Deprecated; only honoured for TAF requests.
    UnixEpoch,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetarOptions {
    pub query: StationQuery,
}

impl MetarOptions {
    pub fn new(query: StationQuery) -> Self {
        Self { query }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TafOptions {
    pub query: StationQuery,
    pub time_type: Option<TimeType>,
    pub time_encoding: TimeEncoding,
}

impl TafOptions {
    pub fn new(query: StationQuery) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn time_type(mut self, t: TimeType) -> Self {
        self.time_type = Some(t);
        self
    }

    pub fn time_encoding(mut self, encoding: TimeEncoding) -> Self {
        self.time_encoding = encoding;
        self
    }
}

/// METAR request for the same stations and filters as a TAF request.
///
/// Only the shared filters carry over; `time_type` and the legacy time
/// encoding are TAF-only.
impl From<&TafOptions> for MetarOptions {
    fn from(taf: &TafOptions) -> Self {
        MetarOptions {
            query: taf.query.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_has_every_field_absent() {
        let q = StationQuery::default();
        assert!(q.stations.is_none());
        assert!(q.most_recent.is_none());
        assert!(q.hours_before_now.is_none());
        assert!(!q.has_stations());
        assert!(!q.has_spatial_filter());
    }

    #[test]
    fn empty_station_list_is_present_but_has_no_stations() {
        let q = StationQuery::new().stations(Vec::<String>::new());
        assert_eq!(q.stations, Some(vec![]));
        assert!(!q.has_stations());
    }

    #[test]
    fn bounding_box_is_a_spatial_filter() {
        let q = StationQuery::new().bounding_box(25.0, -130.0, 65.0, -40.0);
        assert!(q.has_spatial_filter());
        assert_eq!(q.min_lon, Some(-130.0));
    }

    #[test]
    fn time_type_parses_case_insensitively() {
        assert_eq!("VALID".parse::<TimeType>().unwrap(), TimeType::Valid);
        assert_eq!("issue".parse::<TimeType>().unwrap(), TimeType::Issue);
        assert!("bulletin".parse::<TimeType>().is_err());
    }

    #[test]
    fn derived_metar_options_keep_shared_filters_only() {
        let taf = TafOptions::new(
            StationQuery::new()
                .stations(["KORD", "PHOG"])
                .most_recent(false)
                .hours_before_now(0),
        )
        .time_type(TimeType::Issue)
        .time_encoding(TimeEncoding::UnixEpoch);

        let metar = MetarOptions::from(&taf);
        assert_eq!(metar.query, taf.query);
        assert_eq!(metar.query.most_recent, Some(false));
    }

    #[test]
    fn validate_accepts_in_range_coordinates() {
        let q = StationQuery::new()
            .bounding_box(-90.0, -180.0, 90.0, 180.0)
            .min_degree_distance(0.5);
        assert!(q.validate().is_ok());
        assert!(StationQuery::new().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_numbers() {
        let q = StationQuery::new().bounding_box(f64::NAN, 0.0, 10.0, 10.0);
        assert!(matches!(q.validate(), Err(Error::Configuration(_))));

        let q = StationQuery::new().min_degree_distance(f64::INFINITY);
        assert!(matches!(q.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_coordinates() {
        let q = StationQuery::new().bounding_box(-91.0, 0.0, 10.0, 10.0);
        assert!(matches!(q.validate(), Err(Error::Configuration(_))));

        let q = StationQuery::new().bounding_box(0.0, 0.0, 10.0, 180.5);
        assert!(matches!(q.validate(), Err(Error::Configuration(_))));
    }
}
