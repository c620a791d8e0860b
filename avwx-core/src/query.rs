use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use url::Url;

use crate::{
    options::{MetarOptions, StationQuery, TafOptions, TimeEncoding},
    time::format_iso8601,
};

/// The `dataSource` a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Metars,
    Tafs,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Metars => "metars",
            ReportKind::Tafs => "tafs",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for one request, ordered by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    inner: BTreeMap<&'static str, String>,
}

impl QueryParams {
    fn base(kind: ReportKind) -> Self {
        let mut inner = BTreeMap::new();
        inner.insert("dataSource", kind.as_str().to_string());
        inner.insert("requestType", "retrieve".to_string());
        inner.insert("format", "xml".to_string());
        Self { inner }
    }

    fn set(&mut self, key: &'static str, value: String) {
        self.inner.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.inner.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Append the parameters to `endpoint`, form-urlencoding the values.
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut().extend_pairs(self.iter());
        url
    }
}

/// Maps a typed option set onto server query parameters.
pub trait EncodeQuery {
    const KIND: ReportKind;

    fn encode(&self) -> QueryParams;
}

impl EncodeQuery for MetarOptions {
    const KIND: ReportKind = ReportKind::Metars;

    fn encode(&self) -> QueryParams {
        let mut params = QueryParams::base(Self::KIND);
        encode_station_query(&mut params, &self.query, TimeEncoding::Iso8601);
        params
    }
}

impl EncodeQuery for TafOptions {
    const KIND: ReportKind = ReportKind::Tafs;

    fn encode(&self) -> QueryParams {
        let mut params = QueryParams::base(Self::KIND);
        encode_station_query(&mut params, &self.query, self.time_encoding);
        if let Some(t) = self.time_type {
            params.set("timeType", t.as_str().to_string());
        }
        params
    }
}

fn encode_station_query(params: &mut QueryParams, q: &StationQuery, times: TimeEncoding) {
    if let Some(stations) = &q.stations {
        params.set("stationString", stations.join(" "));
    }
    if let Some(t) = &q.start_time {
        params.set("startTime", encode_time(t, times));
    }
    if let Some(t) = &q.end_time {
        params.set("endTime", encode_time(t, times));
    }
    if let Some(h) = q.hours_before_now {
        params.set("hoursBeforeNow", h.to_string());
    }
    if let Some(v) = q.most_recent {
        params.set("mostRecent", v.to_string());
    }
    if let Some(v) = q.most_recent_for_each_station {
        params.set("mostRecentForEachStation", v.to_string());
    }
    if let Some(v) = q.min_lat {
        params.set("minLat", encode_float(v));
    }
    if let Some(v) = q.max_lat {
        params.set("maxLat", encode_float(v));
    }
    if let Some(v) = q.min_lon {
        params.set("minLon", encode_float(v));
    }
    if let Some(v) = q.max_lon {
        params.set("maxLon", encode_float(v));
    }
    if let Some(r) = &q.radial_distance {
        params.set("radialDistance", r.clone());
    }
    if let Some(path) = &q.flight_path {
        params.set("flightPath", path.join(" "));
    }
    if let Some(v) = q.min_degree_distance {
        params.set("minDegreeDistance", encode_float(v));
    }
    if let Some(fields) = &q.fields {
        params.set("fields", fields.join(" "));
    }
}

fn encode_time(t: &DateTime<Utc>, encoding: TimeEncoding) -> String {
    match encoding {
        TimeEncoding::Iso8601 => format_iso8601(t),
        TimeEncoding::UnixEpoch => t.timestamp().to_string(),
    }
}

// `Display` for f64 is the shortest representation that round-trips.
fn encode_float(v: f64) -> String {
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TimeType;
    use chrono::TimeZone;

    const FIXED_KEYS: [&str; 3] = ["dataSource", "format", "requestType"];

    #[test]
    fn empty_options_emit_only_fixed_keys() {
        let params = MetarOptions::default().encode();
        assert_eq!(params.keys().collect::<Vec<_>>(), FIXED_KEYS);
        assert_eq!(params.get("dataSource"), Some("metars"));
        assert_eq!(params.get("requestType"), Some("retrieve"));
        assert_eq!(params.get("format"), Some("xml"));
    }

    #[test]
    fn falsy_values_are_emitted_when_present() {
        let query = StationQuery::new()
            .stations(Vec::<String>::new())
            .hours_before_now(0)
            .most_recent(false)
            .most_recent_for_each_station(false)
            .min_degree_distance(0.0)
            .fields(Vec::<String>::new());
        let params = MetarOptions::new(query).encode();

        assert_eq!(params.get("stationString"), Some(""));
        assert_eq!(params.get("hoursBeforeNow"), Some("0"));
        assert_eq!(params.get("mostRecent"), Some("false"));
        assert_eq!(params.get("mostRecentForEachStation"), Some("false"));
        assert_eq!(params.get("minDegreeDistance"), Some("0"));
        assert_eq!(params.get("fields"), Some(""));
        assert_eq!(params.len(), FIXED_KEYS.len() + 6);
    }

    #[test]
    fn absent_fields_produce_no_keys() {
        let params = MetarOptions::new(StationQuery::new().most_recent(true)).encode();
        assert_eq!(params.get("mostRecent"), Some("true"));
        for key in ["stationString", "startTime", "hoursBeforeNow", "minLat", "flightPath", "fields"] {
            assert!(!params.contains_key(key), "unexpected key {key}");
        }
    }

    #[test]
    fn floats_use_shortest_representation() {
        let query = StationQuery::new()
            .bounding_box(25.5, -130.0, 65.125, -40.0)
            .min_degree_distance(0.1);
        let params = MetarOptions::new(query).encode();

        assert_eq!(params.get("minLat"), Some("25.5"));
        assert_eq!(params.get("minLon"), Some("-130"));
        assert_eq!(params.get("maxLat"), Some("65.125"));
        assert_eq!(params.get("maxLon"), Some("-40"));
        assert_eq!(params.get("minDegreeDistance"), Some("0.1"));
    }

    #[test]
    fn sequences_are_space_joined() {
        let query = StationQuery::new()
            .stations(["KORD", "PH*", "@il", "~au"])
            .flight_path(["KDEN", "KORD"])
            .fields(["raw_text", "station_id"]);
        let params = MetarOptions::new(query).encode();

        assert_eq!(params.get("stationString"), Some("KORD PH* @il ~au"));
        assert_eq!(params.get("flightPath"), Some("KDEN KORD"));
        assert_eq!(params.get("fields"), Some("raw_text station_id"));
    }

    #[test]
    fn station_list_survives_url_encoding() {
        let endpoint = Url::parse("https://example.test/httpparam").unwrap();
        let params = MetarOptions::new(StationQuery::new().stations(["KORD", "PHOG"])).encode();
        let url = params.to_url(&endpoint);

        let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let stations = decoded
            .iter()
            .find(|(k, _)| k == "stationString")
            .map(|(_, v)| v.as_str());
        assert_eq!(stations, Some("KORD PHOG"));
        assert_eq!(decoded.len(), params.len());
    }

    #[test]
    fn encoding_is_deterministic() {
        let opts = TafOptions::new(
            StationQuery::new()
                .stations(["KORD"])
                .hours_before_now(6)
                .radial_distance("20;-104.5,39.5"),
        )
        .time_type(TimeType::Valid);

        let endpoint = Url::parse("https://example.test/httpparam").unwrap();
        assert_eq!(opts.encode(), opts.encode());
        assert_eq!(opts.encode().to_url(&endpoint), opts.encode().to_url(&endpoint));
    }

    #[test]
    fn timestamps_are_iso8601_utc() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let params = MetarOptions::new(StationQuery::new().start_time(start).end_time(end)).encode();

        assert_eq!(params.get("startTime"), Some("2024-03-01T06:00:00Z"));
        assert_eq!(params.get("endTime"), Some("2024-03-01T12:00:00Z"));
    }

    #[test]
    fn taf_epoch_encoding_writes_unix_seconds() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        let opts = TafOptions::new(StationQuery::new().start_time(start))
            .time_encoding(TimeEncoding::UnixEpoch);

        assert_eq!(opts.encode().get("startTime"), Some("1709272800"));
    }

    #[test]
    fn time_type_only_for_tafs() {
        let taf = TafOptions::new(StationQuery::new().stations(["KORD"])).time_type(TimeType::Issue);
        assert_eq!(taf.encode().get("timeType"), Some("issue"));
        assert_eq!(taf.encode().get("dataSource"), Some("tafs"));

        let metar = MetarOptions::from(&taf).encode();
        assert!(!metar.contains_key("timeType"));
        assert_eq!(metar.get("dataSource"), Some("metars"));
    }

    #[test]
    fn keys_are_sorted() {
        let params = TafOptions::new(
            StationQuery::new()
                .stations(["KORD"])
                .most_recent(true)
                .hours_before_now(3),
        )
        .encode();
        let keys: Vec<_> = params.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }
}
