use std::fmt;

use crate::{
    error::{Error, Result},
    model::{Report, ReportData},
    query::ReportKind,
    response::Response,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// One raw report per line.
    RawText,
    /// Raw TAF text with each `FM` group on its own indented line.
    RawTextPretty,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::RawText => "rawtextonly",
            OutputFormat::RawTextPretty => "rawtextonly-pretty",
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
        }
    }

    pub fn supports(&self, kind: ReportKind) -> bool {
        !matches!((self, kind), (OutputFormat::RawTextPretty, ReportKind::Metars))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Break a raw TAF before every ` FM` group.
///
/// This is a literal substring rewrite applied once to every match, not a
/// TAF grammar parse.
pub fn prettify_taf(raw: &str) -> String {
    raw.replace(" FM", "\n  FM")
}

pub fn raw_text_lines<D: ReportData>(response: &Response<D>) -> Vec<&str> {
    response
        .records()
        .iter()
        .map(<D::Record as Report>::raw_text)
        .collect()
}

/// Render a response. The caller is expected to have checked
/// [`Response::ensure_ok`] first.
pub fn render<D: ReportData>(response: &Response<D>, format: OutputFormat) -> Result<String> {
    let kind = <D::Record as Report>::KIND;
    if !format.supports(kind) {
        return Err(Error::Configuration(format!(
            "output format '{format}' is not available for {kind}"
        )));
    }

    match format {
        OutputFormat::RawText => Ok(raw_text_lines(response).join("\n")),
        OutputFormat::RawTextPretty => Ok(raw_text_lines(response)
            .into_iter()
            .map(prettify_taf)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string(response)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(response)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{parse_metars, parse_tafs};

    const METARS: &str = include_str!("testdata/metars_kord_phog.xml");
    const TAFS: &str = include_str!("testdata/tafs_kord.xml");

    #[test]
    fn raw_text_is_newline_joined_in_server_order() {
        let resp = parse_metars(METARS.as_bytes()).unwrap();
        let out = render(&resp, OutputFormat::RawText).unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("KORD "));
        assert!(lines[1].starts_with("PHOG "));
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn prettify_breaks_each_fm_group_once() {
        let raw = "TAF KORD 011720Z 0118/0224 27012KT P6SM BKN250 FM1200 28010KT FM1800 VRB05KT";
        let pretty = prettify_taf(raw);

        assert_eq!(
            pretty,
            "TAF KORD 011720Z 0118/0224 27012KT P6SM BKN250\n  FM1200 28010KT\n  FM1800 VRB05KT"
        );
        assert_eq!(pretty.matches("\n  FM").count(), 2);
        // A second pass finds the " FM" inside each "\n  FM" and indents again.
        assert_ne!(prettify_taf(&pretty), pretty);
    }

    #[test]
    fn pretty_taf_projection() {
        let resp = parse_tafs(TAFS.as_bytes()).unwrap();
        let out = render(&resp, OutputFormat::RawTextPretty).unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("TAF KORD"));
        assert!(lines[1].starts_with("  FM012200"));
        assert!(lines[2].starts_with("  FM020600"));
        assert!(lines[2].contains("TEMPO 0212/0216"));
    }

    #[test]
    fn pretty_is_rejected_for_metars() {
        let resp = parse_metars(METARS.as_bytes()).unwrap();
        let err = render(&resp, OutputFormat::RawTextPretty).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn json_and_pretty_json_are_the_same_document() {
        let resp = parse_tafs(TAFS.as_bytes()).unwrap();
        let compact = render(&resp, OutputFormat::Json).unwrap();
        let pretty = render(&resp, OutputFormat::JsonPretty).unwrap();

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));

        let a: serde_json::Value = serde_json::from_str(&compact).unwrap();
        let b: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
        assert_eq!(a["data"]["tafs"][0]["station_id"], "KORD");
        assert_eq!(a["warnings"][0], "Station PHXX not found");
    }

    #[test]
    fn json_uses_plain_attribute_names() {
        let resp = parse_metars(METARS.as_bytes()).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&render(&resp, OutputFormat::Json).unwrap()).unwrap();

        let layer = &v["data"]["metars"][0]["sky_condition"][0];
        assert_eq!(layer["sky_cover"], "FEW");
        assert_eq!(layer["cloud_base_ft_agl"], 4500);
        assert!(layer.get("cloud_type").is_none());
        assert_eq!(v["data"]["num_results"], 2);
        assert_eq!(v["data"]["metars"][1]["maxT_c"], 27.2);
    }
}
