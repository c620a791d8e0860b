use quick_xml::{Reader, events::Event};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    model::{MetarData, ReportData, TafData, lenient},
};

pub type MetarResponse = Response<MetarData>;
pub type TafResponse = Response<TafData>;

/// A decoded server response.
///
/// A non-empty `errors` list is still a successful parse; use
/// [`Response::ensure_ok`] to turn it into an [`Error::Application`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<D> {
    version: String,
    request_index: i32,
    data_source: String,
    request_type: String,
    errors: Vec<String>,
    warnings: Vec<String>,
    time_taken_ms: i32,
    data: D,
}

impl<D: ReportData> Response<D> {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn request_index(&self) -> i32 {
        self.request_index
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn time_taken_ms(&self) -> i32 {
        self.time_taken_ms
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Records in the order the server returned them.
    pub fn records(&self) -> &[D::Record] {
        self.data.records()
    }

    /// Fails with every server error line, or returns the warnings.
    pub fn ensure_ok(&self) -> Result<&[String]> {
        if self.errors.is_empty() {
            Ok(&self.warnings)
        } else {
            Err(Error::Application(self.errors.clone()))
        }
    }
}

// XML shape of the `<response>` envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "D: ReportData"))]
struct Envelope<D> {
    #[serde(rename = "@version", default)]
    version: String,
    #[serde(default, deserialize_with = "lenient::i32")]
    request_index: i32,
    #[serde(default)]
    data_source: NameAttr,
    #[serde(default)]
    request: TypeAttr,
    #[serde(default)]
    errors: ErrorList,
    #[serde(default)]
    warnings: WarningList,
    #[serde(default, deserialize_with = "lenient::i32")]
    time_taken_ms: i32,
    #[serde(default)]
    data: D,
}

#[derive(Debug, Default, Deserialize)]
struct NameAttr {
    #[serde(rename = "@name", default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct TypeAttr {
    #[serde(rename = "@type", default)]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorList {
    #[serde(default)]
    error: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WarningList {
    #[serde(default)]
    warning: Vec<String>,
}

impl<D> From<Envelope<D>> for Response<D> {
    fn from(env: Envelope<D>) -> Self {
        Self {
            version: env.version,
            request_index: env.request_index,
            data_source: env.data_source.name,
            request_type: env.request.kind,
            errors: trimmed(env.errors.error),
            warnings: trimmed(env.warnings.warning),
            time_taken_ms: env.time_taken_ms,
            data: env.data,
        }
    }
}

fn trimmed(lines: Vec<String>) -> Vec<String> {
    lines.into_iter().map(|l| l.trim().to_string()).collect()
}

/// Decode a server response body for any report kind.
pub fn parse<D: ReportData>(bytes: &[u8]) -> Result<Response<D>> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| Error::MalformedResponse(format!("body is not valid UTF-8: {e}")))?;

    check_root(xml)?;

    let envelope: Envelope<D> = quick_xml::de::from_str(xml)
        .map_err(|e| Error::MalformedResponse(e.to_string()))?;

    Ok(envelope.into())
}

pub fn parse_metars(bytes: &[u8]) -> Result<MetarResponse> {
    parse(bytes)
}

pub fn parse_tafs(bytes: &[u8]) -> Result<TafResponse> {
    parse(bytes)
}

/// The document element must be `<response>`; anything else (an HTML error
/// page, an empty body) is not an envelope at all.
fn check_root(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return if e.name().as_ref() == b"response" {
                    Ok(())
                } else {
                    Err(Error::MalformedResponse(format!(
                        "expected <response> root element, found <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )))
                };
            }
            Ok(Event::Eof) => {
                return Err(Error::MalformedResponse("empty document".to_string()));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::MalformedResponse(e.to_string())),
        }
    }
}
