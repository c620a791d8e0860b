use url::Url;

use crate::{
    config::Config,
    error::Result,
    options::{MetarOptions, TafOptions},
    query::EncodeQuery,
    response::{MetarResponse, TafResponse, parse_metars, parse_tafs},
    transport::{HttpTransport, Transport},
};

/// Client for the text data server.
///
/// Each call encodes the options, performs exactly one fetch and decodes
/// the body. Server-reported errors are left in the returned response.
#[derive(Debug, Clone)]
pub struct AvwxClient<T> {
    endpoint: Url,
    transport: T,
}

impl<T: Transport> AvwxClient<T> {
    pub fn new(endpoint: Url, transport: T) -> Self {
        Self { endpoint, transport }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The full request URL for a set of options.
    pub fn request_url<O: EncodeQuery>(&self, options: &O) -> Url {
        options.encode().to_url(&self.endpoint)
    }

    pub async fn get_metars(&self, options: &MetarOptions) -> Result<MetarResponse> {
        let body = self.transport.fetch(&self.request_url(options)).await?;
        parse_metars(&body)
    }

    pub async fn get_tafs(&self, options: &TafOptions) -> Result<TafResponse> {
        let body = self.transport.fetch(&self.request_url(options)).await?;
        parse_tafs(&body)
    }
}

impl AvwxClient<HttpTransport> {
    /// HTTP client for the configured endpoint and timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::new(endpoint, transport))
    }
}
