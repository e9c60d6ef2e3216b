use std::time::Duration;

use reqwest::{
    blocking::{Client, Response},
    header::CONTENT_TYPE,
};
use scroller_core::{MapModel, SelectionReport};
use tracing::debug;

use crate::{DataSource, Endpoints, NetworkError, SelectionSink};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP client for the configured endpoints.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    endpoints: Endpoints,
}

impl HttpClient {
    /// Creates a client with five second connect and ten second read timeouts.
    pub fn new(endpoints: Endpoints) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(READ_TIMEOUT)
            .user_agent(concat!("scroller/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, endpoints))
    }

    /// Wraps a preconfigured client, e.g. one with custom proxy settings.
    #[must_use]
    pub fn with_client(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Endpoints targeted by this client.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn get(&self, url: &str) -> Result<Response, NetworkError> {
        debug!(url, "GET");
        let response = self.client.get(url).send()?;
        ensure_success(url, response)
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response, NetworkError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(NetworkError::Status {
            url: url.to_owned(),
            status: status.as_u16(),
        })
    }
}

impl DataSource for HttpClient {
    fn fetch_map(&self) -> Result<MapModel, NetworkError> {
        let body = self.get(&self.endpoints.map_url)?.text()?;
        Ok(MapModel::parse_csv(&body)?)
    }

    fn fetch_sprite(&self) -> Result<Vec<u8>, NetworkError> {
        let bytes = self.get(&self.endpoints.sprite_url)?.bytes()?;
        Ok(bytes.to_vec())
    }
}

impl SelectionSink for HttpClient {
    fn notify(&self, report: &SelectionReport) -> Result<(), NetworkError> {
        let url = self.endpoints.report_url.as_str();
        let body = serde_json::to_vec(report)?;
        debug!(url, x = report.x, y = report.y, "POST selection");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        let _ = ensure_success(url, response)?;
        Ok(())
    }
}
