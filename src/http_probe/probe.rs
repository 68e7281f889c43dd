use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::prelude::*;

const USER_AGENT: &str = concat!("oxywatch/", env!("CARGO_PKG_VERSION"));

/// Fetches a target URL.
///
/// `Ok(None)` means the probe neither produced a response nor an error. The
/// tracker reports that as a "null response" failure.
#[async_trait]
pub trait Prober {
    async fn probe(&self, url: &str) -> Result<Option<ProbeResponse>, ProbeError>;
}

/// Prober backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Build the prober. Without a timeout the client default applies.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Result<Option<ProbeResponse>, ProbeError> {
        log::debug!("Ping: {url}");
        let to_error = |source| ProbeError {
            url: url.to_string(),
            source,
        };

        let start = Instant::now();
        let response = self.client.get(url).send().await.map_err(to_error)?;
        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(to_error)?;

        log::trace!(
            "{url} answered {status_code} with {} bytes in {:.2}ms",
            body.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Some(ProbeResponse { status_code, body }))
    }
}
