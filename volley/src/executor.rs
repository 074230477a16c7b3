//! Single timed HTTP calls.
use reqwest::{Client, Method};
use std::error::Error as StdError;
use std::future::Future;
use std::time::{Duration, Instant};
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};
use volley_core::{HttpMethod, RequestSpec, Sample, DEFAULT_REQUEST_TIMEOUT};

/// Performs exactly one request attempt and reports it as a [`Sample`].
///
/// Implementations must not retry and must not fail: transport problems are expressed as
/// failed samples.
pub trait Executor: Send + Sync + 'static {
    fn execute(&self, request: &RequestSpec) -> impl Future<Output = Sample> + Send;
}

/// [`Executor`] backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    timeout: Duration,
}

impl Default for HttpExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl HttpExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(Client::new(), timeout)
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, request: &RequestSpec) -> Result<u16, reqwest::Error> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), request.url.clone())
            .timeout(self.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder.send().await?;
        let status = res.status().as_u16();
        // NOTE: The body is drained so the sample covers the full response.
        let _ = res.bytes().await?;
        Ok(status)
    }
}

impl Executor for HttpExecutor {
    async fn execute(&self, request: &RequestSpec) -> Sample {
        let start = Instant::now();
        let res = self.send(request).await;
        let elapsed = start.elapsed();

        match res {
            Ok(status) => Sample::from_status(status, elapsed),
            Err(err) => {
                trace!("{} {} failed: {err}", request.method, request.url);
                Sample::transport(error_chain(&err), elapsed)
            }
        }
    }
}

pub(crate) fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Render an error with its sources, `reqwest` keeps the useful part (refused, timed out) there.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
