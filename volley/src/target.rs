//! Preflight collaborator: health probe and bearer-token acquisition.
use crate::error::BenchError;
use crate::executor::error_chain;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};
use url::Url;
use volley_core::{Credentials, HEALTH_PATH, HEALTH_TIMEOUT, LOGIN_PATH, LOGIN_TIMEOUT};

/// An authenticated session against the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    /// The credential pair that produced `token`.
    pub credentials: Credentials,
}

impl Session {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// The system under test, as far as preflight is concerned.
///
/// Both operations are fatal on failure: the benchmark aborts before any scenario runs.
pub trait TargetSystem: Send + Sync {
    fn health(&self) -> impl Future<Output = Result<(), BenchError>> + Send;

    fn authenticate(&self) -> impl Future<Output = Result<Session, BenchError>> + Send;
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

/// [`TargetSystem`] speaking to `GET /health` and `POST /api/auth/login`.
#[derive(Debug, Clone)]
pub struct HttpTarget {
    client: Client,
    base_url: String,
    credentials: Vec<Credentials>,
}

impl HttpTarget {
    pub fn new(base_url: &str, credentials: Vec<Credentials>) -> Result<Self, BenchError> {
        Self::with_client(Client::new(), base_url, credentials)
    }

    pub fn with_client(
        client: Client,
        base_url: &str,
        credentials: Vec<Credentials>,
    ) -> Result<Self, BenchError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn login(&self, credentials: &Credentials) -> Result<Option<String>, reqwest::Error> {
        let res = self
            .client
            .post(self.endpoint(LOGIN_PATH))
            .timeout(LOGIN_TIMEOUT)
            .json(credentials)
            .send()
            .await?;

        if res.status() != StatusCode::OK {
            debug!("Login as {} returned {}", credentials.email, res.status());
            return Ok(None);
        }

        let body: LoginResponse = res.json().await?;
        Ok(body.token.filter(|token| !token.is_empty()))
    }
}

impl TargetSystem for HttpTarget {
    #[instrument(skip_all, fields(base_url = %self.base_url))]
    async fn health(&self) -> Result<(), BenchError> {
        let res = self
            .client
            .get(self.endpoint(HEALTH_PATH))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|err| BenchError::HealthCheck(error_chain(&err)))?;

        match res.status() {
            StatusCode::OK => {
                debug!("Target is healthy");
                Ok(())
            }
            status => Err(BenchError::HealthCheck(format!(
                "{HEALTH_PATH} returned {status}"
            ))),
        }
    }

    #[instrument(skip_all, fields(base_url = %self.base_url))]
    async fn authenticate(&self) -> Result<Session, BenchError> {
        for credentials in &self.credentials {
            match self.login(credentials).await {
                Ok(Some(token)) => {
                    info!("Authenticated as {}", credentials.email);
                    return Ok(Session {
                        token,
                        credentials: credentials.clone(),
                    });
                }
                Ok(None) => debug!("No token issued for {}", credentials.email),
                Err(err) => debug!("Login as {} failed: {}", credentials.email, error_chain(&err)),
            }
        }

        Err(BenchError::Authentication {
            attempted: self.credentials.len(),
        })
    }
}
