//! Benchmark orchestration: preflight, then every scenario in order.
use crate::error::BenchError;
use crate::executor::{Executor, HttpExecutor};
use crate::scenario::run_scenario;
use crate::stats::aggregate;
use crate::target::{HttpTarget, Session, TargetSystem};
use reqwest::Client;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};
use volley_core::{
    Credentials, RequestSpec, RunSettings, ScenarioDefinition, ScenarioResult, ScenarioTemplate,
    TemplateBody, DEFAULT_REQUEST_TIMEOUT,
};

/// Everything needed to run a benchmark against an HTTP target.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub base_url: String,
    pub settings: RunSettings,
    /// Tried in order during preflight until one yields a token.
    pub credentials: Vec<Credentials>,
    pub request_timeout: Duration,
}

impl BenchConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            settings: RunSettings::default(),
            credentials: vec![],
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn requests(mut self, request_count: usize) -> Self {
        self.settings.request_count = request_count;
        self
    }

    pub fn concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.settings.concurrency = concurrency;
        self
    }

    pub fn warmup(mut self, warmup_count: usize) -> Self {
        self.settings.warmup_count = warmup_count;
        self
    }

    pub fn credential(mut self, credentials: Credentials) -> Self {
        self.credentials.push(credentials);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Runs scenario templates against a target, one scenario at a time.
pub struct Benchmark<T, E> {
    base_url: String,
    settings: RunSettings,
    target: T,
    executor: Arc<E>,
}

impl Benchmark<HttpTarget, HttpExecutor> {
    pub fn new(config: BenchConfig) -> Result<Self, BenchError> {
        let client = Client::new();
        let target = HttpTarget::with_client(client.clone(), &config.base_url, config.credentials)?;
        let executor = HttpExecutor::with_client(client, config.request_timeout);
        Ok(Self::with_parts(
            &config.base_url,
            config.settings,
            target,
            executor,
        ))
    }
}

impl<T, E> Benchmark<T, E>
where
    T: TargetSystem,
    E: Executor,
{
    pub fn with_parts(base_url: &str, settings: RunSettings, target: T, executor: E) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            settings,
            target,
            executor: Arc::new(executor),
        }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Run the preflight checks, then every template in order.
    ///
    /// Only preflight (and template resolution) can fail the run. Failing requests within a
    /// scenario are reported through its [`ScenarioResult`].
    #[instrument(name = "benchmark", skip_all, fields(base_url = %self.base_url))]
    pub async fn run(&self, templates: &[ScenarioTemplate]) -> Result<Vec<ScenarioResult>, BenchError> {
        info!("Base URL: {}", self.base_url);
        self.target.health().await?;
        let session = self.target.authenticate().await?;

        let definitions = templates
            .iter()
            .map(|template| self.resolve(template, &session))
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(definitions.len());
        for definition in &definitions {
            info!(
                "[RUN] {} -> {} {}",
                definition.name, definition.request.method, definition.request.url
            );
            let batch = run_scenario(self.executor.clone(), definition).await?;
            let result = aggregate(definition, &batch);
            info!("{}", result.summary_line());
            results.push(result);
        }

        Ok(results)
    }

    /// Turn a template into a concrete scenario for this run.
    pub fn resolve(
        &self,
        template: &ScenarioTemplate,
        session: &Session,
    ) -> Result<ScenarioDefinition, BenchError> {
        let url = template.url(&self.base_url)?;
        let mut request = RequestSpec::new(template.method, url);

        if template.authenticated {
            request = request.header("Authorization", session.bearer());
        }

        request.body = match &template.body {
            Some(TemplateBody::Json(value)) => Some(value.clone()),
            Some(TemplateBody::Credentials) => Some(serde_json::json!({
                "email": session.credentials.email,
                "password": session.credentials.password,
            })),
            None => None,
        };

        Ok(ScenarioDefinition::new(
            template.name.clone(),
            request,
            &self.settings,
        ))
    }
}
