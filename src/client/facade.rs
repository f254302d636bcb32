//! The request façade.
//!
//! # Responsibilities
//! - Attach the current credential to every exchange, replay included
//! - Run every response through the classifier and the failure policy
//! - Offer three call conventions over one pipeline:
//!   `request` (payload only), `request_raw` (whole envelope) and
//!   `request_bytes` (undecoded body, for downloads)
//!
//! # Design Decisions
//! - The conventions differ only in the success shape passed to `execute`
//! - The descriptor's response type picks how the body is classified
//! - Transport failures skip the policy entirely; they never log anyone out

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::classify::{BackendEnvelope, Classification, ResponseClassifier};
use crate::client::error::{Reply, RequestError, RequestResult};
use crate::config::{CodeBook, ConfigError, ConsoleConfig, ValidationError};
use crate::http::request::RequestDefaults;
use crate::http::{RequestDescriptor, RequestId, ReqwestTransport, ResponseType, Transport, TransportError};
use crate::notify::{NotificationGate, Presenter, TerminalPresenter};
use crate::observability::metrics;
use crate::policy::{
    Attempt, FailureCategory, FailureContext, HttpTokenRefresher, PolicyEngine, RefreshCoordinator,
    Resolution, TokenRefresher,
};
use crate::session::{Credential, SessionState};

/// Successful response body, before the calling convention shapes it.
enum SuccessBody {
    Envelope(BackendEnvelope<Value>),
    Bytes(Vec<u8>),
}

/// Entry point for every backend call.
pub struct RequestClient {
    defaults: RequestDefaults,
    transport: Arc<dyn Transport>,
    classifier: ResponseClassifier,
    session: Arc<SessionState>,
    gate: Arc<NotificationGate>,
    engine: PolicyEngine,
}

impl RequestClient {
    pub fn builder(config: ConsoleConfig) -> RequestClientBuilder {
        RequestClientBuilder::new(config)
    }

    /// Unwrapping convention: the `data` payload on success.
    pub async fn request<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> RequestResult<T> {
        self.execute(descriptor, |body| match body {
            SuccessBody::Envelope(envelope) => envelope.into_data::<T>(),
            SuccessBody::Bytes(bytes) => serde_json::from_slice(&bytes),
        })
        .await
    }

    /// Raw convention: the whole envelope on success, for callers that need
    /// the code or message alongside the payload.
    pub async fn request_raw<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> RequestResult<BackendEnvelope<T>> {
        self.execute(descriptor, |body| match body {
            SuccessBody::Envelope(envelope) => envelope.into_typed::<T>(),
            SuccessBody::Bytes(bytes) => serde_json::from_slice(&bytes),
        })
        .await
    }

    /// Download convention: the response body as sent, for file exports.
    /// Failures still go through the policy, so a logout or expired token
    /// during a download is handled like any other call.
    pub async fn request_bytes(&self, descriptor: RequestDescriptor) -> RequestResult<Vec<u8>> {
        let descriptor = descriptor.response_type(ResponseType::Bytes);
        self.execute(descriptor, |body| match body {
            SuccessBody::Bytes(bytes) => Ok(bytes),
            SuccessBody::Envelope(envelope) => serde_json::to_vec(&envelope),
        })
        .await
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    pub fn login(&self, credential: Credential) {
        self.session.login(credential);
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    async fn execute<O, S>(&self, descriptor: RequestDescriptor, shape: S) -> RequestResult<O>
    where
        S: Fn(SuccessBody) -> Result<O, serde_json::Error>,
    {
        let started = Instant::now();
        let method = descriptor.method.as_str().to_string();

        let result = self.run(&descriptor, shape).await;

        let outcome = match &result {
            Ok(Reply::Data(_)) => "ok",
            Ok(Reply::Abandoned(_)) => "abandoned",
            Err(RequestError::Backend { .. }) => "backend_error",
            Err(RequestError::Transport(_)) => "transport_error",
            Err(RequestError::Decode(_)) => "decode_error",
        };
        metrics::record_request(&method, outcome, started);

        result
    }

    async fn run<O, S>(&self, descriptor: &RequestDescriptor, shape: S) -> RequestResult<O>
    where
        S: Fn(SuccessBody) -> Result<O, serde_json::Error>,
    {
        let mut attempt = Attempt::Initial;

        loop {
            let sent_credential = self.session.credential();
            let authorization = sent_credential
                .as_ref()
                .map(|c| format!("{} {}", self.session.scheme(), c.token));

            let prepared = descriptor
                .prepare(&self.defaults, authorization.as_deref())
                .map_err(|e| self.transport_failure(e, descriptor))?;
            let request_id = prepared.id;

            tracing::debug!(
                request_id = %request_id,
                method = %prepared.method,
                url = %prepared.url,
                attempt = ?attempt,
                "Dispatching request"
            );

            let response = self
                .transport
                .send(prepared)
                .await
                .map_err(|e| self.transport_failure(e, descriptor))?;

            let body = match self.classifier.classify(&response, descriptor.response_type) {
                Classification::Success(envelope) => Ok(SuccessBody::Envelope(envelope)),
                Classification::Binary(bytes) => Ok(SuccessBody::Bytes(bytes)),
                Classification::Failure(failure) => Err(failure),
            };
            let failure = match body {
                Ok(body) => return self.shaped(request_id, body, &shape),
                Err(failure) => failure,
            };

            let ctx = FailureContext {
                request_id,
                failure,
                sent_credential,
                attempt,
                skip_error_handler: descriptor.skip_error_handler,
            };

            match self.engine.resolve(ctx).await {
                Resolution::Abandon(reason) => return Ok(Reply::Abandoned(reason)),
                Resolution::Replay => {
                    tracing::debug!(request_id = %request_id, "Replaying with refreshed credential");
                    attempt = Attempt::Replay;
                }
                Resolution::Fail(failure) => {
                    return Err(RequestError::Backend {
                        code: failure.code,
                        message: failure.message,
                        category: FailureCategory::Generic,
                    });
                }
            }
        }
    }

    fn shaped<O, S>(&self, request_id: RequestId, body: SuccessBody, shape: &S) -> RequestResult<O>
    where
        S: Fn(SuccessBody) -> Result<O, serde_json::Error>,
    {
        let data = shape(body).map_err(|e| {
            tracing::warn!(request_id = %request_id, error = %e, "Payload does not match expected type");
            RequestError::Decode(e)
        })?;
        Ok(Reply::Data(data))
    }

    fn transport_failure(&self, error: TransportError, descriptor: &RequestDescriptor) -> RequestError {
        tracing::warn!(url = %descriptor.url, error = %error, "Request did not complete");
        metrics::record_failure("transport");
        if !descriptor.skip_error_handler {
            self.gate.report(&error.to_string());
        }
        RequestError::Transport(error)
    }
}

/// Wires a `RequestClient` from configuration plus optional collaborators.
pub struct RequestClientBuilder {
    config: ConsoleConfig,
    transport: Option<Arc<dyn Transport>>,
    presenter: Option<Arc<dyn Presenter>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    session: Option<Arc<SessionState>>,
}

impl RequestClientBuilder {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            transport: None,
            presenter: None,
            refresher: None,
            session: None,
        }
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Share an existing session instead of starting an empty one.
    pub fn session(mut self, session: Arc<SessionState>) -> Self {
        self.session = Some(session);
        self
    }

    /// Validate the configuration and assemble the pipeline.
    pub fn build(self) -> Result<RequestClient, ConfigError> {
        crate::config::validate_config(&self.config).map_err(ConfigError::Validation)?;

        let codes = Arc::new(CodeBook::from_config(&self.config.service).map_err(ConfigError::Validation)?);
        let defaults = RequestDefaults::from_config(&self.config.service).map_err(|e| {
            ConfigError::Validation(vec![ValidationError::InvalidBaseUrl {
                url: self.config.service.base_url.clone(),
                reason: e.to_string(),
            }])
        })?;
        let classifier = ResponseClassifier::new(codes.success.clone());

        let session = self
            .session
            .unwrap_or_else(|| Arc::new(SessionState::new(self.config.auth.scheme.clone())));
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()) as Arc<dyn Transport>);
        let presenter = self
            .presenter
            .unwrap_or_else(|| Arc::new(TerminalPresenter) as Arc<dyn Presenter>);
        let refresher = self.refresher.unwrap_or_else(|| {
            Arc::new(HttpTokenRefresher::new(
                Arc::clone(&transport),
                defaults.clone(),
                classifier.clone(),
                self.config.auth.refresh_path.clone(),
            )) as Arc<dyn TokenRefresher>
        });

        let gate = Arc::new(NotificationGate::new(
            Arc::clone(&session),
            Arc::clone(&presenter),
            self.config.notify.fallback_message.clone(),
        ));
        let refresh = RefreshCoordinator::new(refresher, Arc::clone(&session));
        let engine = PolicyEngine::new(
            codes,
            Arc::clone(&session),
            presenter,
            Arc::clone(&gate),
            refresh,
            self.config.notify.modal_title.clone(),
        );

        tracing::info!(
            base_url = %defaults.base_url,
            timeout_ms = defaults.timeout.as_millis() as u64,
            "Request client ready"
        );

        Ok(RequestClient {
            defaults,
            transport,
            classifier,
            session,
            gate,
            engine,
        })
    }
}
