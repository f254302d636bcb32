//! Token refresh over the backend's refresh endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::classify::{Classification, ResponseClassifier};
use crate::http::request::RequestDefaults;
use crate::http::{RequestDescriptor, ResponseType, Transport};
use crate::policy::refresh::TokenRefresher;
use crate::session::{Credential, SessionState};

/// Posts `{ "refreshToken": ... }` to the refresh path and stores the
/// returned `{ token, refreshToken }`.
///
/// Talks to the transport directly: a refresh never goes through the
/// failure policy, so it cannot trigger another refresh.
pub struct HttpTokenRefresher {
    transport: Arc<dyn Transport>,
    defaults: RequestDefaults,
    classifier: ResponseClassifier,
    path: String,
}

impl HttpTokenRefresher {
    pub fn new(
        transport: Arc<dyn Transport>,
        defaults: RequestDefaults,
        classifier: ResponseClassifier,
        path: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            defaults,
            classifier,
            path: path.into(),
        }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, session: &SessionState) -> bool {
        let Some(refresh_token) = session.credential().and_then(|c| c.refresh_token.clone()) else {
            tracing::warn!("No refresh token in session");
            return false;
        };

        let mut descriptor = RequestDescriptor::post(&self.path);
        descriptor.body = Some(json!({ "refreshToken": refresh_token }));

        let prepared = match descriptor.prepare(&self.defaults, session.authorization().as_deref()) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build refresh request");
                return false;
            }
        };
        let request_id = prepared.id;

        let response = match self.transport.send(prepared).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Refresh request failed");
                return false;
            }
        };

        let envelope = match self.classifier.classify(&response, ResponseType::Json) {
            Classification::Success(envelope) => envelope,
            Classification::Binary(_) => return false,
            Classification::Failure(failure) => {
                tracing::warn!(
                    request_id = %request_id,
                    code = %failure.code,
                    "Refresh rejected by backend"
                );
                return false;
            }
        };

        match envelope.into_data::<Credential>() {
            Ok(mut credential) => {
                if credential.refresh_token.is_none() {
                    credential.refresh_token = Some(refresh_token);
                }
                session.update_credential(credential);
                true
            }
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Unexpected refresh payload");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::http::{PreparedRequest, RawResponse, TransportError};
    use reqwest::StatusCode;
    use serde_json::Value;
    use std::sync::Mutex;

    struct Canned {
        body: Value,
        seen: Mutex<Vec<PreparedRequest>>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
            let id = request.id;
            self.seen.lock().unwrap().push(request);
            Ok(RawResponse::json(id, StatusCode::OK, &self.body))
        }
    }

    fn refresher(body: Value) -> (Arc<Canned>, HttpTokenRefresher) {
        let transport = Arc::new(Canned {
            body,
            seen: Mutex::new(Vec::new()),
        });
        let defaults = RequestDefaults::from_config(&ServiceConfig::default()).unwrap();
        let classifier = ResponseClassifier::new(["0000"].into_iter().collect());
        let refresher = HttpTokenRefresher::new(transport.clone(), defaults, classifier, "/auth/refreshToken");
        (transport, refresher)
    }

    #[tokio::test]
    async fn test_stores_new_credential() {
        let (transport, refresher) =
            refresher(json!({"code": "0000", "data": {"token": "new", "refreshToken": "r2"}}));
        let session = SessionState::default();
        session.login(Credential::new("old").with_refresh_token("r1"));

        assert!(refresher.refresh(&session).await);
        assert_eq!(
            *session.credential().unwrap(),
            Credential::new("new").with_refresh_token("r2")
        );

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url.path(), "/auth/refreshToken");
        assert_eq!(seen[0].body, Some(json!({"refreshToken": "r1"})));
    }

    #[tokio::test]
    async fn test_keeps_refresh_token_when_not_rotated() {
        let (_, refresher) = refresher(json!({"code": "0000", "data": {"token": "new"}}));
        let session = SessionState::default();
        session.login(Credential::new("old").with_refresh_token("r1"));

        assert!(refresher.refresh(&session).await);
        assert_eq!(session.credential().unwrap().refresh_token.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_fails_without_refresh_token_or_on_rejection() {
        let (transport, refresher) = refresher(json!({"code": "8888", "msg": "no"}));
        let session = SessionState::default();
        session.login(Credential::new("old"));
        assert!(!refresher.refresh(&session).await);
        assert!(transport.seen.lock().unwrap().is_empty());

        session.login(Credential::new("old").with_refresh_token("r1"));
        assert!(!refresher.refresh(&session).await);
        assert_eq!(session.credential().unwrap().token, "old");
    }
}
