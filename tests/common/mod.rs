//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tower::ServiceExt;

use udm_sbi::config::UdmConfig;
use udm_sbi::consumer::{EeSubscriptionService, NfRegistration, Registerer};
use udm_sbi::http::{build_router, SbiServer};
use udm_sbi::models::{EeSubscription, PatchItem, ProblemDetails};
use udm_sbi::processor::Processor;
use udm_sbi::{SbiError, SelfContextProvider, UdmContext};

pub const EE_PREFIX: &str = "/nudm-ee/v1";

/// Scripted EE business logic that counts calls.
pub struct StubEeService {
    calls: AtomicUsize,
    pub create: Mutex<Result<Option<EeSubscription>, ProblemDetails>>,
    pub update: Mutex<Result<(), ProblemDetails>>,
    pub delay: Duration,
    pub panic: bool,
    pub last_patch: Mutex<Option<Vec<PatchItem>>>,
}

impl Default for StubEeService {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            create: Mutex::new(Ok(None)),
            update: Mutex::new(Ok(())),
            delay: Duration::ZERO,
            panic: false,
            last_patch: Mutex::new(None),
        }
    }
}

impl StubEeService {
    pub fn creating(subscription: EeSubscription) -> Self {
        let stub = Self::default();
        *stub.create.lock().unwrap() = Ok(Some(subscription));
        stub
    }

    pub fn rejecting(problem: ProblemDetails) -> Self {
        let stub = Self::default();
        *stub.create.lock().unwrap() = Err(problem.clone());
        *stub.update.lock().unwrap() = Err(problem);
        stub
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.panic {
            panic!("stub EE service panic");
        }
    }
}

#[async_trait]
impl EeSubscriptionService for StubEeService {
    async fn create_ee_subscription(
        &self,
        _ue_identity: &str,
        _subscription: EeSubscription,
    ) -> Result<Option<EeSubscription>, ProblemDetails> {
        self.enter().await;
        self.create.lock().unwrap().clone()
    }

    async fn delete_ee_subscription(&self, _ue_identity: &str, _subscription_id: &str) {
        self.enter().await;
    }

    async fn update_ee_subscription(
        &self,
        _ue_identity: &str,
        _subscription_id: &str,
        patch: Vec<PatchItem>,
    ) -> Result<(), ProblemDetails> {
        self.enter().await;
        *self.last_patch.lock().unwrap() = Some(patch);
        self.update.lock().unwrap().clone()
    }
}

/// Registerer that succeeds with a fixed id or fails.
pub struct StubRegisterer {
    pub assigned_id: Option<String>,
    calls: AtomicUsize,
}

impl StubRegisterer {
    pub fn succeeding(id: &str) -> Self {
        Self {
            assigned_id: Some(id.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            assigned_id: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registerer for StubRegisterer {
    async fn register_nf_instance(&self) -> udm_sbi::Result<NfRegistration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.assigned_id {
            Some(id) => Ok(NfRegistration {
                location: Some(format!("http://nrf/nnrf-nfm/v1/nf-instances/{id}")),
                nf_instance_id: id.clone(),
            }),
            None => Err(SbiError::Registration("NRF unreachable".into())),
        }
    }
}

/// Configuration bound to an ephemeral loopback port.
pub fn test_config() -> UdmConfig {
    let mut config = UdmConfig::default();
    config.sbi.bind_address = "127.0.0.1:0".to_string();
    config
}

pub fn router_with(service: Arc<dyn EeSubscriptionService>, oauth2_required: bool) -> Router {
    let config = test_config();
    let context: Arc<dyn SelfContextProvider> =
        Arc::new(UdmContext::new("udm-test", oauth2_required));
    let processor = Arc::new(Processor::new(service, config.security.max_body_size));
    build_router(processor, context, &config)
}

pub fn server_with(
    config: UdmConfig,
    service: Arc<dyn EeSubscriptionService>,
    registerer: Arc<dyn Registerer>,
    context: Arc<UdmContext>,
) -> udm_sbi::Result<SbiServer> {
    let processor = Arc::new(Processor::new(service, config.security.max_body_size));
    SbiServer::new(Arc::new(config), context, registerer, processor)
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// Unsigned access token carrying `scope`, valid for an hour.
pub fn access_token(scope: &str) -> String {
    let exp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() + 3600;
    let claims = serde_json::json!({
        "iss": "nrf-instance",
        "sub": "amf-instance",
        "aud": "UDM",
        "scope": scope,
        "exp": exp,
    });
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        URL_SAFE_NO_PAD.encode(b"signature"),
    )
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
