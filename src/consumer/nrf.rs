//! NRF NF management client (Nnrf_NFManagement NFRegister).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::LOCATION, StatusCode};
use serde::Serialize;

use crate::config::UdmConfig;
use crate::consumer::{NfRegistration, Registerer};
use crate::context::{SelfContextProvider, ServiceName};
use crate::error::{Result, SbiError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NfService {
    service_instance_id: String,
    service_name: &'static str,
    scheme: String,
    nf_service_status: &'static str,
}

/// Minimal NF profile sent with NFRegister.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NfProfile {
    nf_instance_id: String,
    nf_type: &'static str,
    nf_status: &'static str,
    ipv4_addresses: Vec<String>,
    nf_services: Vec<NfService>,
}

/// Registers the UDM with the NRF over HTTP.
pub struct NrfClient {
    nrf_uri: String,
    scheme: String,
    register_ipv4: String,
    context: Arc<dyn SelfContextProvider>,
    client: reqwest::Client,
}

impl NrfClient {
    pub fn new(config: &UdmConfig, context: Arc<dyn SelfContextProvider>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.nrf.request_timeout_secs))
            .build()?;

        Ok(Self {
            nrf_uri: config.nrf.uri.trim_end_matches('/').to_string(),
            scheme: config.sbi.scheme.clone(),
            register_ipv4: config.sbi.register_ipv4.clone(),
            context,
            client,
        })
    }

    fn profile(&self, nf_instance_id: &str) -> NfProfile {
        NfProfile {
            nf_instance_id: nf_instance_id.to_string(),
            nf_type: "UDM",
            nf_status: "REGISTERED",
            ipv4_addresses: vec![self.register_ipv4.clone()],
            nf_services: ServiceName::ALL
                .iter()
                .enumerate()
                .map(|(i, service)| NfService {
                    service_instance_id: i.to_string(),
                    service_name: service.as_str(),
                    scheme: self.scheme.clone(),
                    nf_service_status: "REGISTERED",
                })
                .collect(),
        }
    }
}

/// Last path segment of an NRF `Location` header.
fn instance_id_from_location(location: &str) -> Option<&str> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

#[async_trait]
impl Registerer for NrfClient {
    async fn register_nf_instance(&self) -> Result<NfRegistration> {
        let nf_instance_id = self.context.nf_instance_id();
        let uri = format!("{}/nnrf-nfm/v1/nf-instances/{}", self.nrf_uri, nf_instance_id);

        tracing::info!(uri = %uri, "Registering NF instance with NRF");

        let response = self
            .client
            .put(&uri)
            .json(&self.profile(&nf_instance_id))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(SbiError::Registration(format!("NRF answered {status}: {body}")));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let assigned = location
            .as_deref()
            .and_then(instance_id_from_location)
            .unwrap_or(&nf_instance_id)
            .to_string();

        Ok(NfRegistration {
            location,
            nf_instance_id: assigned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::UdmContext;
    use axum::{extract::Path, http::HeaderMap, routing::put, Json, Router};

    #[test]
    fn location_parsing() {
        assert_eq!(
            instance_id_from_location("http://nrf/nnrf-nfm/v1/nf-instances/abc"),
            Some("abc")
        );
        assert_eq!(instance_id_from_location("http://nrf/nf-instances/abc/"), Some("abc"));
        assert_eq!(instance_id_from_location(""), None);
    }

    async fn spawn_nrf(status: StatusCode) -> String {
        let app = Router::new().route(
            "/nnrf-nfm/v1/nf-instances/{id}",
            put(move |Path(id): Path<String>, Json(profile): Json<serde_json::Value>| async move {
                assert_eq!(profile["nfType"], "UDM");
                assert_eq!(profile["nfInstanceId"], id.as_str());
                let mut headers = HeaderMap::new();
                headers.insert(
                    LOCATION,
                    format!("http://nrf/nnrf-nfm/v1/nf-instances/{id}").parse().unwrap(),
                );
                (status, headers, Json(profile))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(uri: String) -> NrfClient {
        let mut config = UdmConfig::default();
        config.nrf.uri = uri;
        NrfClient::new(&config, Arc::new(UdmContext::new("udm-nf-1", false))).unwrap()
    }

    #[tokio::test]
    async fn registers_and_reads_location() {
        let client = client_for(spawn_nrf(StatusCode::CREATED).await);
        let registration = client.register_nf_instance().await.unwrap();
        assert_eq!(registration.nf_instance_id, "udm-nf-1");
        assert!(registration.location.unwrap().ends_with("/nf-instances/udm-nf-1"));
    }

    #[tokio::test]
    async fn rejected_registration_is_an_error() {
        let client = client_for(spawn_nrf(StatusCode::FORBIDDEN).await);
        let err = client.register_nf_instance().await.unwrap_err();
        assert!(matches!(err, SbiError::Registration(_)));
    }
}
