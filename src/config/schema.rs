//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the UDM SBI
//! endpoint. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the UDM.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UdmConfig {
    /// NF instance id announced to the NRF. Generated when absent.
    pub nf_instance_id: Option<String>,

    /// SBI listener configuration (scheme, bind address, TLS).
    pub sbi: SbiConfig,

    /// URI prefix of each service family.
    pub service_prefixes: ServicePrefixes,

    /// NRF (directory service) settings.
    pub nrf: NrfConfig,

    /// Authorization and request limits.
    pub security: SecurityConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// SBI listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SbiConfig {
    /// `http` or `https`. Anything else is rejected when serving starts.
    pub scheme: String,

    /// Bind address (e.g., "127.0.0.3:8000").
    pub bind_address: String,

    /// IPv4 address announced in the NF profile.
    pub register_ipv4: String,

    /// TLS material, used when `scheme = "https"`.
    pub tls: TlsConfig,
}

impl Default for SbiConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            bind_address: "127.0.0.3:8000".to_string(),
            register_ipv4: "127.0.0.3".to_string(),
            tls: TlsConfig::default(),
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub pem: String,

    /// Path to private key file (PEM).
    pub key: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            pem: "cert/udm.pem".to_string(),
            key: "cert/udm.key".to_string(),
        }
    }
}

/// URI prefix per service family.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicePrefixes {
    pub event_exposure: String,
    pub ue_authentication: String,
    pub ue_context_management: String,
    pub subscriber_data_management: String,
    pub parameter_provision: String,
    pub callback: String,
}

impl Default for ServicePrefixes {
    fn default() -> Self {
        Self {
            event_exposure: "/nudm-ee/v1".to_string(),
            ue_authentication: "/nudm-ueau/v1".to_string(),
            ue_context_management: "/nudm-uecm/v1".to_string(),
            subscriber_data_management: "/nudm-sdm/v2".to_string(),
            parameter_provision: "/nudm-pp/v1".to_string(),
            callback: "/nudm-callback/v1".to_string(),
        }
    }
}

impl ServicePrefixes {
    /// All prefixes with the config key they were read from.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("event_exposure", &self.event_exposure),
            ("ue_authentication", &self.ue_authentication),
            ("ue_context_management", &self.ue_context_management),
            ("subscriber_data_management", &self.subscriber_data_management),
            ("parameter_provision", &self.parameter_provision),
            ("callback", &self.callback),
        ]
    }
}

/// NRF configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NrfConfig {
    /// NRF base URI (e.g., "http://127.0.0.10:8000").
    pub uri: String,

    /// Timeout of a single registration request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for NrfConfig {
    fn default() -> Self {
        Self {
            uri: "http://127.0.0.10:8000".to_string(),
            request_timeout_secs: 5,
        }
    }
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Require an OAuth2 bearer token on authorized service families.
    pub oauth2_required: bool,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            oauth2_required: false,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Graceful shutdown bound in milliseconds.
    pub shutdown_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { shutdown_ms: 2000 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
