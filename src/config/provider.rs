//! Read-only view of the configuration consumed by the SBI server.

use std::path::Path;
use std::time::Duration;

use crate::config::schema::{ServicePrefixes, UdmConfig};

/// Configuration capabilities the server and router depend on.
pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn scheme(&self) -> &str;
    fn cert_pem_path(&self) -> &Path;
    fn cert_key_path(&self) -> &Path;
    fn service_prefixes(&self) -> &ServicePrefixes;
    fn max_body_size(&self) -> usize;
    fn shutdown_timeout(&self) -> Duration;
}

impl ConfigProvider for UdmConfig {
    fn bind_address(&self) -> &str {
        &self.sbi.bind_address
    }

    fn scheme(&self) -> &str {
        &self.sbi.scheme
    }

    fn cert_pem_path(&self) -> &Path {
        Path::new(&self.sbi.tls.pem)
    }

    fn cert_key_path(&self) -> &Path {
        Path::new(&self.sbi.tls.key)
    }

    fn service_prefixes(&self) -> &ServicePrefixes {
        &self.service_prefixes
    }

    fn max_body_size(&self) -> usize {
        self.security.max_body_size
    }

    fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.shutdown_ms)
    }
}
