//! HTTPS certificate loading.

use std::io;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::error::{Result, SbiError};

/// Load the SBI certificate chain and private key (PEM).
///
/// Both files are checked up front so the error names the missing one.
pub async fn load_tls_config(pem: &Path, key: &Path) -> Result<RustlsConfig> {
    for (what, path) in [("certificate", pem), ("private key", key)] {
        if !path.is_file() {
            return Err(SbiError::Tls(io::Error::new(
                io::ErrorKind::NotFound,
                format!("SBI {what} {} not found", path.display()),
            )));
        }
    }

    tracing::info!(pem = %pem.display(), key = %key.display(), "Loading SBI TLS certificate");
    RustlsConfig::from_pem_file(pem, key)
        .await
        .map_err(SbiError::Tls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_certificate_is_reported() {
        let err = load_tls_config(Path::new("/nonexistent/udm.pem"), Path::new("/nonexistent/udm.key"))
            .await
            .unwrap_err();
        let SbiError::Tls(io) = err else {
            panic!("expected TLS error, got {err:?}");
        };
        assert_eq!(io.kind(), io::ErrorKind::NotFound);
        assert!(io.to_string().contains("certificate /nonexistent/udm.pem"));
    }
}
