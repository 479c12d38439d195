//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → UdmConfig (validated, immutable)
//!     → shared via Arc<dyn ConfigProvider> to the server and router
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod provider;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use provider::ConfigProvider;
pub use schema::{SbiConfig, ServicePrefixes, UdmConfig};
