//! Native host pieces for the console navigation core: environment config,
//! a file-backed preference store and the HTTP status transport.

pub mod config;
pub mod file_store;
pub mod http;

pub use config::{ConfigError, ResolvedBaseUrl, resolve_base_url, resolve_preferences_path};
pub use file_store::{FilePreferenceStore, FileStoreError};
pub use http::{HttpStatusTransport, StatusClientError};
