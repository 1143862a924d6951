//! Infrastructure layer of the tutor client.
//!
//! HTTP transport for the remote traits of `tutor-core`, the wire DTOs, and
//! the file-backed configuration and preference services.

pub mod config_service;
pub mod dto;
pub mod http_backend;
pub mod paths;
pub mod preference_storage;

pub use config_service::ConfigService;
pub use http_backend::HttpBackend;
pub use paths::TutorPaths;
pub use preference_storage::TomlPreferenceStore;
