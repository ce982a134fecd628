//! Infrastructure implementations: configuration, secrets, and the
//! local stand-ins for the external data collaborators.

mod config_service;
mod employee_directory;
mod passage_index;
mod secret_service;

pub use config_service::ConfigService;
pub use employee_directory::InMemoryEmployeeDirectory;
pub use passage_index::{HashingEmbedder, StaticPassageIndex};
pub use secret_service::SecretServiceImpl;
