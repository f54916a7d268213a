//! Common types, collaborator traits and client wrappers shared by the
//! signal services

pub mod clients;
pub mod config;
pub mod constants;
pub mod errors;
pub mod storage;
pub mod types;

pub use clients::*;
pub use config::*;
pub use errors::*;
pub use storage::*;
pub use types::*;
