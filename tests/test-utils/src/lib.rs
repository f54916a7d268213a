//! Test utilities for the signal services
//!
//! - Mock price feed, advisory oracle and persistence gateway
//! - Candle series factories
//! - rstest fixtures
//! - Async helpers and custom assertions

pub mod assertions;
pub mod factories;
pub mod fixtures;
pub mod helpers;
pub mod mocks;

pub use assertions::*;
pub use factories::*;
pub use fixtures::*;
pub use helpers::*;
pub use mocks::*;
