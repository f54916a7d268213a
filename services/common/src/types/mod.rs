//! Domain records exchanged between the feed, the analysis pipeline and
//! the persistence gateway

pub mod analysis;
pub mod log;
pub mod market;
pub mod signal;

pub use analysis::*;
pub use log::*;
pub use market::*;
pub use signal::*;
