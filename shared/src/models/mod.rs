//! Domain models for the plant-disease client

mod crop;
mod disease;
mod health;
mod prediction;
mod report;
mod saved;

pub use crop::*;
pub use disease::*;
pub use health::*;
pub use prediction::*;
pub use report::*;
pub use saved::*;
