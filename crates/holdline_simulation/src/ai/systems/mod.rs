//! AI systems (strategic layer logic)

mod attack;
mod detection;
mod fsm;
mod sensors;
mod start;

// Re-export all systems
pub use attack::*;
pub use detection::*;
pub use fsm::*;
pub use sensors::*;
pub use start::*;
