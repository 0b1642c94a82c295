//! AI components

mod controller;
mod fsm;
mod routine;

#[cfg(test)]
mod controller_tests;

pub use controller::*;
pub use fsm::*;
pub use routine::*;
