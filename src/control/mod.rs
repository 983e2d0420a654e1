//! Control primitives driven by the service each tick.

pub mod flow;
pub mod reset;
pub mod volume;
