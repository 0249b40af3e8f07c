//! Controller layer: host events and tracking of in-flight host calls.

pub mod events;
pub mod orchestration;
