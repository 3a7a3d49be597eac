//! Render - builder, scheduler, and reconciliation policy.

pub mod builder;
pub mod diff;
pub mod scheduler;

pub use builder::{Builder, Component, RenderEntry};
