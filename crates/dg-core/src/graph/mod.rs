//! Door graph: connections, construction and reachability

mod builder;
mod connection;
mod reach;

pub use builder::{ConnectivityGraphBuilder, DoorProtection};
pub use connection::{ConnectionGraph, ConnectionKey};
pub use reach::{AccessibilityAnalyzer, DepthMap, reachable_from};
