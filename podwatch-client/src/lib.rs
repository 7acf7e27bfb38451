//! Client side of the podcast watchlist: a transport seam ([`api::PodcastApi`]),
//! its reqwest implementation, and the async request/state store that keeps a
//! consistent in-memory projection for display.

pub mod api;
pub mod store;

pub use api::{HttpApi, PodcastApi};
pub use store::{Op, OpStatus, OperationStatus, RequestStateStore};
