//! Core types for the podcast watchlist: the wire-facing domain model, the
//! validation rules shared by client and server, and the PIN authorization
//! gate guarding every mutation.

pub mod category;
pub mod error;
pub mod model;
pub mod pin;
pub mod validate;

pub use category::Category;
pub use error::PodcastError;
pub use model::{unix_now, Podcast, PodcastDraft, PodcastPatch, StoredPodcast};
pub use pin::PinGuard;
