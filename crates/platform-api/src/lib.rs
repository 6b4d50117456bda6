//! Authenticated access to the video platform's public Data API.
//!
//! The original agent split its work between a content script and a
//! background worker holding OAuth credentials; this crate is the worker's
//! counterpart. [`DataApiClient`] speaks the Data API v3 endpoints (search,
//! rating, comment threads, playlists, subscriptions) over a bearer token
//! obtained from a [`TokenProvider`], and [`ApiAdapters`] packages those
//! calls as the [`ActionAdapters`](tubepilot_action_adapters::ActionAdapters)
//! capability the plan executor consumes.
//!
//! Duplicate end states are deliberately not failures: saving an
//! already-saved video or subscribing to an already-subscribed channel
//! resolves to an informational success, because the end state already
//! satisfies the user's intent.

pub mod adapters;
pub mod client;
pub mod error;
pub mod model;
pub mod token;

pub use adapters::ApiAdapters;
pub use client::{DataApiClient, PlatformApi};
pub use error::ApiError;
pub use model::{
    ChannelRef, Rating, SaveOutcome, SearchKind, SearchResponse, SearchResult, SubscribeOutcome,
};
pub use token::{StaticTokenProvider, TokenProvider};
