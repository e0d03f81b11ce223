//! feedsync client runtime
//!
//! Turns pushed wire messages into container updates:
//!
//! ```text
//! WireEnvelope ─normalize─► StateUpdateEvent ─enrich─► HandlerRegistry ─► Container<S>
//! ```
//!
//! The transport that delivers wire messages is not part of this crate; feed
//! [`DispatcherHandle::dispatch`] (or [`DispatcherHandle::dispatch_json`])
//! from whatever socket or replay source you have.

pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod enrich;
pub mod normalize;
pub mod registry;
pub mod wire;

pub use config::{ClientConfig, ConfigError};
pub use dispatcher::{DispatchError, DispatcherHandle, EventDispatcher, spawn_dispatcher};
pub use enrich::{CapabilityCache, CapabilitySource, Enricher};
pub use normalize::{normalize, normalize_json};
pub use registry::{HandlerRegistry, SubscriptionId};
pub use wire::{WireEnvelope, WireEvent};
