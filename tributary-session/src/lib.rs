//! # tributary-session
//!
//! Per-session conversation history with idle expiry.
//!
//! [`ExpiringMap`] is the reusable piece: a `DashMap` whose entries carry a
//! last-touched timestamp and are swept lazily on every access against an
//! injectable [`Clock`]. [`SessionMemory`] stores conversation turns in one.

pub mod clock;
pub mod expiring;
pub mod memory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use expiring::ExpiringMap;
pub use memory::SessionMemory;
