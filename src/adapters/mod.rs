//! Adapter implementations for port traits.
//!
//! - `live/`: one adapter per upstream provider

pub mod live;
