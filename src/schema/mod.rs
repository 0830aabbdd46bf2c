//! Schema resolution: channel catalog and record layouts.
//!
//! # Architecture
//!
//! The wire format is declared by the game's documents rather than hard-coded:
//! - [`ChannelCatalog`] maps channel ids to their declared type, units and description
//! - [`CompiledLayout`] places an ordered channel id list into a contiguous byte layout
//! - [`LayoutRegistry`] compiles every packet of a structure document once at startup
//!
//! ```text
//! channels.json ──► ChannelCatalog ─┐
//!                                   ├──► CompiledLayout (Arc, shared by all records)
//! udp/wrc.json ──► packet channels ─┘
//! ```
//!
//! Resolution failures (`UnknownChannel`, `UnknownType`) surface here, at setup time,
//! never while decoding individual records.

mod catalog;
mod layout;
mod registry;

pub use catalog::{ChannelCatalog, ChannelDescriptor};
pub use layout::{CompiledLayout, LayoutField};
pub use registry::LayoutRegistry;
