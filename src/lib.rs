//! Schema-driven codec for EA SPORTS WRC UDP telemetry.
//!
//! The game does not hard-code its telemetry packets. It ships JSON documents
//! describing every channel and the ordered channel list of each packet, and
//! streams records laid out exactly as those lists say. Codriver reads the same
//! documents, compiles a byte layout once, and converts records to and from that
//! wire format.
//!
//! # Features
//!
//! - **Schema-driven**: layouts follow the game's `udp/*.json`, no rebuild when channels change
//! - **Strict codec**: little-endian, unpadded, exact-length records; no partial decodes
//! - **Lookups**: vehicle, location, route and state names from `ids.json`
//! - **Streaming**: capture replay and caller-fed datagrams with typed, rate-limited subscriptions
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use codriver::{Codriver, codec};
//!
//! fn main() -> codriver::Result<()> {
//!     let context = Codriver::load("/path/to/My Games/WRC/telemetry")?;
//!     let layout = context.default_layout()?;
//!
//!     let datagram = vec![0u8; layout.total_size()];
//!     let record = codec::unmarshal(&datagram, &layout)?;
//!     println!("{}", context.render(&record)?);
//!     println!("driving the {}", context.describe(&record).vehicle());
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming a capture
//!
//! ```rust,no_run
//! use codriver::{Codriver, Record, ReplayOptions, UpdateRate};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> codriver::Result<()> {
//!     let context = Codriver::load("telemetry")?;
//!     let connection = Codriver::replay("stage.cap", &context, ReplayOptions::default()).await?;
//!
//!     let mut records = connection.subscribe::<Record>(UpdateRate::Max(10))?;
//!     while let Some(record) = records.next().await {
//!         println!("{:.1} m/s", record.get_as::<f32>("vehicle_speed")?);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod codec;
mod error;
pub mod record;
pub mod render;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Documents and schema resolution
pub mod config;
pub mod context;
pub mod documents;
pub mod lookup;
pub mod schema;
pub mod text;

// Stream-based architecture
pub mod adapters;
pub mod capture;
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod stream;

// Core exports
pub use error::*;
pub use record::Record;
pub use types::*;

// Schema exports
pub use schema::{ChannelCatalog, ChannelDescriptor, CompiledLayout, LayoutField, LayoutRegistry};

// Main API exports
pub use adapters::{AdapterValidation, FieldBinding, RecordAdapter};
pub use capture::{CaptureReader, CaptureWriter};
pub use config::{ReplayOptions, TelemetryConfig};
pub use connection::TelemetryConnection;
pub use context::TelemetryContext;
pub use lookup::{Descriptions, Domain, EnumerationTables, TyrePosition};
pub use provider::Provider;

/// Entry point tying a telemetry directory to connections.
///
/// # Examples
///
/// ```rust,no_run
/// use codriver::Codriver;
/// use codriver::providers::ChannelProvider;
///
/// #[tokio::main]
/// async fn main() -> codriver::Result<()> {
///     let context = Codriver::load("telemetry")?;
///     let (datagrams, provider) = ChannelProvider::channel(64, 60.0);
///     let connection = Codriver::connect(provider, &context)?;
///     // Feed `datagrams` from your own UDP socket...
///     # drop((datagrams, connection));
///     Ok(())
/// }
/// ```
pub struct Codriver;

impl Codriver {
    /// Load the documents of a telemetry directory.
    pub fn load<P: AsRef<std::path::Path>>(root: P) -> Result<TelemetryContext> {
        TelemetryContext::load(root)
    }

    /// Decode a provider's datagrams with the context's default packet layout.
    pub fn connect<P: Provider>(provider: P, context: &TelemetryContext) -> Result<TelemetryConnection> {
        Ok(TelemetryConnection::new(provider, context.default_layout()?))
    }

    /// Replay a capture of the context's default packet.
    pub async fn replay<P: AsRef<std::path::Path>>(
        path: P,
        context: &TelemetryContext,
        options: ReplayOptions,
    ) -> Result<TelemetryConnection> {
        TelemetryConnection::replay(path, context.default_layout()?, options).await
    }
}
