//! # Publishers
//!
//! [`contracts::Publisher`] implementations that sensor kinds write to.
//!
//! - [`LogPublisher`]: one tracing event per packet
//! - [`MemoryPublisher`]: keeps packets for inspection, optionally bounded
//! - [`NullPublisher`]: counts and discards
//!
//! Every publisher shares a [`PublishStats`] counter set with the
//! [`PublisherHandle`] returned by [`create_publisher`].

pub mod factory;
pub mod log;
pub mod memory;
pub mod null;
pub mod stats;

pub use contracts::{Publisher, SharedPublisher};
pub use factory::{create_publisher, PublisherHandle};
pub use log::LogPublisher;
pub use memory::{MemoryPublisher, Recorded};
pub use null::NullPublisher;
pub use stats::{PublishStats, StatsSnapshot};
