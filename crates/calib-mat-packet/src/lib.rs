#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Wire configuration.
pub mod config;

/// The [`Packet`] buffer and its error type.
pub mod packet;

pub use crate::config::{ByteOrder, PacketConfig};
pub use crate::packet::{Packet, PacketError};
