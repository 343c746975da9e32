use serde::{Deserialize, Serialize};

/// Byte order of multi-byte values on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    LittleEndian,
    /// Most significant byte first.
    BigEndian,
}

/// Wire configuration shared by the writer and the reader of a packet.
///
/// Both sides must agree on it; nothing about it is written to the packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketConfig {
    /// Byte order of encoded numbers.
    pub byte_order: ByteOrder,
}

impl PacketConfig {
    /// Little-endian configuration.
    pub const fn little_endian() -> Self {
        Self {
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// Big-endian configuration.
    pub const fn big_endian() -> Self {
        Self {
            byte_order: ByteOrder::BigEndian,
        }
    }
}
