use bincode::config::{self as wire};

use crate::config::{ByteOrder, PacketConfig};

/// An error type for packet encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// A value could not be appended to the packet.
    #[error("Failed to encode packet value: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// A value could not be read, usually because the packet ran out of bytes.
    #[error("Failed to decode packet value: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

/// A growable byte buffer with a read cursor.
///
/// Values are appended with the `encode_*` methods and read back in the same
/// order with the `decode_*` methods. Every value is fixed width: `f64` takes
/// 8 bytes, `i32` 4 bytes, `u8` and `bool` one byte. No type or length
/// information is written, so the reader must know the layout up front.
///
/// # Example
///
/// ```rust
/// use calib_mat_packet::Packet;
///
/// let mut packet = Packet::default();
/// packet.encode_i32(3).unwrap().encode_f64s(&[1.0, 2.0]).unwrap();
/// assert_eq!(packet.len(), 4 + 2 * 8);
///
/// assert_eq!(packet.decode_i32().unwrap(), 3);
/// assert_eq!(packet.decode_f64s(2).unwrap(), vec![1.0, 2.0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Packet {
    data: Vec<u8>,
    read_pos: usize,
    config: PacketConfig,
}

impl PartialEq for Packet {
    /// Packets are equal when they hold the same bytes under the same
    /// configuration, wherever their read cursors are.
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.config == other.config
    }
}

impl Packet {
    /// Creates an empty packet.
    pub fn new(config: PacketConfig) -> Self {
        Self {
            data: Vec::new(),
            read_pos: 0,
            config,
        }
    }

    /// Wraps received bytes for decoding.
    pub fn from_bytes(data: Vec<u8>, config: PacketConfig) -> Self {
        Self {
            data,
            read_pos: 0,
            config,
        }
    }

    /// The wire configuration of this packet.
    pub fn config(&self) -> PacketConfig {
        self.config
    }

    /// All bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the packet, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of bytes in the packet.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes not yet decoded.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_pos
    }

    /// Drops all bytes and rewinds the read cursor.
    pub fn clear(&mut self) {
        self.data.clear();
        self.read_pos = 0;
    }

    fn encode_value<T: bincode::Encode>(&mut self, value: T) -> Result<&mut Self, PacketError> {
        let standard = wire::standard().with_fixed_int_encoding();
        match self.config.byte_order {
            ByteOrder::LittleEndian => bincode::encode_into_std_write(
                value,
                &mut self.data,
                standard.with_little_endian(),
            )?,
            ByteOrder::BigEndian => {
                bincode::encode_into_std_write(value, &mut self.data, standard.with_big_endian())?
            }
        };
        Ok(self)
    }

    fn decode_value<T: bincode::Decode<()>>(&mut self) -> Result<T, PacketError> {
        let standard = wire::standard().with_fixed_int_encoding();
        let src = &self.data[self.read_pos..];
        let (value, read) = match self.config.byte_order {
            ByteOrder::LittleEndian => {
                bincode::decode_from_slice(src, standard.with_little_endian())?
            }
            ByteOrder::BigEndian => bincode::decode_from_slice(src, standard.with_big_endian())?,
        };
        self.read_pos += read;
        Ok(value)
    }

    /// Appends one `f64`.
    pub fn encode_f64(&mut self, value: f64) -> Result<&mut Self, PacketError> {
        self.encode_value(value)
    }

    /// Appends every value of `values` in order, without a length prefix.
    pub fn encode_f64s(&mut self, values: &[f64]) -> Result<&mut Self, PacketError> {
        self.data.reserve(values.len() * std::mem::size_of::<f64>());
        for &value in values {
            self.encode_value(value)?;
        }
        Ok(self)
    }

    /// Appends one `i32`.
    pub fn encode_i32(&mut self, value: i32) -> Result<&mut Self, PacketError> {
        self.encode_value(value)
    }

    /// Appends one byte.
    pub fn encode_u8(&mut self, value: u8) -> Result<&mut Self, PacketError> {
        self.encode_value(value)
    }

    /// Appends a boolean as a single `0`/`1` byte.
    pub fn encode_bool(&mut self, value: bool) -> Result<&mut Self, PacketError> {
        self.encode_value(value)
    }

    /// Reads one `f64`.
    pub fn decode_f64(&mut self) -> Result<f64, PacketError> {
        self.decode_value()
    }

    /// Reads `len` consecutive `f64` values.
    ///
    /// Fails without consuming anything if fewer than `len` values remain.
    pub fn decode_f64s(&mut self, len: usize) -> Result<Vec<f64>, PacketError> {
        let needed = len
            .checked_mul(std::mem::size_of::<f64>())
            .unwrap_or(usize::MAX);
        if needed > self.remaining() {
            return Err(bincode::error::DecodeError::UnexpectedEnd {
                additional: needed - self.remaining(),
            }
            .into());
        }

        let start = self.read_pos;
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            match self.decode_f64() {
                Ok(value) => values.push(value),
                Err(err) => {
                    self.read_pos = start;
                    return Err(err);
                }
            }
        }
        Ok(values)
    }

    /// Reads one `i32`.
    pub fn decode_i32(&mut self) -> Result<i32, PacketError> {
        self.decode_value()
    }

    /// Reads one byte.
    pub fn decode_u8(&mut self) -> Result<u8, PacketError> {
        self.decode_value()
    }

    /// Reads a boolean.
    pub fn decode_bool(&mut self) -> Result<bool, PacketError> {
        self.decode_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f64_little_endian_layout() -> Result<(), PacketError> {
        let mut packet = Packet::default();
        packet.encode_f64(1.0)?;
        assert_eq!(packet.as_bytes(), &1.0f64.to_le_bytes());
        Ok(())
    }

    #[test]
    fn test_f64_big_endian_layout() -> Result<(), PacketError> {
        let mut packet = Packet::new(PacketConfig::big_endian());
        packet.encode_f64(-2.5)?.encode_i32(7)?;
        let mut expected = (-2.5f64).to_be_bytes().to_vec();
        expected.extend_from_slice(&7i32.to_be_bytes());
        assert_eq!(packet.as_bytes(), expected.as_slice());

        assert_eq!(packet.decode_f64()?, -2.5);
        assert_eq!(packet.decode_i32()?, 7);
        assert_eq!(packet.remaining(), 0);
        Ok(())
    }

    #[test]
    fn test_mixed_values() -> Result<(), PacketError> {
        let mut packet = Packet::default();
        packet
            .encode_bool(true)?
            .encode_u8(42)?
            .encode_f64s(&[0.25, 4.0])?;
        assert_eq!(packet.len(), 1 + 1 + 16);

        let mut reader = Packet::from_bytes(packet.into_bytes(), PacketConfig::default());
        assert!(reader.decode_bool()?);
        assert_eq!(reader.decode_u8()?, 42);
        assert_eq!(reader.decode_f64s(2)?, vec![0.25, 4.0]);
        Ok(())
    }

    #[test]
    fn test_decode_past_end() -> Result<(), PacketError> {
        let mut packet = Packet::default();
        packet.encode_f64s(&[1.0, 2.0])?;
        assert!(matches!(packet.decode_f64s(3), Err(PacketError::Decode(_))));
        Ok(())
    }

    #[test]
    fn test_short_decode_keeps_cursor() -> Result<(), PacketError> {
        let mut packet = Packet::default();
        packet.encode_f64s(&[1.0, 2.0])?.encode_u8(9)?;
        assert!(matches!(packet.decode_f64s(3), Err(PacketError::Decode(_))));
        assert_eq!(packet.remaining(), 17);
        assert_eq!(packet.decode_f64s(2)?, vec![1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_huge_decode_from_empty_packet() {
        let mut packet = Packet::default();
        assert!(matches!(packet.decode_f64s(1 << 56), Err(PacketError::Decode(_))));
        assert!(matches!(packet.decode_f64s(usize::MAX), Err(PacketError::Decode(_))));
        assert_eq!(packet.remaining(), 0);
    }

    #[test]
    fn test_equality_ignores_read_cursor() -> Result<(), PacketError> {
        let mut read = Packet::default();
        read.encode_i32(5)?;
        let untouched = read.clone();
        read.decode_i32()?;
        assert_eq!(read, untouched);
        assert_ne!(read, Packet::new(PacketConfig::big_endian()));
        Ok(())
    }

    #[test]
    fn test_clear() -> Result<(), PacketError> {
        let mut packet = Packet::default();
        packet.encode_i32(1)?;
        packet.decode_i32()?;
        packet.clear();
        assert!(packet.is_empty());
        assert_eq!(packet.remaining(), 0);
        Ok(())
    }
}
