use crate::CalibrationMatrix;

/// Encodes the full record: shape, element type tag and values.
///
/// Unlike [`CalibrationMatrix::populate_packet`], the decoder needs no
/// out-of-band shape information.
impl bincode::enc::Encode for CalibrationMatrix {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.rows(), encoder)?;
        bincode::Encode::encode(&self.cols(), encoder)?;
        bincode::Encode::encode(&self.mat_type(), encoder)?;
        bincode::Encode::encode(self.data(), encoder)?;
        Ok(())
    }
}

impl<C> bincode::de::Decode<C> for CalibrationMatrix {
    fn decode<D: bincode::de::Decoder<Context = C>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        let rows: usize = bincode::Decode::decode(decoder)?;
        let cols: usize = bincode::Decode::decode(decoder)?;
        let mat_type: i32 = bincode::Decode::decode(decoder)?;
        let data: Vec<f64> = bincode::Decode::decode(decoder)?;
        Ok(Self::with_type(rows, cols, mat_type, data))
    }
}
