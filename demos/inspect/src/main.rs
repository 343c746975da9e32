use argh::FromArgs;
use calib_mat::{
    packet::{ByteOrder, Packet, PacketConfig},
    CalibrationMatrix,
};
use std::path::{Path, PathBuf};

#[derive(FromArgs)]
/// Inspect a JSON calibration matrix and print its packet encoding
struct Args {
    /// path to the JSON calibration matrix
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to a JSON packet configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// encode the packet big-endian, overriding the configuration
    #[argh(switch)]
    big_endian: bool,
}

fn load_config(path: Option<&Path>, big_endian: bool) -> Result<PacketConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => PacketConfig::default(),
    };
    if big_endian {
        config.byte_order = ByteOrder::BigEndian;
    }
    Ok(config)
}

fn load_matrix(path: &Path) -> Result<CalibrationMatrix, Box<dyn std::error::Error>> {
    let record: CalibrationMatrix = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(CalibrationMatrix::try_new(
        record.rows(),
        record.cols(),
        record.mat_type(),
        record.data().to_vec(),
    )?)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = load_config(args.config.as_deref(), args.big_endian)?;
    let record = load_matrix(&args.input)?;
    log::info!("loaded {}x{} matrix from {}", record.rows(), record.cols(), args.input.display());

    match record.shape() {
        Some(shape) => println!("shape: {shape:?}"),
        None => println!("shape: not a calibration matrix"),
    }

    if let Some(doubles) = record.as_mat_of_double() {
        println!("native: {doubles}");
    }
    if let Some(k) = record.as_faer_mat() {
        println!("faer: {k:?}");
    }

    let mut packet = Packet::new(config);
    record.populate_packet(&mut packet)?;
    println!("packet ({:?}, {} bytes): {}", config.byte_order, packet.len(), to_hex(packet.as_bytes()));
    println!("{record}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_matrix_and_config() -> Result<(), Box<dyn std::error::Error>> {
        let mut matrix = tempfile::NamedTempFile::new()?;
        write!(matrix, r#"{{ "rows": 1, "cols": 5, "type": 6, "data": [1, 2, 3, 4, 5] }}"#)?;
        let record = load_matrix(matrix.path())?;
        assert_eq!(record.data(), &[1.0, 2.0, 3.0, 4.0, 5.0]);

        let mut config = tempfile::NamedTempFile::new()?;
        write!(config, r#"{{ "byte_order": "little_endian" }}"#)?;
        assert_eq!(load_config(Some(config.path()), true)?, PacketConfig::big_endian());
        assert_eq!(load_config(None, false)?, PacketConfig::little_endian());
        Ok(())
    }

    #[test]
    fn test_load_matrix_rejects_bad_length() -> Result<(), Box<dyn std::error::Error>> {
        let mut matrix = tempfile::NamedTempFile::new()?;
        write!(matrix, r#"{{ "rows": 3, "cols": 3, "type": 6, "data": [1, 2] }}"#)?;
        assert!(load_matrix(matrix.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0xf0, 0x3f]), "00f03f");
    }
}
