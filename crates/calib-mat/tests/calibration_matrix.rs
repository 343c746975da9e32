use approx::assert_relative_eq;
use calib_mat::{
    extract_data, is_calibration_shape, is_camera_matrix_shape, is_distortion_coeffs_shape,
    native::{Mat, MatType, Releasable},
    packet::{Packet, PacketConfig},
    CalibrationMatrix, CalibrationShape,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn json_round_trip_preserves_fields() -> Result<(), Box<dyn std::error::Error>> {
    let cases = [
        r#"{"rows":3,"cols":3,"type":6,"data":[1.5,0.0,2.5,0.0,1.5,3.5,0.0,0.0,1.0]}"#,
        r#"{"rows":1,"cols":5,"type":6,"data":[0.1,-0.2,0.003,-0.004,0.05]}"#,
        r#"{"rows":2,"cols":2,"type":5,"data":[1.0,2.0,3.0,4.0]}"#,
    ];
    for json in cases {
        let record: CalibrationMatrix = serde_json::from_str(json)?;
        assert_eq!(serde_json::to_string(&record)?, json);
    }
    Ok(())
}

#[test]
fn json_ignores_materialized_caches() -> Result<(), Box<dyn std::error::Error>> {
    let record = CalibrationMatrix::new(1, 5, vec![0.1, 0.2, 0.3, 0.4, 0.5]);
    record.as_mat();
    record.as_faer_mat();

    let value = serde_json::to_value(&record)?;
    let object = value.as_object().ok_or("expected a JSON object")?;
    let mut keys = object.keys().cloned().collect::<Vec<_>>();
    keys.sort();
    assert_eq!(keys, ["cols", "data", "rows", "type"]);
    Ok(())
}

#[test]
fn shape_classification() -> Result<(), Box<dyn std::error::Error>> {
    let camera = Mat::new(3, 3, MatType::CV_64FC1)?;
    let dist = Mat::new(1, 5, MatType::CV_64FC1)?;
    let square = Mat::new(4, 4, MatType::CV_64FC1)?;
    let float_camera = Mat::new(3, 3, MatType::CV_32FC1)?;

    assert!(is_camera_matrix_shape(&camera) && !is_distortion_coeffs_shape(&camera));
    assert!(is_distortion_coeffs_shape(&dist) && !is_camera_matrix_shape(&dist));
    assert!(!is_calibration_shape(&square));
    assert!(!is_calibration_shape(&float_camera));
    assert_eq!(CalibrationShape::classify(&camera), Some(CalibrationShape::CameraMatrix));
    Ok(())
}

#[test]
fn extraction_is_truncated_to_logical_values() -> Result<(), Box<dyn std::error::Error>> {
    let camera_values: Vec<f64> = (0..9).map(|i| i as f64 + 0.5).collect();
    let camera = Mat::from_slice(3, 3, &camera_values)?;
    let extracted = extract_data(&camera).ok_or("camera matrix not extracted")?;
    assert_eq!(extracted.len(), 9);
    assert_eq!(extracted, camera_values);

    let dist_values = [-0.41, 0.22, 0.0011, -0.0007, -0.08];
    let dist = Mat::from_slice(1, 5, &dist_values)?;
    let extracted = extract_data(&dist).ok_or("distortion not extracted")?;
    assert_eq!(extracted, dist_values);
    Ok(())
}

#[test]
fn non_calibration_shapes_yield_none() -> Result<(), Box<dyn std::error::Error>> {
    let square = Mat::from_slice(4, 4, &[0.0f64; 16])?;
    let float_camera = Mat::from_slice(3, 3, &[1.0f32; 9])?;
    assert!(extract_data(&square).is_none());
    assert!(CalibrationMatrix::from_mat(&square).is_none());
    assert!(extract_data(&float_camera).is_none());
    assert!(CalibrationMatrix::from_mat(&float_camera).is_none());
    Ok(())
}

#[test]
fn native_matrix_is_built_once() {
    init_logger();
    let record = CalibrationMatrix::new(3, 3, vec![1.0; 9]);
    let first = record.as_mat().map(|m| m as *const Mat);
    let second = record.as_mat().map(|m| m as *const Mat);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn unsupported_type_has_no_native_matrix() {
    init_logger();
    let record = CalibrationMatrix::with_type(3, 3, MatType::CV_8UC1.code(), vec![1.0; 9]);
    assert!(record.as_mat().is_none());
}

#[test]
fn packet_contains_only_values() -> Result<(), Box<dyn std::error::Error>> {
    let record = CalibrationMatrix::new(1, 3, vec![1.0, 2.0, 3.0]);
    let mut packet = Packet::new(PacketConfig::default());
    let returned = record.populate_packet(&mut packet)? as *const Packet;
    assert!(std::ptr::eq(returned, &packet));

    assert_eq!(packet.len(), 3 * 8);
    assert_eq!(packet.decode_f64s(3)?, vec![1.0, 2.0, 3.0]);
    assert_eq!(packet.remaining(), 0);
    Ok(())
}

#[test]
fn packet_round_trip_with_known_shape() -> Result<(), Box<dyn std::error::Error>> {
    let record = CalibrationMatrix::new(1, 5, vec![0.05, -0.1, 0.0, 0.001, 0.2]);
    let mut packet = Packet::new(PacketConfig::big_endian());
    record.populate_packet(&mut packet)?.encode_i32(-1)?;

    let mut reader = Packet::from_bytes(packet.into_bytes(), PacketConfig::big_endian());
    let decoded = CalibrationMatrix::from_packet(&mut reader, 1, 5)?;
    assert_eq!(decoded, record);
    assert_eq!(reader.decode_i32()?, -1);
    Ok(())
}

#[test]
fn packet_shorter_than_shape_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    assert!(CalibrationMatrix::from_packet(&mut Packet::default(), 1 << 28, 1 << 28).is_err());
    assert!(CalibrationMatrix::from_packet(&mut Packet::default(), usize::MAX, 2).is_err());

    let mut packet = Packet::default();
    packet.encode_f64s(&[0.5, 1.5])?;
    assert!(CalibrationMatrix::from_packet(&mut packet, 1, 3).is_err());
    assert_eq!(packet.remaining(), 16);

    let decoded = CalibrationMatrix::from_packet(&mut packet, 1, 2)?;
    assert_eq!(decoded.data(), [0.5, 1.5]);
    Ok(())
}

#[test]
fn camera_matrix_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let (fx, fy, cx, cy) = (1123.4, 1120.9, 639.5, 359.5);
    let data = vec![fx, 0.0, cx, 0.0, fy, cy, 0.0, 0.0, 1.0];
    let record = CalibrationMatrix::new(3, 3, data.clone());

    let mat = record.as_mat().ok_or("no native matrix")?;
    assert_eq!(mat.rows(), 3);
    assert_eq!(mat.cols(), 3);
    assert_eq!(mat.to_vec::<f64>()?, data);

    let rebuilt = CalibrationMatrix::from_mat(mat).ok_or("not a calibration matrix")?;
    assert_eq!(rebuilt.data(), data.as_slice());
    assert_eq!(rebuilt, record);

    let k = record.as_faer_mat().ok_or("no faer matrix")?;
    assert_relative_eq!(k[(0, 0)], fx);
    assert_relative_eq!(k[(1, 2)], cy);
    assert_relative_eq!(k[(2, 2)], 1.0);

    let [row0, _, row2] = record.as_array::<3, 3>().ok_or("not 3x3")?;
    assert_eq!(row0, [fx, 0.0, cx]);
    assert_eq!(row2, [0.0, 0.0, 1.0]);
    Ok(())
}

#[test]
fn release_frees_and_allows_rebuild() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let mut record = CalibrationMatrix::new(1, 5, vec![0.0, 0.1, 0.2, 0.3, 0.4]);

    // nothing materialized yet
    record.release();
    assert!(record.to_string().contains(", mat=None"));

    record.as_mat_of_double().ok_or("no float matrix")?;
    record.release();
    assert!(record.to_string().contains(", mat=None, mat_of_double=None"));

    let mat = record.as_mat().ok_or("no native matrix after release")?;
    assert!(!mat.is_released());
    assert_eq!(mat.to_vec::<f64>()?, vec![0.0, 0.1, 0.2, 0.3, 0.4]);
    Ok(())
}
