mod common;

use ndarray::Array2;
use num_complex::Complex;

use dlhm_core::error::DlhmError;
use dlhm_core::frame::Frame;
use dlhm_core::io::export::Exporter;
use dlhm_core::io::image_io::{load_image, save_gray8, save_image, save_tiff16, RasterFormat};
use dlhm_core::io::ser::SerReader;

use common::{build_ser_header, build_ser_with_frames, ramp, write_test_ser};

// ---------------------------------------------------------------------------
// SER
// ---------------------------------------------------------------------------

#[test]
fn test_ser_8bit_mono() {
    let frame_data: Vec<u8> = (0u8..12).map(|v| v * 20).collect();
    let file = write_test_ser(&build_ser_with_frames(4, 3, &[frame_data]));

    let reader = SerReader::open(file.path()).unwrap();
    assert_eq!(reader.frame_count(), 1);
    assert_eq!(reader.header.width, 4);
    assert_eq!(reader.header.height, 3);
    assert_eq!(reader.header.observer, "Lab");

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.data.dim(), (3, 4));
    assert!((frame.data[[0, 1]] - 20.0 / 255.0).abs() < 1e-6);
    assert!((frame.data[[2, 3]] - 220.0 / 255.0).abs() < 1e-6);
    assert_eq!(frame.original_bit_depth, 8);
}

#[test]
fn test_ser_16bit_little_endian() {
    let mut buf = build_ser_header(2, 1, 16, 1);
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&65535u16.to_le_bytes());
    let file = write_test_ser(&buf);

    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data[[0, 0]], 0.0);
    assert_eq!(frame.data[[0, 1]], 1.0);
    assert_eq!(frame.original_bit_depth, 16);
}

#[test]
fn test_ser_frame_out_of_range() {
    let file = write_test_ser(&build_ser_with_frames(2, 2, &[vec![0; 4], vec![1; 4]]));
    let reader = SerReader::open(file.path()).unwrap();
    match reader.read_frame(2) {
        Err(DlhmError::FrameIndexOutOfRange { index, total }) => {
            assert_eq!((index, total), (2, 2));
        }
        other => panic!("expected out of range, got {other:?}"),
    }
}

#[test]
fn test_ser_truncated_and_bad_magic() {
    let mut buf = build_ser_with_frames(4, 4, &[vec![0; 16]]);
    buf.truncate(buf.len() - 4);
    let file = write_test_ser(&buf);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(DlhmError::InvalidSer(_))
    ));

    let mut buf = build_ser_with_frames(4, 4, &[vec![0; 16]]);
    buf[0] = b'X';
    let file = write_test_ser(&buf);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(DlhmError::InvalidSer(_))
    ));
}

#[test]
fn test_ser_source_info() {
    let file = write_test_ser(&build_ser_with_frames(3, 2, &vec![vec![0u8; 6]; 5]));
    let reader = SerReader::open(file.path()).unwrap();
    let info = reader.source_info(file.path());
    assert_eq!(info.total_frames, 5);
    assert_eq!((info.width, info.height), (3, 2));
    assert_eq!(info.observer.as_deref(), Some("Lab"));
    assert_eq!(info.instrument, None);
}

// ---------------------------------------------------------------------------
// Image I/O
// ---------------------------------------------------------------------------

#[test]
fn test_png_roundtrip_8bit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ramp.png");
    let frame = Frame::new(ramp(4, 6), 8);
    save_image(&frame, &path).unwrap();

    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded.data.dim(), (4, 6));
    assert_eq!(loaded.original_bit_depth, 8);
    for (a, b) in frame.data.iter().zip(loaded.data.iter()) {
        assert!((a - b).abs() < 1.0 / 255.0 + 1e-6);
    }
}

#[test]
fn test_tiff16_roundtrip_keeps_depth() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ramp.tiff");
    let frame = Frame::new(ramp(3, 5), 16);
    save_tiff16(&frame, &path).unwrap();

    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded.original_bit_depth, 16);
    for (a, b) in frame.data.iter().zip(loaded.data.iter()) {
        assert!((a - b).abs() < 1e-4);
    }
}

#[test]
fn test_bmp_gray8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("levels.bmp");
    let data = Array2::from_shape_vec((1, 3), vec![0u8, 128, 255]).unwrap();
    save_gray8(&data, &path, RasterFormat::Bmp).unwrap();
    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded.data[[0, 0]], 0.0);
    assert_eq!(loaded.data[[0, 2]], 1.0);
}

#[test]
fn test_load_missing_file_fails() {
    assert!(load_image(std::path::Path::new("/nonexistent/holo.png")).is_err());
}

#[test]
fn test_raster_format_from_path() {
    use std::path::Path;
    assert_eq!(RasterFormat::from_path(Path::new("a.TIF")), Some(RasterFormat::Tiff));
    assert_eq!(RasterFormat::from_path(Path::new("a.bmp")), Some(RasterFormat::Bmp));
    assert_eq!(RasterFormat::from_path(Path::new("a.jpg")), None);
    assert_eq!(format!("{}", RasterFormat::Png), "PNG");
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

#[test]
fn test_exporter_auto_increments() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path().join("out"), RasterFormat::Png).unwrap();
    let image = Array2::from_elem((4, 4), 100u8);

    let first = exporter.export("capture", &image).unwrap();
    let second = exporter.export("capture", &image).unwrap();
    let other = exporter.export("reconstruction", &image).unwrap();

    assert_eq!(first.file_name().unwrap(), "capture-0001.png");
    assert_eq!(second.file_name().unwrap(), "capture-0002.png");
    assert_eq!(other.file_name().unwrap(), "reconstruction-0001.png");
    assert!(first.exists() && second.exists());
}

#[test]
fn test_exporter_never_overwrites_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("capture-0001.bmp"), b"keep").unwrap();
    let exporter = Exporter::new(dir.path(), RasterFormat::Bmp).unwrap();
    let path = exporter
        .export("capture", &Array2::from_elem((2, 2), 7u8))
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "capture-0002.bmp");
    assert_eq!(std::fs::read(dir.path().join("capture-0001.bmp")).unwrap(), b"keep");
}

#[test]
fn test_exporter_field_pair_shares_index() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path(), RasterFormat::Png).unwrap();
    let field = Array2::from_shape_fn((8, 8), |(r, c)| {
        Complex::from_polar(1.0 + r as f64, c as f64 * 0.3)
    });

    // An orphan phase file forces the pair onto the next index.
    std::fs::write(dir.path().join("phase-0001.png"), b"x").unwrap();
    let (amplitude, phase) = exporter.export_field(&field).unwrap();
    assert_eq!(amplitude.file_name().unwrap(), "amplitude-0002.png");
    assert_eq!(phase.file_name().unwrap(), "phase-0002.png");

    let loaded = load_image(&amplitude).unwrap();
    assert_eq!(loaded.data.dim(), (8, 8));
}
