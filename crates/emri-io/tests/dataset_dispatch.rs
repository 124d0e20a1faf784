use std::fs::{self, File};

use emri_core::EmriError;
use emri_io::{load_array, load_matrix, load_scalar, load_vector, read_npy_any, read_npz_entries, NpyData};
use ndarray::{array, Array3};
use ndarray_npy::{write_npy, NpzWriter};
use tempfile::tempdir;

#[test]
fn npy_matrix_and_vector_load() {
    let dir = tempdir().unwrap();
    let matrix_path = dir.path().join("fisher.npy");
    write_npy(&matrix_path, &array![[4.0, 0.0], [0.0, 1.0]]).unwrap();
    let matrix = load_matrix(&matrix_path, "ignored").unwrap();
    assert_eq!(matrix, array![[4.0, 0.0], [0.0, 1.0]]);

    let vector_path = dir.path().join("snr.npy");
    write_npy(&vector_path, &array![1.5f32, 2.5]).unwrap();
    assert_eq!(load_vector(&vector_path, "").unwrap(), vec![1.5, 2.5]);
    assert!(load_matrix(&vector_path, "").is_err());
}

#[test]
fn dtype_is_preserved_on_read() {
    let dir = tempdir().unwrap();
    let ints = dir.path().join("counts.npy");
    write_npy(&ints, &array![[1i32, 2], [3, 4]]).unwrap();
    let loaded = read_npy_any(&ints).unwrap();
    assert_eq!(loaded.dtype, "int32");
    assert_eq!(loaded.shape(), &[2, 2]);
    assert!(matches!(loaded.data, NpyData::Int(_)));

    let flags = dir.path().join("flags.npy");
    write_npy(&flags, &array![true, false]).unwrap();
    let loaded = read_npy_any(&flags).unwrap();
    assert_eq!(loaded.dtype, "bool");
    assert_eq!(loaded.to_f64().into_raw_vec(), vec![1.0, 0.0]);

    let cube = dir.path().join("cube.npy");
    write_npy(&cube, &Array3::<f64>::zeros((2, 3, 4))).unwrap();
    assert_eq!(read_npy_any(&cube).unwrap().shape(), &[2, 3, 4]);
}

#[test]
fn npz_members_are_keyed_without_suffix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bundle.npz");
    let mut npz = NpzWriter::new(File::create(&path).unwrap());
    npz.add_array("bias", &array![[1.0, 2.0]]).unwrap();
    npz.add_array("ids", &array![7i64, 8]).unwrap();
    npz.finish().unwrap();

    let entries = read_npz_entries(&path).unwrap();
    let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, vec!["bias", "ids"]);
    assert_eq!(load_matrix(&path, "bias").unwrap(), array![[1.0, 2.0]]);
    assert_eq!(load_vector(&path, "ids.npy").unwrap(), vec![7.0, 8.0]);
    let err = load_array(&path, "missing").unwrap_err();
    assert_eq!(err.info().code, "dataset-key");
}

#[test]
fn json_members_load_by_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fisher.json");
    fs::write(&path, r#"{"Fisher": [[2.0, 0.5], [0.5, 3.0]], "SNR": 42.0}"#).unwrap();
    assert_eq!(
        load_matrix(&path, "Fisher").unwrap(),
        array![[2.0, 0.5], [0.5, 3.0]]
    );
    assert_eq!(load_scalar(&path, "SNR").unwrap(), 42.0);
    assert!(matches!(load_scalar(&path, "Fisher"), Err(EmriError::Shape(_))));
}

#[test]
fn missing_and_unknown_inputs_fail_cleanly() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.npy");
    let err = load_array(&missing, "").unwrap_err();
    assert!(matches!(err, EmriError::Io(_)));
    assert_eq!(err.info().context["path"], missing.display().to_string());

    let text = dir.path().join("notes.txt");
    fs::write(&text, "1 2 3").unwrap();
    assert!(matches!(load_array(&text, ""), Err(EmriError::Format(_))));
}

#[cfg(not(feature = "hdf5"))]
#[test]
fn hdf5_without_feature_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Fisher_Prograde_EMRI.h5");
    fs::write(&path, b"not really hdf5").unwrap();
    let err = load_matrix(&path, "Fisher").unwrap_err();
    assert!(matches!(err, EmriError::Config(_)));
    assert_eq!(err.info().code, "hdf5-unavailable");
}
