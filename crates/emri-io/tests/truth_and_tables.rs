use std::collections::BTreeMap;
use std::fs;

use emri_core::{EmriError, EmriPreset, ESTIMATED_PARAMETERS};
use emri_io::{load_chain, load_parameter_map, load_true_values, read_text_table};
use ndarray::{array, Array, IxDyn};
use ndarray_npy::write_npy;
use tempfile::tempdir;

fn prograde_map() -> BTreeMap<String, f64> {
    let config = EmriPreset::Prograde.configuration();
    ESTIMATED_PARAMETERS
        .iter()
        .map(|parameter| (parameter.name().to_string(), config.value(*parameter)))
        .collect()
}

#[test]
fn pickled_dictionary_yields_catalogue_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("PARAMS_run.h5");
    let mut map = prograde_map();
    map.insert("x0".to_string(), 1.0);
    let bytes = serde_pickle::to_vec(&map, serde_pickle::SerOptions::new()).unwrap();
    fs::write(&path, bytes).unwrap();

    let values = load_true_values(&path).unwrap();
    assert_eq!(values, EmriPreset::Prograde.configuration().estimated_values());
}

/// `{"M": np.float64(1e6), "x0": 1.0}` pickled with protocol 2.
const NUMPY_SCALAR_PICKLE: &[u8] = b"\x80\x02}q\x00(X\x01\x00\x00\x00Mq\x01cnumpy.core.multiarray\nscalar\nq\x02cnumpy\ndtype\nq\x03X\x02\x00\x00\x00f8q\x04\x89\x88\x87q\x05Rq\x06(K\x03X\x01\x00\x00\x00<q\x07NNNJ\xff\xff\xff\xffJ\xff\xff\xff\xffK\x00tq\x08bc_codecs\nencode\nq\tX\n\x00\x00\x00\x00\x00\x00\x00\xc2\x80\xc2\x84.Aq\nX\x06\x00\x00\x00latin1q\x0b\x86q\x0cRq\r\x86q\x0eRq\x0fX\x02\x00\x00\x00x0q\x10G?\xf0\x00\x00\x00\x00\x00\x00u.";

#[test]
fn pickled_numpy_scalars_are_named_in_the_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("PARAMS_numpy.pkl");
    fs::write(&path, NUMPY_SCALAR_PICKLE).unwrap();
    let err = load_parameter_map(&path).unwrap_err();
    assert!(matches!(err, EmriError::Format(_)));
    assert_eq!(err.info().code, "truth-numpy-scalar");
    assert_eq!(err.info().context["path"], path.display().to_string());
    assert!(err.info().hint.is_some());
}

#[test]
fn json_dictionary_and_missing_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truth.json");
    let mut map = prograde_map();
    map.remove("Phi_r0");
    fs::write(&path, serde_json::to_string(&map).unwrap()).unwrap();
    assert_eq!(load_parameter_map(&path).unwrap().len(), 11);
    let err = load_true_values(&path).unwrap_err();
    assert!(matches!(err, EmriError::Config(_)));
    assert_eq!(err.info().context["parameter"], "Phi_r0");
}

#[test]
fn whitespace_tables_skip_comments() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ordinary.txt");
    fs::write(&path, "# beta alpha snr\n0.1 -2.0 15.0\n\n0.2  3.0\t40.0 # trailing\n").unwrap();
    let table = read_text_table(&path).unwrap();
    assert_eq!(table, array![[0.1, -2.0, 15.0], [0.2, 3.0, 40.0]]);

    fs::write(&path, "1 2 3\n4 5\n").unwrap();
    assert_eq!(read_text_table(&path).unwrap_err().info().code, "table-columns");
}

#[test]
fn npy_chain_is_burned_in_and_flattened() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chain.npy");
    let chain = Array::from_shape_fn(IxDyn(&[5, 2, 3, 1, 2]), |idx| {
        if idx[1] == 0 { idx[0] as f64 } else { -1.0 }
    });
    write_npy(&path, &chain).unwrap();
    let samples = load_chain(&path, None, 2).unwrap();
    assert_eq!(samples.dim(), (9, 2));
    assert!(samples.iter().all(|v| *v >= 2.0));
}
