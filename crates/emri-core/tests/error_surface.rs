use emri_core::errors::{EmriError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("path", "data_files/EMRI_fisher/Fisher_Prograde_EMRI.h5")
        .with_hint("check the data root")
}

#[test]
fn linalg_error_surface() {
    let err = EmriError::LinAlg(sample_info("fisher-singular", "matrix is singular"));
    assert_eq!(err.info().code, "fisher-singular");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = EmriError::Io(sample_info("read", "not found"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("io [read] not found (path=data_files"));
    assert!(rendered.ends_with("; check the data root"));
}

#[test]
fn shape_helper_records_expected_and_actual() {
    let err = EmriError::shape("columns", 12, 11);
    assert_eq!(err.info().context["expected"], "12");
    assert_eq!(err.info().context["actual"], "11");
}

#[test]
fn errors_round_trip_json() {
    let err = EmriError::Export(sample_info("hdf5-unavailable", "no hdf5"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"Export\""));
    let decoded: EmriError = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, err);
}

#[test]
fn context_added_later_keeps_the_family() {
    let err = EmriError::shape("columns", 12, 11).with_context("path", "biases.npy");
    assert_eq!(err.family(), "Shape");
    assert_eq!(
        err.to_string(),
        "shape [columns] array shape mismatch (actual=11, expected=12, path=biases.npy)"
    );
}
