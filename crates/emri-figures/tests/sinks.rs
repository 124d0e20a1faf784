use std::fs;

use emri_core::EmriError;
use emri_figures::{
    AxisSpec, DirectorySink, Figure, FigureConfig, FigureSink, MemorySink, Panel, ScatterSeries,
};
use tempfile::tempdir;

fn figure(values: Vec<f64>) -> Figure {
    Figure::single(
        Panel::new(AxisSpec::linear("x"), AxisSpec::linear("y"))
            .with_scatter(ScatterSeries::indexed("series", values)),
    )
}

#[test]
fn directory_sink_overwrites_existing_files() {
    let dir = tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("figures"), FigureConfig::default());
    let path = sink.emit("Prograde_EMRI_glitch_biases", &figure(vec![1.0])).unwrap();
    assert_eq!(path, dir.path().join("figures/Prograde_EMRI_glitch_biases.svg"));
    let first = fs::read_to_string(&path).unwrap();
    sink.emit("Prograde_EMRI_glitch_biases", &figure(vec![1.0, 2.0, 3.0]))
        .unwrap();
    let second = fs::read_to_string(&path).unwrap();
    assert_ne!(first, second);
    assert_eq!(second.matches("<circle").count(), 3);
}

#[test]
fn memory_sink_keeps_rendered_svg() {
    let mut sink = MemorySink::new(FigureConfig::default());
    sink.emit("b", &figure(vec![1.0])).unwrap();
    sink.emit("a", &figure(vec![2.0])).unwrap();
    assert_eq!(sink.names(), vec!["a", "b"]);
    assert!(sink.get("a").unwrap().contains("<svg"));
    assert_eq!(sink.len(), 2);
}

#[test]
fn names_with_separators_are_rejected() {
    let mut sink = MemorySink::default();
    let err = sink.emit("../escape", &figure(vec![1.0])).unwrap_err();
    assert!(matches!(err, EmriError::Render(_)));
}
