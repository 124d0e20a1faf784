use emri_figures::{
    render_svg, AxisSpec, BinnedSeries, Figure, FigureConfig, Panel, PieSlice, ReferenceLine,
    ScatterSeries,
};

fn scatter_figure() -> Figure {
    let labels: Vec<String> = ["M", "Phi_phi0", "a"].iter().map(|s| s.to_string()).collect();
    let panel = Panel::new(
        AxisSpec::categorical("Parameter", labels),
        AxisSpec::log("|bias| / sigma"),
    )
    .with_scatter(ScatterSeries::indexed("Glitch SNRs ≤ inf", vec![0.5, 2.0, 40.0]))
    .with_scatter(ScatterSeries::indexed("Glitch SNRs ≤ 8.0", vec![0.1, 0.2, 0.3]))
    .with_legend();
    Figure::single(panel)
}

#[test]
fn scatter_is_deterministic() {
    let config = FigureConfig {
        width: 400,
        height: 300,
    };
    let svg_a = render_svg(&scatter_figure(), &config).unwrap();
    let svg_b = render_svg(&scatter_figure(), &config).unwrap();
    assert_eq!(svg_a, svg_b);
    assert!(svg_a.starts_with("<svg"));
    assert!(svg_a.trim_end().ends_with("</svg>"));
    assert!(svg_a.contains("Glitch SNRs ≤ 8.0"));
    assert!(svg_a.contains("Phi_phi0"));
    // six data points plus one legend marker per series
    assert_eq!(svg_a.matches("<circle").count(), 8);
}

#[test]
fn cumulative_steps_and_reference_line() {
    let panel = Panel::new(AxisSpec::log("max R"), AxisSpec::linear("Cumulative probability"))
        .with_binned(BinnedSeries::step(
            Some("Glitch SNRs ≤ inf".into()),
            vec![0.1, 1.0, 10.0],
            vec![0.25, 1.0],
        ))
        .with_reference_line(ReferenceLine {
            x: 1.0,
            label: Some("R = 1".into()),
        })
        .with_legend();
    let svg = render_svg(&Figure::single(panel), &FigureConfig::default()).unwrap();
    assert!(svg.matches("<polyline").count() >= 2);
    assert!(svg.to_lowercase().contains("#1f77b4"));
    assert!(svg.contains("R = 1"));
}

#[test]
fn stacked_histograms_share_the_canvas() {
    let edges = vec![1.0, 10.0, 100.0];
    let counts = Panel::new(AxisSpec::log(""), AxisSpec::linear("Counts"))
        .with_binned(BinnedSeries::bars(None, edges.clone(), vec![3.0, 1.0]));
    let cdf = Panel::new(AxisSpec::log("Network SNR"), AxisSpec::linear("Cumulative density"))
        .with_binned(BinnedSeries::step(None, edges, vec![0.75, 1.0]));
    let svg = render_svg(&Figure::stacked(vec![counts, cdf]), &FigureConfig::default()).unwrap();
    assert!(svg.contains("Counts"));
    assert!(svg.contains("Cumulative density"));
    assert!(svg.contains("Network SNR"));
}

#[test]
fn pie_labels_escape_markup() {
    let figure = Figure::pie(vec![
        PieSlice {
            label: "a<b".into(),
            value: 3.0,
        },
        PieSlice {
            label: "zero".into(),
            value: 0.0,
        },
        PieSlice {
            label: "c".into(),
            value: 1.0,
        },
    ])
    .with_title("argmax R");
    let svg = render_svg(&figure, &FigureConfig::default()).unwrap();
    assert_eq!(svg.matches("<polygon").count(), 2);
    assert!(svg.contains("a&lt;b"));
    assert!(!svg.contains("zero"));
    assert!(svg.contains("argmax R"));
}

#[test]
fn empty_pie_says_so() {
    let figure = Figure::pie(vec![PieSlice {
        label: "none".into(),
        value: 0.0,
    }]);
    let svg = render_svg(&figure, &FigureConfig::default()).unwrap();
    assert_eq!(svg.matches("<polygon").count(), 0);
    assert!(svg.contains("no data"));
}
