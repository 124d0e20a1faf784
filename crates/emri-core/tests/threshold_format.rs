use emri_core::GlitchThreshold;

#[test]
fn thresholds_render_as_directory_suffixes() {
    let rendered: Vec<String> = GlitchThreshold::study_ladder()
        .into_iter()
        .map(|threshold| threshold.directory_name())
        .collect();
    assert_eq!(
        rendered,
        vec![
            "max_glitch_SNR_inf",
            "max_glitch_SNR_400.0",
            "max_glitch_SNR_90.0",
            "max_glitch_SNR_8.0",
        ]
    );
}

#[test]
fn thresholds_parse_numbers_and_inf() {
    let inf: GlitchThreshold = "inf".parse().unwrap();
    assert!(inf.is_unmitigated());
    let eight: GlitchThreshold = "8".parse().unwrap();
    assert_eq!(eight.to_string(), "8.0");
    assert!("-3".parse::<GlitchThreshold>().is_err());
    assert!("loud".parse::<GlitchThreshold>().is_err());
}

#[test]
fn thresholds_serialize_as_strings() {
    let json = serde_json::to_string(&GlitchThreshold::study_ladder()).unwrap();
    assert_eq!(json, r#"["inf","400.0","90.0","8.0"]"#);
    let back: Vec<GlitchThreshold> = serde_json::from_str(r#"["inf", 400, 90.0, "8.0"]"#).unwrap();
    assert_eq!(back, GlitchThreshold::study_ladder());
}

#[test]
fn extreme_thresholds_use_signed_two_digit_exponents() {
    let render = |value: f64| GlitchThreshold::new(value).unwrap().to_string();
    assert_eq!(render(1e16), "1e+16");
    assert_eq!(render(2.5e20), "2.5e+20");
    assert_eq!(render(1e-5), "1e-05");
    assert_eq!(render(1.5e-7), "1.5e-07");
    assert_eq!(render(1e-4), "0.0001");
    assert_eq!(render(1e15), "1000000000000000.0");
    assert_eq!(
        GlitchThreshold::new(1e300).unwrap().directory_name(),
        "max_glitch_SNR_1e+300"
    );
}
