use emri_core::{EmriConfiguration, EmriPreset, Parameter, ESTIMATED_PARAMETERS, WAVEFORM_MODEL};

#[test]
fn every_preset_is_within_physical_ranges() {
    for preset in EmriPreset::all() {
        let config = preset.configuration();
        assert!(config.physical_ranges_hold(), "{preset} out of range");
        assert!((-1.0..=1.0).contains(&config.a));
        assert!((0.0..=1.0).contains(&config.e0));
        assert_eq!(config.waveform_model, WAVEFORM_MODEL);
        assert_eq!(config.label, preset.label());
    }
}

#[test]
fn presets_carry_the_study_values() {
    let prograde = EmriPreset::Prograde.configuration();
    assert_eq!(prograde.mass, 1e6);
    assert_eq!(prograde.p0, 7.728);
    assert_eq!(prograde.dist, 1.3242);
    assert_eq!(prograde.dt, 5.0);

    let strongfield = EmriPreset::Strongfield.configuration();
    assert_eq!(strongfield.mass, 1e7);
    assert_eq!(strongfield.e0, 0.425);

    let retrograde = EmriPreset::Retrograde.configuration();
    assert_eq!(retrograde.a, -0.5);
    assert_eq!(retrograde.p0, 26.192);
    assert_eq!(retrograde.dt, 2.0);
}

#[test]
fn presets_resolve_by_short_name_and_label() {
    assert_eq!(
        EmriPreset::from_name("prograde").unwrap(),
        EmriPreset::Prograde
    );
    assert_eq!(
        EmriPreset::from_name("Strongfield_EMRI").unwrap(),
        EmriPreset::Strongfield
    );
    assert_eq!(
        EmriConfiguration::from_name("RETROGRADE").unwrap().label,
        "Retrograde_EMRI"
    );
    let err = EmriPreset::from_name("circular").unwrap_err();
    assert_eq!(err.info().code, "unknown-preset");
}

#[test]
fn estimated_values_follow_column_order() {
    let config = EmriPreset::Retrograde.configuration();
    let values = config.estimated_values();
    assert_eq!(values.len(), ESTIMATED_PARAMETERS.len());
    assert_eq!(values[Parameter::Mass.index()], 1e5);
    assert_eq!(values[Parameter::Spin.index()], -0.5);
    assert_eq!(values[Parameter::Distance.index()], 0.38055);
    assert_eq!(values[Parameter::RadialPhase.index()], 3.0);
}

#[test]
fn configuration_serializes_with_study_keys() {
    let json = serde_json::to_value(EmriPreset::Prograde.configuration()).unwrap();
    assert_eq!(json["M"], 1e6);
    assert_eq!(json["qS"], 0.8);
    assert_eq!(json["Phi_theta0"], 0.0);
    let back: EmriConfiguration = serde_json::from_value(json).unwrap();
    assert_eq!(back, EmriPreset::Prograde.configuration());
}
