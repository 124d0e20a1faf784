use std::path::{Path, PathBuf};

use emri_core::GlitchThreshold;
use emri_io::{background_index, label_from_samples_file, BiasSource, DataLayout};

#[test]
fn thresholds_render_like_python_floats() {
    let layout = DataLayout::default();
    assert_eq!(
        layout.bias_path(BiasSource::Errors, "Prograde_EMRI", GlitchThreshold::UNMITIGATED),
        PathBuf::from("data_files/EMRI_errors/max_glitch_SNR_inf/Prograde_EMRI_delta_theta_arr.npy")
    );
    let t400 = GlitchThreshold::new(400.0).unwrap();
    assert_eq!(
        layout.bias_path(BiasSource::Biases, "Retrograde_EMRI", t400),
        PathBuf::from("data_files/EMRI_biases/max_glitch_SNR_400.0/Retrograde_EMRI_delta_theta_arr.npy")
    );
    assert_eq!(
        layout.ratio_path("Strongfield_EMRI", GlitchThreshold::new(8.0).unwrap()),
        PathBuf::from("./Strongfield_EMRI_R_glitches_max_SNR_8.0.npy")
    );
}

#[test]
fn fisher_and_sample_paths() {
    let layout = DataLayout::with_root("/data");
    assert_eq!(
        layout.fisher_path("Prograde_EMRI"),
        PathBuf::from("/data/EMRI_fisher/Fisher_Prograde_EMRI.h5")
    );
    let samples = "Prograde_EMRI_M-1e06-mu-10-SNR-80.h5";
    assert_eq!(
        layout.glitchy_samples_path(samples, 3, GlitchThreshold::new(90.0).unwrap()),
        PathBuf::from(
            "/data/EMRI_mcmc_samples/max_glitch_SNR_90.0/BG_0003_PLUS_Prograde_EMRI_M-1e06-mu-10-SNR-80.h5"
        )
    );
    assert_eq!(
        layout.params_path(samples),
        PathBuf::from("/data/EMRI_mcmc_samples/max_glitch_SNR_inf/PARAMS_Prograde_EMRI_M-1e06-mu-10-SNR-80.h5")
    );
    assert_eq!(label_from_samples_file(samples), "Prograde_EMRI");
}

#[test]
fn background_files_expose_their_index() {
    assert_eq!(background_index(Path::new("dir/BG_0012_AET.h5")), Some("0012"));
    assert_eq!(background_index(Path::new("BG_7_AET.json")), Some("7"));
    assert_eq!(background_index(Path::new("notes_BG.h5")), None);
}
