use emri_core::GlitchThreshold;
use emri_stats::{
    fisher_mcmc_discrepancy, mcmc_bias, summarize, summarize_ratios, BiasArray, FisherMatrix,
    Statistic, ThresholdInput,
};
use ndarray::array;

fn fisher() -> FisherMatrix {
    FisherMatrix::from_rows(&[vec![4.0, 0.0], vec![0.0, 1.0]]).unwrap()
}

fn inputs() -> Vec<ThresholdInput> {
    vec![
        ThresholdInput {
            threshold: GlitchThreshold::UNMITIGATED,
            biases: BiasArray::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap(),
        },
        ThresholdInput {
            threshold: GlitchThreshold::new(8.0).unwrap(),
            biases: BiasArray::from_rows(&[vec![0.0, 0.0], vec![2.0, 2.0]]).unwrap(),
        },
    ]
}

#[test]
fn total_bias_per_threshold() {
    let summary = summarize(&fisher(), &inputs(), Statistic::TotalBias).unwrap();
    assert_eq!(summary.noise_std, vec![0.5, 1.0]);
    assert_eq!(summary.thresholds[0].values, vec![4.0, 3.0]);
    assert_eq!(summary.thresholds[1].values, vec![2.0, 1.0]);
    assert_eq!(summary.thresholds[1].backgrounds, 2);
}

#[test]
fn argmax_counts_sum_over_thresholds() {
    let summary = summarize(&fisher(), &inputs(), Statistic::ArgmaxCounts).unwrap();
    assert_eq!(summary.thresholds[0].values, vec![2.0, 0.0]);
    assert_eq!(summary.summed(), vec![4.0, 0.0]);
}

#[test]
fn max_ratio_is_per_background() {
    let summary = summarize(&fisher(), &inputs(), Statistic::MaxRatio).unwrap();
    assert_eq!(summary.thresholds[0].values, vec![2.0, 6.0]);
    assert_eq!(summary.thresholds[1].values, vec![0.0, 4.0]);
}

#[test]
fn total_precision_is_reproducible() {
    let statistic = Statistic::TotalPrecision {
        noise_samples: 500,
        seed: 1234,
    };
    let a = summarize(&fisher(), &inputs(), statistic).unwrap();
    let b = summarize(&fisher(), &inputs(), statistic).unwrap();
    assert_eq!(a, b);
    assert!(a.thresholds.iter().all(|t| t.values.iter().all(|v| *v > 0.0)));
}

#[test]
fn precomputed_ratios_only_support_rankings() {
    let summaries = summarize_ratios(&inputs(), Statistic::MaxRatio).unwrap();
    assert_eq!(summaries[0].values, vec![2.0, 4.0]);
    let err = summarize_ratios(&inputs(), Statistic::TotalBias).unwrap_err();
    assert_eq!(err.info().code, "statistic-needs-fisher");
}

#[test]
fn fisher_and_mcmc_biases_compare() {
    let samples = array![[1.0, 10.0], [3.0, 14.0]];
    let mcmc = mcmc_bias(&samples, &[1.0, 10.0]).unwrap();
    assert_eq!(mcmc, vec![1.0, 2.0]);
    let discrepancy = fisher_mcmc_discrepancy(&[2.0, 0.0], &mcmc, &[0.5, 1.0]).unwrap();
    assert_eq!(discrepancy, vec![2.0, 2.0]);
}
