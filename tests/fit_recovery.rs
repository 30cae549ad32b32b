use lumi_fit::{fit_tracks_per_bc, FitOpts};
use lumi_pmf::{InteractionPmfTable, MixtureConfig};
use lumi_sim::{generator, SourceSpec};

fn build_table() -> InteractionPmfTable {
    let source = SourceSpec::default().build().expect("default source");
    let config = MixtureConfig {
        max_measurements: 200,
        max_interactions: 80,
    };
    InteractionPmfTable::build(&source, &config).expect("table build")
}

#[test]
fn fit_recovers_the_generated_mu() {
    let table = build_table();
    let mu_true = 10.0;
    let dataset = generator::generate(&table, mu_true, 10_000, 4711).expect("synthetic data");

    let report = fit_tracks_per_bc(&table, &dataset.counts, &FitOpts::default()).expect("fit");

    assert!(report.converged, "{}", report.summary());
    assert!(
        (report.mu - mu_true).abs() / mu_true < 0.05,
        "recovered {} from true {mu_true}",
        report.mu
    );
    assert!(
        report.chi2_per_ndf < 3.0,
        "poor fit quality: {}",
        report.summary()
    );
    let uncertainties = report.uncertainties.expect("covariance");
    assert!(uncertainties.mu > 0.0);
    assert!(uncertainties.mu < mu_true);
}

#[test]
fn fitted_norm_tracks_the_recorded_events() {
    let table = build_table();
    let dataset = generator::generate(&table, 8.0, 10_000, 1234).expect("synthetic data");

    let report = fit_tracks_per_bc(&table, &dataset.counts, &FitOpts::default()).expect("fit");

    let recorded: f64 = dataset.counts.iter().sum();
    assert!(report.converged, "{}", report.summary());
    assert!(
        (report.norm - recorded).abs() / recorded < 0.05,
        "norm {} against {} recorded events",
        report.norm,
        recorded
    );
}
