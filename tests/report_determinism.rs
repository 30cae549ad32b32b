use lumi_fit::{fit_tracks_per_bc, FitOpts};
use lumi_pmf::{InteractionPmfTable, MixtureConfig};
use lumi_sim::{generator, SourceSpec};

fn build_table() -> InteractionPmfTable {
    let source = SourceSpec::default().build().expect("default source");
    let config = MixtureConfig {
        max_measurements: 120,
        max_interactions: 40,
    };
    InteractionPmfTable::build(&source, &config).expect("table build")
}

#[test]
fn identical_seeds_produce_identical_reports() {
    let table = build_table();

    let data_a = generator::generate(&table, 6.0, 4_000, 77).expect("first dataset");
    let data_b = generator::generate(&table, 6.0, 4_000, 77).expect("second dataset");
    assert_eq!(data_a, data_b);

    let fit_a = fit_tracks_per_bc(&table, &data_a.counts, &FitOpts::default()).expect("first fit");
    let fit_b = fit_tracks_per_bc(&table, &data_b.counts, &FitOpts::default()).expect("second fit");

    assert_eq!(fit_a, fit_b);
    assert_eq!(fit_a.fit_hash, fit_b.fit_hash);
    assert!(fit_a.chi2.is_finite());
}

#[test]
fn distinct_seeds_produce_distinct_hashes() {
    let table = build_table();

    let data_a = generator::generate(&table, 6.0, 4_000, 77).expect("first dataset");
    let data_b = generator::generate(&table, 6.0, 4_000, 78).expect("second dataset");

    let fit_a = fit_tracks_per_bc(&table, &data_a.counts, &FitOpts::default()).expect("first fit");
    let fit_b = fit_tracks_per_bc(&table, &data_b.counts, &FitOpts::default()).expect("second fit");

    assert_ne!(fit_a.fit_hash, fit_b.fit_hash);
}
