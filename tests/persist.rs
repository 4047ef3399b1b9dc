//! Artifact round-trip tests: a persisted model must predict exactly like
//! the in-memory model it came from.

use ndarray::{Array1, Array2};

use storecast::features::{CategoricalEncoder, ImputationStats};
use storecast::model::{ModelMeta, SalesModel};
use storecast::training::{EvalSet, GbdtParams, GbdtTrainer, Rmspe, SquaredLoss, Verbosity};
use storecast::{Dataset, Parallelism, FEATURE_NAMES, N_FEATURES};

/// Train a small real ensemble on synthetic feature vectors.
fn trained_model() -> (SalesModel, Dataset) {
    let n_rows = 160;
    let mut features = Vec::with_capacity(n_rows * N_FEATURES);
    let mut targets = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        let mut row = [0.0f32; N_FEATURES];
        row[0] = 2014.0 + (i % 2) as f32; // Year
        row[1] = (1 + i % 12) as f32; // Month
        row[3] = (i % 7) as f32; // DayOfWeek
        row[5] = (1 + i % 5) as f32; // Store
        row[8] = 100.0 * (1 + i % 9) as f32; // CompetitionDistance
        row[10] = (i % 2) as f32; // Promo
        features.extend_from_slice(&row);
        targets.push(1500.0 + 400.0 * row[5] + 220.0 * row[3] + 300.0 * row[10]);
    }
    let dataset = Dataset::new(
        Array2::from_shape_vec((n_rows, N_FEATURES), features).unwrap(),
        Array1::from_vec(targets),
    )
    .unwrap();

    let params = GbdtParams {
        n_rounds: 25,
        learning_rate: 0.2,
        max_depth: 4,
        early_stopping_rounds: 10,
        verbosity: Verbosity::Silent,
        ..Default::default()
    };
    let trainer = GbdtTrainer::new(SquaredLoss, Rmspe, params);
    let eval_sets = [EvalSet::new("valid", &dataset)];
    let outcome = trainer
        .train(&dataset, &eval_sets, Parallelism::Sequential)
        .unwrap();

    let meta = ModelMeta::new(FEATURE_NAMES.iter().map(|s| s.to_string()).collect())
        .with_best_iteration(outcome.best_iteration, outcome.best_score);
    let encoder = CategoricalEncoder::from_vocabularies(
        vec!["a".into(), "b".into(), "c".into(), "d".into()],
        vec!["a".into(), "b".into(), "c".into()],
        vec!["0".into(), "a".into(), "b".into(), "c".into()],
    );
    let model = SalesModel::new(
        outcome.forest,
        meta,
        encoder,
        ImputationStats { competition_distance: 795.0 },
    );
    (model, dataset)
}

#[test]
fn save_load_reproduces_predictions_exactly() {
    let (model, dataset) = trained_model();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales_model.json");

    model.save(&path).unwrap();
    let loaded = SalesModel::load(&path).unwrap();

    assert_eq!(loaded.n_trees(), model.n_trees());
    assert_eq!(loaded.meta(), model.meta());
    assert_eq!(loaded.encoder(), model.encoder());
    assert_eq!(loaded.imputation(), model.imputation());

    // Bit-for-bit prediction parity on every row.
    let before = model.predict_batch(dataset.features(), Parallelism::Sequential);
    let after = loaded.predict_batch(dataset.features(), Parallelism::Sequential);
    assert_eq!(before, after);

    let mut probe = [0.0f32; N_FEATURES];
    probe[0] = 2015.0;
    probe[5] = 3.0;
    assert_eq!(model.predict_row(&probe), loaded.predict_row(&probe));
}

#[test]
fn artifact_survives_a_second_round_trip() {
    let (model, _) = trained_model();
    let dir = tempfile::tempdir().unwrap();

    let first_path = dir.path().join("first.json");
    model.save(&first_path).unwrap();
    let first = SalesModel::load(&first_path).unwrap();

    let second_path = dir.path().join("second.json");
    first.save(&second_path).unwrap();
    let second = SalesModel::load(&second_path).unwrap();

    assert_eq!(first.forest(), second.forest());
    let bytes_first = std::fs::read(&first_path).unwrap();
    let bytes_second = std::fs::read(&second_path).unwrap();
    assert_eq!(bytes_first, bytes_second, "serialization is stable");
}

#[test]
fn truncated_json_is_rejected() {
    let (model, _) = trained_model();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales_model.json");
    model.save(&path).unwrap();

    let mut bytes = std::fs::read(&path).unwrap();
    bytes.truncate(bytes.len() / 2);
    std::fs::write(&path, bytes).unwrap();

    assert!(SalesModel::load(&path).is_err());
}
