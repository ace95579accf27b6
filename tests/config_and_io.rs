//! Integration tests for config loading, CSV input and the model factory.

use std::io::Write;
use std::path::PathBuf;

use redeem_crossval::config::{load_config, ModelType};
use redeem_crossval::io::read_labeled_csv;
use redeem_crossval::models::{build_model, AnyClassifier, ClassifierModel};
use redeem_crossval::CrossValidate;

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("redeem_crossval_{}_{}", std::process::id(), name));
    let mut f = std::fs::File::create(&path).expect("failed to create fixture");
    f.write_all(contents.as_bytes()).expect("failed to write fixture");
    path
}

#[test]
fn config_drives_search_on_csv_data() {
    let config_path = write_fixture(
        "config.json",
        r#"{
            "param_grid": {"k": [1, 3]},
            "k_fold": 2,
            "metric": "accuracy",
            "model": {"Knn": {"k": 3}}
        }"#,
    );
    let data_path = write_fixture(
        "data.tsv",
        "x1\tx2\tlabel\n\
         0.0\t0.1\t0\n\
         0.2\t0.0\t0\n\
         0.1\t0.3\t0\n\
         0.3\t0.2\t0\n\
         6.0\t6.1\t1\n\
         6.2\t5.9\t1\n\
         5.8\t6.0\t1\n\
         6.1\t6.3\t1\n",
    );

    let config = load_config(&config_path).unwrap();
    assert_eq!(config.k_fold, 2);
    assert_eq!(config.model.model_type, ModelType::Knn { k: 3 });

    let data = read_labeled_csv(&data_path, "label").unwrap();
    assert_eq!(data.x.shape(), &[8, 2]);
    assert_eq!(data.feature_names, vec!["x1", "x2"]);

    let model = build_model(&config.model);
    assert_eq!(model.name(), "knn");

    let mut cv = CrossValidate::from_config(&config, model);
    assert_eq!(cv.k_fold(), 2);
    cv.train(data.x.view(), data.y.view()).unwrap();
    assert!(cv.is_trained());
    assert!((cv.best_score().unwrap() - 1.0).abs() < 1e-6);
    assert!(matches!(cv.best_model(), Some(AnyClassifier::Knn(_))));

    std::fs::remove_file(config_path).ok();
    std::fs::remove_file(data_path).ok();
}

#[test]
fn missing_config_reports_path() {
    let err = load_config("/nonexistent/redeem_crossval.json").unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

#[test]
fn invalid_label_is_rejected() {
    let data_path = write_fixture("bad_labels.csv", "f1,label\n1.0,yes\n");
    let err = read_labeled_csv(&data_path, "label").unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid label"));
    std::fs::remove_file(data_path).ok();
}
