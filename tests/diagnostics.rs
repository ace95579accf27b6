//! Log output of the CrossValidate wrapper.
//!
//! Lives in its own test binary because it installs a global logger.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, Log, Metadata, Record};
use ndarray::{Array1, Array2};

use redeem_crossval::models::KNeighborsClassifier;
use redeem_crossval::{CrossValidate, ParamGrid};

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

/// Keeps every record emitted on the current thread.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

fn capture<F: FnOnce()>(f: F) -> Vec<(Level, String)> {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already set");
        log::set_max_level(log::LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
    f();
    RECORDS.with(|r| r.borrow_mut().drain(..).collect())
}

fn grid() -> ParamGrid {
    ParamGrid::new().add("k", [1i64, 3])
}

#[test]
fn untrained_best_params_warns() {
    let cv = CrossValidate::new(grid(), KNeighborsClassifier::default(), 3, None);
    let records = capture(|| {
        assert!(cv.best_params().is_empty());
    });
    assert!(
        records
            .iter()
            .any(|(level, msg)| *level == Level::Warn && msg.contains("not been performed")),
        "records: {:?}",
        records
    );
}

#[test]
fn untrained_best_model_is_silent() {
    let cv = CrossValidate::new(grid(), KNeighborsClassifier::default(), 3, None);
    let records = capture(|| {
        assert!(cv.best_model().is_none());
    });
    assert!(records.is_empty(), "records: {:?}", records);
}

#[test]
fn failed_train_logs_error_text() {
    let x = Array2::<f64>::zeros((12, 2));
    let y = Array1::from_vec(vec![0usize, 1, 0, 1]);
    let mut cv = CrossValidate::new(grid(), KNeighborsClassifier::default(), 3, None);

    let records = capture(|| {
        assert!(cv.train(x.view(), y.view()).is_err());
    });
    let errors: Vec<&String> = records
        .iter()
        .filter(|(level, _)| *level == Level::Error)
        .map(|(_, msg)| msg)
        .collect();
    assert_eq!(errors.len(), 1, "records: {:?}", records);
    assert!(errors[0].contains("An error occurred during training"));
    assert!(errors[0].contains("inconsistent numbers of samples"));
}
