use anyhow::Result;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use redeem_crossval::model_selection::CvScores;
use redeem_crossval::models::KNeighborsClassifier;
use redeem_crossval::{CrossValidate, ParamGrid, DEFAULT_CV_SPLITS, DEFAULT_METRIC};

/// Three noisy clusters in 2D, `n_per_class` samples each.
fn synthetic(n_per_class: usize, seed: u64) -> Result<(Array2<f64>, Array1<usize>)> {
    let centers = [(0.0, 0.0), (3.0, 3.0), (0.0, 4.0)];
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(centers.len() * n_per_class * 2);
    let mut labels = Vec::with_capacity(centers.len() * n_per_class);

    for (label, (cx, cy)) in centers.iter().enumerate() {
        for _ in 0..n_per_class {
            data.push(cx + rng.gen_range(-1.5..1.5));
            data.push(cy + rng.gen_range(-1.5..1.5));
            labels.push(label);
        }
    }

    let x = Array2::from_shape_vec((labels.len(), 2), data)?;
    Ok((x, Array1::from_vec(labels)))
}

fn main() -> Result<()> {
    env_logger::init();

    let (x, y) = synthetic(30, 7)?;
    println!("Synthetic X shape: {:?}", x.shape());

    let grid = ParamGrid::new().add("k", [1i64, 3, 5, 7, 9, 11]);
    let mut cv = CrossValidate::new(grid, KNeighborsClassifier::default(), 5, Some("accuracy"));

    // Accessors before training: empty params, no model, error for the score
    println!("Before training: best_params = {:?}", cv.best_params());
    println!("Before training: best_score = {:?}", cv.best_score());

    cv.train(x.view(), y.view())?;

    println!("Best params: {:?}", cv.best_params());
    println!("Best accuracy: {:.4}", cv.best_score()?);
    if let Some(results) = cv.cv_results() {
        for r in results {
            println!(
                "  k = {:>2}  mean = {:.4}  std = {:.4}  rank = {}",
                r.params["k"], r.mean_score, r.std_score, r.rank
            );
        }
    }

    let model = KNeighborsClassifier::new(5);
    let scores = CrossValidate::cv_score(&model, x.view(), y.view(), DEFAULT_CV_SPLITS, DEFAULT_METRIC)?;
    println!(
        "cv_score(k=5): {:?} (mean {:.4})",
        scores,
        scores.as_slice().mean()
    );

    Ok(())
}
