use anyhow::Result;
use ndarray::{Array1, Array2};

use redeem_crossval::models::SvmClassifier;
use redeem_crossval::{CrossValidate, ParamGrid};

fn main() -> Result<()> {
    env_logger::init();

    // Two linearly separable groups, 10 samples each
    let mut data = Vec::with_capacity(40);
    let mut labels = Vec::with_capacity(20);
    for i in 0..10 {
        let offset = i as f64 * 0.1;
        data.extend_from_slice(&[offset, 1.0 - offset]);
        labels.push(0usize);
        data.extend_from_slice(&[3.0 + offset, 4.0 - offset]);
        labels.push(1usize);
    }
    let x = Array2::from_shape_vec((20, 2), data)?;
    let y = Array1::from_vec(labels);

    let grid = ParamGrid::new()
        .add("c", [0.1, 1.0, 10.0])
        .add("kernel", ["linear", "gauss"]);
    let mut cv = CrossValidate::new(grid, SvmClassifier::default(), 4, Some("f1"));
    cv.train(x.view(), y.view())?;

    println!("Best params: {:?}", cv.best_params());
    println!("Best f1: {:.4}", cv.best_score()?);
    Ok(())
}
