use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use serde::Serialize;
use std::path::PathBuf;

use redeem_crossval::config::load_config;
use redeem_crossval::io::read_labeled_csv;
use redeem_crossval::model_selection::{CandidateResult, CvScores};
use redeem_crossval::models::build_model;
use redeem_crossval::{CrossValidate, ParamSet};

/// Summary written by `search --output_file`.
#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    metric: &'a str,
    k_fold: usize,
    best_params: ParamSet,
    best_score: f64,
    candidates: &'a [CandidateResult],
}

fn data_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .help("Path to the search configuration file (JSON)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .help("Path to the labelled training data (.csv or .tsv)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("label_column")
                .short('l')
                .long("label_column")
                .help("Name of the column holding the integer class labels")
                .default_value("label")
                .value_parser(clap::builder::NonEmptyStringValueParser::new()),
        )
}

fn run_search(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<PathBuf>("config")
        .context("missing config path")?;
    let data_path = matches.get_one::<PathBuf>("data").context("missing data path")?;
    let label_column = matches
        .get_one::<String>("label_column")
        .context("missing label column")?;

    let config = load_config(config_path)?;
    let data = read_labeled_csv(data_path, label_column)?;

    let model = build_model(&config.model);
    let mut cv = CrossValidate::from_config(&config, model);
    cv.train(data.x.view(), data.y.view())
        .context("Hyperparameter search failed")?;

    let best_params = cv.best_params();
    let best_score = cv.best_score()?;
    println!("Best parameters:");
    for (name, value) in &best_params {
        println!("  {} = {}", name, value);
    }
    println!("Best {}: {:.4}", cv.metric(), best_score);

    if let Some(output) = matches.get_one::<PathBuf>("output_file") {
        let report = SearchReport {
            metric: cv.metric(),
            k_fold: cv.k_fold(),
            best_params,
            best_score,
            candidates: cv.cv_results().unwrap_or(&[]),
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(output, json)
            .with_context(|| format!("Failed to write report: {}", output.display()))?;
        log::info!("Search report written to {}", output.display());
    }

    Ok(())
}

fn run_score(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<PathBuf>("config")
        .context("missing config path")?;
    let data_path = matches.get_one::<PathBuf>("data").context("missing data path")?;
    let label_column = matches
        .get_one::<String>("label_column")
        .context("missing label column")?;
    let folds = *matches.get_one::<usize>("folds").context("missing fold count")?;

    let config = load_config(config_path)?;
    let data = read_labeled_csv(data_path, label_column)?;
    let model = build_model(&config.model);

    let scores = CrossValidate::cv_score(
        &model,
        data.x.view(),
        data.y.view(),
        folds,
        &config.metric,
    )
    .context("Cross-validation failed")?;

    for (fold, score) in scores.iter().enumerate() {
        println!("Fold {}: {:.4}", fold, score);
    }
    println!(
        "Mean {}: {:.4} (std {:.4})",
        config.metric,
        scores.as_slice().mean(),
        scores.as_slice().std()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("REDEEM_LOG", "error,redeem_crossval=info"))
        .init();

    let matches = Command::new("redeem-crossval")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Cross-validated hyperparameter search for classifier models")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            data_args(
                Command::new("search")
                    .about("Run an exhaustive grid search and report the best parameters"),
            )
            .arg(
                Arg::new("output_file")
                    .short('o')
                    .long("output_file")
                    .help("Write a JSON report of every candidate to this file")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .subcommand(
            data_args(
                Command::new("score")
                    .about("Score the configured model with shuffled stratified k-fold cross-validation"),
            )
            .arg(
                Arg::new("folds")
                    .short('k')
                    .long("folds")
                    .help("Number of folds")
                    .default_value("5")
                    .value_parser(clap::value_parser!(usize)),
            ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("search", sub)) => run_search(sub),
        Some(("score", sub)) => run_score(sub),
        _ => unreachable!("subcommand_required prevents this"),
    }
}
