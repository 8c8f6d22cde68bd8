use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};

use ml_facade::config::{load_config, DatasetConfig, FacadeConfig};
use ml_facade::{MachineLearningFacade, TrainingReport};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("ML_FACADE_LOG", "info"))
        .init();

    let matches = Command::new("ml-facade")
        .version(clap::crate_version!())
        .about("Train classification models and report their lifecycle")
        .arg(
            Arg::new("config")
                .help("Path to a JSON run configuration")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("models")
                .short('m')
                .long("models")
                .help(
                    "Models to train, in order (logistic_regression, svm, random_forest). \
                     Overrides the models listed in the configuration file.",
                )
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(clap::builder::NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new("test_size")
                .long("test-size")
                .help("Proportion of rows held out for scoring")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("random_state")
                .long("random-state")
                .help("Seed for the train/test shuffle")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Train on a headered CSV (features then an integer label) instead of Iris")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the training report as JSON on stdout")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config = build_config(&matches)?;
    let models = config.models.clone();

    let mut facade = MachineLearningFacade::new(config).context("Failed to set up trainers")?;
    facade.initialize_trainers();
    let report = facade
        .train_models(models.as_slice())
        .context("Training run aborted")?;

    log_report(&report);
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn build_config(matches: &ArgMatches) -> Result<FacadeConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config(path)?,
        None => FacadeConfig::default(),
    };

    if let Some(models) = matches.get_many::<String>("models") {
        config.models = models.cloned().collect();
    }
    if let Some(test_size) = matches.get_one::<f64>("test_size") {
        config.split.test_size = *test_size;
    }
    if let Some(random_state) = matches.get_one::<u64>("random_state") {
        config.split.random_state = *random_state;
    }
    if let Some(path) = matches.get_one::<PathBuf>("csv") {
        config.dataset = DatasetConfig::Csv { path: path.clone() };
    }

    config.split.validate()?;
    Ok(config)
}

fn log_report(report: &TrainingReport) {
    log::info!("----- Training Summary -----");
    for summary in &report.trained {
        match summary.max_iterations {
            Some(max_iter) => log::info!(
                "{:<20} accuracy {:>5.1}%  progress {:>3}%  max_iter {}",
                summary.model.as_str(),
                summary.accuracy * 100.0,
                summary.progress,
                max_iter
            ),
            None => log::info!(
                "{:<20} accuracy {:>5.1}%  progress {:>3}%",
                summary.model.as_str(),
                summary.accuracy * 100.0,
                summary.progress
            ),
        }
    }
    for name in &report.unrecognized {
        log::info!("{:<20} not recognized", name);
    }
    log::info!("----------------------------");
}
