//! Render the comparison chart for three regressors.
//!
//! An optional `viz.json` / `viz.pkl` in the working directory overrides the
//! default [`VizConfig`].

use perfviz::config::load_config;
use perfviz::{MetricSet, Results, VizConfig, logger, show_results};
use std::path::Path;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_stdout("info")?;

    let mut config = VizConfig::default();
    for candidate in ["viz.json", "viz.pkl"] {
        if Path::new(candidate).exists() {
            match load_config(candidate) {
                Ok(c) => {
                    info!("Loaded configuration from {}", candidate);
                    config = c;
                }
                Err(e) => warn!("Ignoring {}: {:#}", candidate, e),
            }
            break;
        }
    }

    let results = Results::new()
        .with(
            "LinearRegression",
            MetricSet {
                train_time: 0.012,
                rmse_train: 4.68,
                mae_train: 3.27,
                pred_time: 0.001,
                rmse_test: 4.93,
                mae_test: 3.42,
            },
        )?
        .with(
            "DecisionTree",
            MetricSet {
                train_time: 0.045,
                rmse_train: 0.0,
                mae_train: 0.0,
                pred_time: 0.002,
                rmse_test: 4.21,
                mae_test: 2.88,
            },
        )?
        .with(
            "RandomForest",
            MetricSet {
                train_time: 0.731,
                rmse_train: 1.29,
                mae_train: 0.86,
                pred_time: 0.024,
                rmse_test: 3.06,
                mae_test: 2.11,
            },
        )?;

    match show_results(&results, &config)? {
        Some(path) => info!("Chart written to {}", path.display()),
        None => info!("Visualization disabled in config"),
    }

    Ok(())
}
