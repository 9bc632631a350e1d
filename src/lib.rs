//! # perfviz - learner performance charts
//!
//! perfviz draws a fixed 2x3 grid of bar charts comparing up to three
//! learners on training time, prediction time, and RMSE/MAE on the training
//! and testing sets.
//!
//! ## Modules
//!
//! - [`perf`] - Results model, palette, figure layout and rendering
//! - [`error`] - Error types and handling
//! - [`config`] - Config file loading (Pkl or JSON)
//! - [`logger`] - `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use perfviz::*;
//!
//! let metrics = MetricSet {
//!     train_time: 1.0,
//!     rmse_train: 2.0,
//!     mae_train: 1.5,
//!     pred_time: 0.2,
//!     rmse_test: 2.5,
//!     mae_test: 1.8,
//! };
//! let results = Results::new().with("A", metrics)?;
//!
//! let figure = build_figure(&results, &Palette::default())?;
//! assert_eq!(figure.panels().len(), 6);
//!
//! show_results(&results, &VizConfig::default())?;
//! # Ok::<(), perfviz::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod perf;

pub use error::*;
pub use perf::*;
