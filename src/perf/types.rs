//! Learner results and the six fixed metrics they carry

use crate::error::{Error, Result};
use serde::de::{Error as _, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Number of panel columns in the metrics grid.
pub const GRID_COLS: usize = 3;
/// Number of panel rows in the metrics grid.
pub const GRID_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TrainTime,
    RmseTrain,
    MaeTrain,
    PredTime,
    RmseTest,
    MaeTest,
}

impl Metric {
    /// Row-major panel order.
    pub const ALL: [Metric; 6] = [
        Metric::TrainTime,
        Metric::RmseTrain,
        Metric::MaeTrain,
        Metric::PredTime,
        Metric::RmseTest,
        Metric::MaeTest,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            Metric::TrainTime => "train_time",
            Metric::RmseTrain => "rmse_train",
            Metric::MaeTrain => "mae_train",
            Metric::PredTime => "pred_time",
            Metric::RmseTest => "rmse_test",
            Metric::MaeTest => "mae_test",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::TrainTime => "Model Training",
            Metric::RmseTrain => "RMSE on Training Subset",
            Metric::MaeTrain => "MAE on Training Subset",
            Metric::PredTime => "Model Predicting",
            Metric::RmseTest => "RMSE on Testing Set",
            Metric::MaeTest => "MAE on Testing Set",
        }
    }

    /// Y-axis label; depends only on the panel column.
    pub fn y_label(self) -> &'static str {
        match self.grid_position().1 {
            0 => "Time (in seconds)",
            1 => "RMSE",
            _ => "MAE",
        }
    }

    /// `(row, col)` of the panel this metric is drawn in.
    pub fn grid_position(self) -> (usize, usize) {
        let j = self.index();
        (j / GRID_COLS, j % GRID_COLS)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSet {
    pub train_time: f64,
    pub rmse_train: f64,
    pub mae_train: f64,
    pub pred_time: f64,
    pub rmse_test: f64,
    pub mae_test: f64,
}

impl MetricSet {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TrainTime => self.train_time,
            Metric::RmseTrain => self.rmse_train,
            Metric::MaeTrain => self.mae_train,
            Metric::PredTime => self.pred_time,
            Metric::RmseTest => self.rmse_test,
            Metric::MaeTest => self.mae_test,
        }
    }

    /// Build from a loosely typed map, failing on the first absent key in
    /// panel order. Extra keys are ignored.
    pub fn from_map(learner: &str, map: &HashMap<String, f64>) -> Result<Self> {
        let lookup = |metric: Metric| {
            map.get(metric.key())
                .copied()
                .ok_or_else(|| Error::MissingMetric {
                    learner: learner.to_string(),
                    metric: metric.key().to_string(),
                })
        };

        Ok(Self {
            train_time: lookup(Metric::TrainTime)?,
            rmse_train: lookup(Metric::RmseTrain)?,
            mae_train: lookup(Metric::MaeTrain)?,
            pred_time: lookup(Metric::PredTime)?,
            rmse_test: lookup(Metric::RmseTest)?,
            mae_test: lookup(Metric::MaeTest)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(|m| (m, self.get(m)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnerResult {
    pub name: String,
    pub metrics: MetricSet,
}

impl LearnerResult {
    pub fn new(name: impl Into<String>, metrics: MetricSet) -> Result<Self> {
        let name = name.into();
        if let Some((metric, value)) = metrics.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidMetricValue {
                learner: name,
                metric: metric.key().to_string(),
                value,
            });
        }
        Ok(Self { name, metrics })
    }
}

impl fmt::Display for LearnerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Learner name to metrics, in insertion order. Position decides bar offset
/// and palette color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    learners: Vec<LearnerResult>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, metrics: MetricSet) -> Result<()> {
        let learner = LearnerResult::new(name, metrics)?;
        if self.get(&learner.name).is_some() {
            return Err(Error::DuplicateLearner(learner.name));
        }
        self.learners.push(learner);
        Ok(())
    }

    /// Chainable form of [`Results::push`].
    pub fn with(mut self, name: impl Into<String>, metrics: MetricSet) -> Result<Self> {
        self.push(name, metrics)?;
        Ok(self)
    }

    pub fn from_maps<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, HashMap<String, f64>)>,
        S: Into<String>,
    {
        let mut results = Self::new();
        for (name, map) in entries {
            let name = name.into();
            let metrics = MetricSet::from_map(&name, &map)?;
            results.push(name, metrics)?;
        }
        Ok(results)
    }

    pub fn get(&self, name: &str) -> Option<&LearnerResult> {
        self.learners.iter().find(|l| l.name == name)
    }

    pub fn len(&self) -> usize {
        self.learners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.learners.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LearnerResult> {
        self.learners.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.learners.iter().map(|l| l.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Results {
    type Item = &'a LearnerResult;
    type IntoIter = std::slice::Iter<'a, LearnerResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.learners.iter()
    }
}

impl Serialize for Results {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.learners.iter().map(|l| (&l.name, &l.metrics)))
    }
}

struct ResultsVisitor;

impl<'de> Visitor<'de> for ResultsVisitor {
    type Value = Results;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of learner name to metrics")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> std::result::Result<Results, M::Error> {
        let mut results = Results::new();
        while let Some((name, metrics)) = access.next_entry::<String, MetricSet>()? {
            results.push(name, metrics).map_err(M::Error::custom)?;
        }
        Ok(results)
    }
}

impl<'de> Deserialize<'de> for Results {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ResultsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(scale: f64) -> MetricSet {
        MetricSet {
            train_time: 1.0 * scale,
            rmse_train: 2.0 * scale,
            mae_train: 1.5 * scale,
            pred_time: 0.2 * scale,
            rmse_test: 2.5 * scale,
            mae_test: 1.8 * scale,
        }
    }

    #[test]
    fn test_metric_grid_positions() {
        let positions: Vec<_> = Metric::ALL.iter().map(|m| m.grid_position()).collect();
        assert_eq!(
            positions,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_metric_labels() {
        assert_eq!(Metric::TrainTime.y_label(), "Time (in seconds)");
        assert_eq!(Metric::PredTime.y_label(), "Time (in seconds)");
        assert_eq!(Metric::RmseTest.y_label(), "RMSE");
        assert_eq!(Metric::MaeTrain.y_label(), "MAE");
        assert_eq!(Metric::RmseTrain.title(), "RMSE on Training Subset");
        assert_eq!(Metric::MaeTest.title(), "MAE on Testing Set");
    }

    #[test]
    fn test_metric_key_lookup() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_key(metric.key()), Some(metric));
        }
        assert_eq!(Metric::from_key("r2_test"), None);
    }

    #[test]
    fn test_from_map_missing_key() {
        let mut map: HashMap<String, f64> = sample(1.0)
            .iter()
            .map(|(m, v)| (m.key().to_string(), v))
            .collect();
        map.remove("pred_time");

        let err = MetricSet::from_map("A", &map).unwrap_err();
        assert_eq!(
            err,
            Error::MissingMetric {
                learner: "A".to_string(),
                metric: "pred_time".to_string()
            }
        );
    }

    #[test]
    fn test_from_map_ignores_extra_keys() {
        let mut map: HashMap<String, f64> = sample(2.0)
            .iter()
            .map(|(m, v)| (m.key().to_string(), v))
            .collect();
        map.insert("r2_test".to_string(), 0.9);

        assert_eq!(MetricSet::from_map("A", &map).unwrap(), sample(2.0));
    }

    #[test]
    fn test_duplicate_learner_rejected() {
        let mut results = Results::new();
        results.push("A", sample(1.0)).unwrap();
        let err = results.push("A", sample(2.0)).unwrap_err();
        assert_eq!(err, Error::DuplicateLearner("A".to_string()));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut metrics = sample(1.0);
        metrics.rmse_test = f64::NAN;
        let err = LearnerResult::new("A", metrics).unwrap_err();
        assert!(matches!(err, Error::InvalidMetricValue { ref metric, .. } if metric == "rmse_test"));
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let json = r#"{
            "Zeta": {"train_time": 1.0, "rmse_train": 2.0, "mae_train": 1.5,
                     "pred_time": 0.2, "rmse_test": 2.5, "mae_test": 1.8},
            "Alpha": {"train_time": 3.0, "rmse_train": 1.0, "mae_train": 0.5,
                      "pred_time": 0.1, "rmse_test": 1.5, "mae_test": 0.8}
        }"#;
        let results: Results = serde_json::from_str(json).unwrap();
        assert_eq!(results.names(), vec!["Zeta", "Alpha"]);
        assert_eq!(results.get("Alpha").unwrap().metrics.train_time, 3.0);
    }

    #[test]
    fn test_deserialize_missing_metric_fails() {
        let json = r#"{"A": {"train_time": 1.0, "rmse_train": 2.0}}"#;
        let err = serde_json::from_str::<Results>(json).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_serialize_round_trip_keeps_names() {
        let results = Results::new()
            .with("B", sample(1.0))
            .unwrap()
            .with("A", sample(2.0))
            .unwrap();
        let json = serde_json::to_string(&results).unwrap();
        assert!(json.find("\"B\"").unwrap() < json.find("\"A\"").unwrap());
        let back: Results = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }
}
