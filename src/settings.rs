use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::weights::{
    DeadlineBoosts, LevelThresholds, PartialWeights, PointsPolicy, ScoringConfig, TypeWeights,
    UrgencySchedule,
};

/// User overrides as stored in the settings file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_course_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_weights: Option<TypeWeights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<LevelThresholds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencySchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<PointsPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boosts: Option<DeadlineBoosts>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_impact: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<f64>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Spells out every value of `config`, so the result loads back to the same config.
    pub fn from_config(config: &ScoringConfig) -> Self {
        let category = config.weights.category;
        Self {
            unknown_course_weight: Some(config.unknown_course_weight),
            max_score: Some(config.max_score),
            weights: Some(WeightOverrides {
                grade_impact: Some(category.grade_impact),
                course_grade: Some(category.course_grade),
                due_date: Some(category.due_date),
            }),
            type_weights: Some(config.weights.types),
            thresholds: Some(config.thresholds),
            urgency: Some(config.urgency),
            points: Some(config.points.clone()),
            boosts: Some(config.boosts),
        }
    }

    pub fn category_update(&self) -> PartialWeights {
        let overrides = self.weights.unwrap_or_default();
        PartialWeights {
            grade_impact: overrides.grade_impact,
            course_grade: overrides.course_grade,
            due_date: overrides.due_date,
            types: None,
        }
    }

    /// Builds the scoring config. `[weights]` and `[type_weights]` are applied
    /// separately; either one failing validation is dropped with a warning and
    /// keeps its defaults. Any other unusable value is an error.
    pub fn into_config(self) -> Result<ScoringConfig, ConfigError> {
        let mut config = ScoringConfig::default();

        // rejections are logged inside set_weights
        let category = self.category_update();
        if !category.is_empty() {
            let _ = config.weights.set_weights(&category);
        }
        if let Some(types) = self.type_weights {
            let update = PartialWeights {
                types: Some(types),
                ..PartialWeights::default()
            };
            let _ = config.weights.set_weights(&update);
        }

        if let Some(value) = self.unknown_course_weight {
            config.unknown_course_weight = value;
        }
        if let Some(value) = self.max_score {
            config.max_score = value;
        }
        if let Some(thresholds) = self.thresholds {
            config.thresholds = thresholds;
        }
        if let Some(urgency) = self.urgency {
            config.urgency = urgency;
        }
        if let Some(points) = self.points {
            config.points = points;
        }
        if let Some(boosts) = self.boosts {
            config.boosts = boosts;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Loads settings from `path` when given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ScoringConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = Settings::load(path)?.into_config()?;
            tracing::debug!(path = %path.display(), "loaded settings");
            Ok(config)
        }
        None => Ok(ScoringConfig::default()),
    }
}
