use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, WeightError};
use crate::models::AssignmentType;

pub const WEIGHT_SUM_EPSILON: f64 = 0.001;
pub const SCORE_CEILING: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub grade_impact: f64,
    pub course_grade: f64,
    pub due_date: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            grade_impact: 0.35,
            course_grade: 0.25,
            due_date: 0.4,
        }
    }
}

impl CategoryWeights {
    pub fn total(&self) -> f64 {
        self.grade_impact + self.course_grade + self.due_date
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        check_value("grade_impact", self.grade_impact)?;
        check_value("course_grade", self.course_grade)?;
        check_value("due_date", self.due_date)?;

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(WeightError::InvalidTotal { total });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeWeights {
    pub exam: f64,
    pub quiz: f64,
    pub assignment: f64,
    pub discussion: f64,
    pub announcement: f64,
}

impl Default for TypeWeights {
    fn default() -> Self {
        Self {
            exam: 1.3,
            quiz: 1.2,
            assignment: 1.0,
            discussion: 0.6,
            announcement: 0.4,
        }
    }
}

impl TypeWeights {
    pub fn weight_for(&self, kind: AssignmentType) -> f64 {
        match kind {
            AssignmentType::Exam => self.exam,
            AssignmentType::Quiz => self.quiz,
            AssignmentType::Assignment => self.assignment,
            AssignmentType::Discussion => self.discussion,
            AssignmentType::Announcement => self.announcement,
        }
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        let ordered = [
            ("exam", self.exam),
            ("quiz", self.quiz),
            ("assignment", self.assignment),
            ("discussion", self.discussion),
            ("announcement", self.announcement),
        ];
        for (name, value) in ordered {
            check_value(name, value)?;
        }
        if ordered.windows(2).any(|pair| pair[1].1 > pair[0].1) {
            return Err(WeightError::TypeOrder);
        }
        Ok(())
    }
}

fn check_value(name: &'static str, value: f64) -> Result<(), WeightError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WeightError::InvalidValue { name, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub category: CategoryWeights,
    pub types: TypeWeights,
}

/// Overrides coming from the settings store. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialWeights {
    pub grade_impact: Option<f64>,
    pub course_grade: Option<f64>,
    pub due_date: Option<f64>,
    pub types: Option<TypeWeights>,
}

impl PartialWeights {
    pub fn is_empty(&self) -> bool {
        self.grade_impact.is_none()
            && self.course_grade.is_none()
            && self.due_date.is_none()
            && self.types.is_none()
    }
}

impl WeightConfig {
    pub fn merged(&self, update: &PartialWeights) -> Result<WeightConfig, WeightError> {
        let category = CategoryWeights {
            grade_impact: update.grade_impact.unwrap_or(self.category.grade_impact),
            course_grade: update.course_grade.unwrap_or(self.category.course_grade),
            due_date: update.due_date.unwrap_or(self.category.due_date),
        };
        let types = update.types.unwrap_or(self.types);

        category.validate()?;
        types.validate()?;
        Ok(WeightConfig { category, types })
    }

    /// Applies `update` only if the result is valid; otherwise `self` is left untouched.
    pub fn set_weights(&mut self, update: &PartialWeights) -> Result<(), WeightError> {
        match self.merged(update) {
            Ok(next) => {
                *self = next;
                tracing::debug!(
                    grade_impact = self.category.grade_impact,
                    course_grade = self.category.course_grade,
                    due_date = self.category.due_date,
                    "weights updated"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "rejected weight update, keeping previous weights");
                Err(err)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
        }
    }
}

impl LevelThresholds {
    pub fn validate(&self, max_score: f64) -> Result<(), ConfigError> {
        check_setting("thresholds.high", self.high)?;
        check_setting("thresholds.medium", self.medium)?;
        if self.medium > self.high {
            return Err(ConfigError::Invalid(format!(
                "medium threshold ({}) must not exceed high threshold ({})",
                self.medium, self.high
            )));
        }
        if self.high > max_score {
            tracing::warn!(
                high = self.high,
                max_score,
                "high threshold is above the maximum score; nothing will rank high"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencySchedule {
    pub overdue: f64,
    pub due_within_day: f64,
    pub near_term: f64,
    pub near_term_days: i64,
    pub decay_horizon_days: i64,
    pub horizon_floor: f64,
    pub far_future: f64,
    pub no_due_date_days: i64,
}

impl Default for UrgencySchedule {
    fn default() -> Self {
        Self {
            overdue: 1.5,
            due_within_day: 1.2,
            near_term: 1.0,
            near_term_days: 3,
            decay_horizon_days: 14,
            horizon_floor: 0.3,
            far_future: 0.2,
            no_due_date_days: 14,
        }
    }
}

impl UrgencySchedule {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tiers = [
            ("urgency.overdue", self.overdue),
            ("urgency.due_within_day", self.due_within_day),
            ("urgency.near_term", self.near_term),
            ("urgency.horizon_floor", self.horizon_floor),
            ("urgency.far_future", self.far_future),
        ];
        for (name, value) in tiers {
            check_setting(name, value)?;
        }
        if tiers.windows(2).any(|pair| pair[1].1 > pair[0].1) {
            return Err(ConfigError::Invalid(
                "urgency tiers must not increase from overdue to far_future".to_string(),
            ));
        }
        if self.near_term_days < 1 || self.near_term_days > self.decay_horizon_days {
            return Err(ConfigError::Invalid(format!(
                "urgency.near_term_days ({}) must be within 1..=decay_horizon_days ({})",
                self.near_term_days, self.decay_horizon_days
            )));
        }
        if self.no_due_date_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "urgency.no_due_date_days must not be negative, got {}",
                self.no_due_date_days
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointBucket {
    pub min_points: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsPolicy {
    pub below_buckets: f64,
    pub unknown_high_stakes: f64,
    pub unknown_default: f64,
    pub exam_keyword_boost: f64,
    pub quiz_keyword_boost: f64,
    pub cap: f64,
    /// Checked in order; the first bucket whose `min_points` is met wins.
    pub buckets: Vec<PointBucket>,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        let bucket = |min_points, weight| PointBucket { min_points, weight };
        Self {
            below_buckets: 0.3,
            unknown_high_stakes: 0.7,
            unknown_default: 0.5,
            exam_keyword_boost: 1.3,
            quiz_keyword_boost: 1.1,
            cap: 1.5,
            buckets: vec![
                bucket(100.0, 1.0),
                bucket(50.0, 0.9),
                bucket(20.0, 0.7),
                bucket(10.0, 0.5),
            ],
        }
    }
}

impl PointsPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_setting("points.below_buckets", self.below_buckets)?;
        check_setting("points.unknown_high_stakes", self.unknown_high_stakes)?;
        check_setting("points.unknown_default", self.unknown_default)?;
        check_setting("points.exam_keyword_boost", self.exam_keyword_boost)?;
        check_setting("points.quiz_keyword_boost", self.quiz_keyword_boost)?;
        check_setting("points.cap", self.cap)?;
        for bucket in &self.buckets {
            check_setting("points.buckets.min_points", bucket.min_points)?;
            check_setting("points.buckets.weight", bucket.weight)?;
        }
        if self
            .buckets
            .windows(2)
            .any(|pair| pair[1].min_points > pair[0].min_points)
        {
            return Err(ConfigError::Invalid(
                "points.buckets must be listed from the largest min_points down".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadlineBoosts {
    pub overdue: f64,
    pub due_within_day: f64,
    pub high_points: f64,
    pub high_points_threshold: f64,
}

impl Default for DeadlineBoosts {
    fn default() -> Self {
        Self {
            overdue: 1.5,
            due_within_day: 1.3,
            high_points: 1.2,
            high_points_threshold: 50.0,
        }
    }
}

impl DeadlineBoosts {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_setting("boosts.overdue", self.overdue)?;
        check_setting("boosts.due_within_day", self.due_within_day)?;
        check_setting("boosts.high_points", self.high_points)?;
        check_setting("boosts.high_points_threshold", self.high_points_threshold)
    }
}

/// Everything the scorer reads. Passed by reference into every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub unknown_course_weight: f64,
    pub max_score: f64,
    pub weights: WeightConfig,
    pub thresholds: LevelThresholds,
    pub urgency: UrgencySchedule,
    pub points: PointsPolicy,
    pub boosts: DeadlineBoosts,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            unknown_course_weight: 0.85,
            max_score: SCORE_CEILING,
            weights: WeightConfig::default(),
            thresholds: LevelThresholds::default(),
            urgency: UrgencySchedule::default(),
            points: PointsPolicy::default(),
            boosts: DeadlineBoosts::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_setting("max_score", self.max_score)?;
        if self.max_score > SCORE_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_score must be within 0..={SCORE_CEILING}, got {}",
                self.max_score
            )));
        }
        check_setting("unknown_course_weight", self.unknown_course_weight)?;
        if self.unknown_course_weight > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "unknown_course_weight must be within 0..=1, got {}",
                self.unknown_course_weight
            )));
        }
        self.weights.category.validate()?;
        self.weights.types.validate()?;
        self.thresholds.validate(self.max_score)?;
        self.urgency.validate()?;
        self.points.validate()?;
        self.boosts.validate()
    }
}

fn check_setting(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be a finite non-negative number, got {value}"
        )))
    }
}
