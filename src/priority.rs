use chrono::{DateTime, Utc};

use crate::classify::{classify, Classification, TitleKeyword};
use crate::due_date::{parse_due_date, DueDate};
use crate::error::{ConfigError, WeightError};
use crate::models::{
    AssignmentRecord, PriorityFactors, PriorityLevel, PriorityResult, ScoredAssignment,
    ScoringAnomaly,
};
use crate::weights::{
    DeadlineBoosts, LevelThresholds, PartialWeights, PointsPolicy, ScoringConfig, UrgencySchedule,
    SCORE_CEILING,
};

/// Caller-owned scoring context. Updating weights needs `&mut`, so reads never race it.
#[derive(Debug, Clone, Default)]
pub struct PriorityCalculator {
    config: ScoringConfig,
}

impl PriorityCalculator {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn set_weights(&mut self, update: &PartialWeights) -> Result<(), WeightError> {
        self.config.weights.set_weights(update)
    }

    pub fn score(&self, record: &AssignmentRecord, now: DateTime<Utc>) -> PriorityResult {
        calculate_priority(record, &self.config, now)
    }

    pub fn score_now(&self, record: &AssignmentRecord) -> PriorityResult {
        self.score(record, Utc::now())
    }

    pub fn rank(&self, records: &[AssignmentRecord], now: DateTime<Utc>) -> Vec<ScoredAssignment> {
        rank_assignments(records, &self.config, now)
    }
}

pub fn calculate_priority(
    record: &AssignmentRecord,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> PriorityResult {
    let mut anomalies = Vec::new();
    let classification = classify(&record.title, record.kind);

    let due = parse_due_date(record.due_date.as_deref());
    if let DueDate::Unparseable(raw) = &due {
        tracing::warn!(title = %record.title, due_date = %raw, "unparseable due date, using neutral horizon");
        anomalies.push(ScoringAnomaly::UnparseableDueDate { raw: raw.clone() });
    }
    let days_until_due = due.days_until(now);
    let effective_days = days_until_due.unwrap_or(config.urgency.no_due_date_days);

    let time_urgency = time_urgency(effective_days, &config.urgency);
    let points = known_points(record.points, &mut anomalies);
    let grade_weight = known_grade_weight(record.grade_weight, &mut anomalies);
    let points_weight = points_weight(points, grade_weight, classification, &config.points);
    let course_weight = course_weight(record.course_grade, config.unknown_course_weight, &mut anomalies);

    let category = &config.weights.category;
    let base = time_urgency * category.due_date
        + points_weight * category.grade_impact
        + course_weight * category.course_grade;

    let type_weight = config.weights.types.weight_for(classification.refined);
    let boosted = base * type_weight * deadline_boost(days_until_due, points, &config.boosts);
    let score = clamp_score(boosted, config.max_score);

    for anomaly in &anomalies {
        tracing::debug!(title = %record.title, ?anomaly, "scored with defaults");
    }

    PriorityResult {
        score,
        level: priority_level(score, &config.thresholds),
        factors: PriorityFactors {
            time_urgency,
            points_weight,
            course_weight,
        },
        days_until_due,
        refined_type: classification.refined,
        anomalies,
    }
}

/// Scores every record and sorts by score, highest first. Ties keep input order.
pub fn rank_assignments(
    records: &[AssignmentRecord],
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> Vec<ScoredAssignment> {
    let mut scored: Vec<ScoredAssignment> = records
        .iter()
        .map(|record| ScoredAssignment {
            record: record.clone(),
            priority: calculate_priority(record, config, now),
        })
        .collect();

    scored.sort_by(|a, b| b.priority.score.total_cmp(&a.priority.score));
    scored
}

pub fn time_urgency(days_until_due: i64, schedule: &UrgencySchedule) -> f64 {
    if days_until_due <= 0 {
        return schedule.overdue;
    }
    if days_until_due == 1 {
        return schedule.due_within_day;
    }
    if days_until_due <= schedule.near_term_days {
        return schedule.near_term;
    }
    if days_until_due <= schedule.decay_horizon_days {
        let span = (schedule.decay_horizon_days - schedule.near_term_days).max(1) as f64;
        let progress = (days_until_due - schedule.near_term_days) as f64 / span;
        return schedule.near_term - progress * (schedule.near_term - schedule.horizon_floor);
    }
    schedule.far_future
}

pub fn points_weight(
    points: Option<f64>,
    grade_weight: Option<f64>,
    classification: Classification,
    policy: &PointsPolicy,
) -> f64 {
    let mut impact = match points {
        Some(points) => bucket_weight(points, policy),
        None if classification.refined.is_high_stakes() => policy.unknown_high_stakes,
        None => policy.unknown_default,
    };

    if let Some(grade_weight) = grade_weight {
        impact *= 1.0 + grade_weight / 100.0;
    }

    impact *= match classification.keyword {
        Some(TitleKeyword::Exam) => policy.exam_keyword_boost,
        Some(TitleKeyword::Quiz) => policy.quiz_keyword_boost,
        None => 1.0,
    };

    bounded(impact, policy.cap, SCORE_CEILING)
}

fn bucket_weight(points: f64, policy: &PointsPolicy) -> f64 {
    policy
        .buckets
        .iter()
        .find(|bucket| points >= bucket.min_points)
        .map(|bucket| bucket.weight)
        .unwrap_or(policy.below_buckets)
}

pub fn course_weight(
    course_grade: Option<f64>,
    unknown: f64,
    anomalies: &mut Vec<ScoringAnomaly>,
) -> f64 {
    let Some(grade) = course_grade else {
        return unknown;
    };

    if !grade.is_finite() || grade < 0.0 || grade > 100.0 {
        anomalies.push(ScoringAnomaly::CourseGradeOutOfRange { value: grade });
        return unknown;
    }

    let fraction = if grade > 1.0 {
        anomalies.push(ScoringAnomaly::CourseGradeAsPercent { value: grade });
        grade / 100.0
    } else {
        grade
    };
    (1.0 - fraction).clamp(0.0, 1.0)
}

fn known_points(points: Option<f64>, anomalies: &mut Vec<ScoringAnomaly>) -> Option<f64> {
    match points {
        Some(value) if !value.is_finite() => {
            anomalies.push(ScoringAnomaly::NonFinitePoints);
            None
        }
        // zero or negative points come from sources that had no value
        Some(value) if value <= 0.0 => None,
        other => other,
    }
}

fn known_grade_weight(weight: Option<f64>, anomalies: &mut Vec<ScoringAnomaly>) -> Option<f64> {
    let value = weight?;
    if !value.is_finite() {
        anomalies.push(ScoringAnomaly::NonFiniteGradeWeight);
        return None;
    }
    if !(0.0..=100.0).contains(&value) {
        anomalies.push(ScoringAnomaly::GradeWeightOutOfRange { value });
        return Some(value.clamp(0.0, 100.0));
    }
    Some(value)
}

fn deadline_boost(days_until_due: Option<i64>, points: Option<f64>, boosts: &DeadlineBoosts) -> f64 {
    let mut multiplier = match days_until_due {
        Some(days) if days <= 0 => boosts.overdue,
        Some(1) => boosts.due_within_day,
        _ => 1.0,
    };
    if points.is_some_and(|points| points >= boosts.high_points_threshold) {
        multiplier *= boosts.high_points;
    }
    multiplier
}

fn clamp_score(score: f64, max_score: f64) -> f64 {
    bounded(score, max_score, SCORE_CEILING)
}

/// Clamps into `[0, upper]`. An unusable `upper` falls back to `fallback`, NaN to 0.
fn bounded(value: f64, upper: f64, fallback: f64) -> f64 {
    let upper = if upper.is_finite() && upper >= 0.0 {
        upper
    } else {
        fallback
    };
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, upper)
}

pub fn priority_level(score: f64, thresholds: &LevelThresholds) -> PriorityLevel {
    if score >= thresholds.high {
        PriorityLevel::High
    } else if score >= thresholds.medium {
        PriorityLevel::Medium
    } else {
        PriorityLevel::Low
    }
}
