use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    #[default]
    Assignment,
    Quiz,
    Discussion,
    Announcement,
    Exam,
}

impl AssignmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentType::Assignment => "assignment",
            AssignmentType::Quiz => "quiz",
            AssignmentType::Discussion => "discussion",
            AssignmentType::Announcement => "announcement",
            AssignmentType::Exam => "exam",
        }
    }

    /// Exam ranks highest, announcement lowest.
    pub fn stakes(self) -> u8 {
        match self {
            AssignmentType::Announcement => 0,
            AssignmentType::Discussion => 1,
            AssignmentType::Assignment => 2,
            AssignmentType::Quiz => 3,
            AssignmentType::Exam => 4,
        }
    }

    pub fn is_high_stakes(self) -> bool {
        matches!(self, AssignmentType::Quiz | AssignmentType::Exam)
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "assignment" | "assignments" | "planner_note" | "wiki_page" => {
                Ok(AssignmentType::Assignment)
            }
            "quiz" | "quizzes" | "online_quiz" | "quizzes_next" => Ok(AssignmentType::Quiz),
            "discussion" | "discussions" | "discussion_topic" => Ok(AssignmentType::Discussion),
            "announcement" | "announcements" => Ok(AssignmentType::Announcement),
            "exam" | "exams" | "test" => Ok(AssignmentType::Exam),
            other => Err(format!("unknown assignment type '{other}'")),
        }
    }
}

/// One assignment-like record as handed over by the detector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, alias = "due_date")]
    pub due_date: Option<String>,
    #[serde(
        rename = "type",
        alias = "kind",
        default,
        deserialize_with = "lenient_assignment_type"
    )]
    pub kind: AssignmentType,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default, alias = "course_grade")]
    pub course_grade: Option<f64>,
    #[serde(default, alias = "grade_weight")]
    pub grade_weight: Option<f64>,
}

fn lenient_assignment_type<'de, D>(deserializer: D) -> Result<AssignmentType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        None | Some("") => AssignmentType::default(),
        Some(value) => value.parse().unwrap_or_else(|err| {
            tracing::debug!(%err, "falling back to assignment type");
            AssignmentType::default()
        }),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::High => "high",
            PriorityLevel::Medium => "medium",
            PriorityLevel::Low => "low",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(PriorityLevel::High),
            "medium" => Ok(PriorityLevel::Medium),
            "low" => Ok(PriorityLevel::Low),
            other => Err(format!("unknown priority level '{other}'")),
        }
    }
}

/// Unweighted component values, kept for explaining a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityFactors {
    pub time_urgency: f64,
    pub points_weight: f64,
    pub course_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScoringAnomaly {
    UnparseableDueDate { raw: String },
    NonFinitePoints,
    NonFiniteGradeWeight,
    GradeWeightOutOfRange { value: f64 },
    CourseGradeAsPercent { value: f64 },
    CourseGradeOutOfRange { value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityResult {
    pub score: f64,
    pub level: PriorityLevel,
    pub factors: PriorityFactors,
    pub days_until_due: Option<i64>,
    pub refined_type: AssignmentType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<ScoringAnomaly>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredAssignment {
    #[serde(flatten)]
    pub record: AssignmentRecord,
    pub priority: PriorityResult,
}

#[derive(Debug, Clone)]
pub struct CourseSummary {
    pub course: String,
    pub count: usize,
    pub avg_score: f64,
    pub high_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lms_type_aliases() {
        assert_eq!("online_quiz".parse(), Ok(AssignmentType::Quiz));
        assert_eq!("Discussion Topic".parse(), Ok(AssignmentType::Discussion));
        assert_eq!("ANNOUNCEMENT".parse(), Ok(AssignmentType::Announcement));
        assert!("calendar_event".parse::<AssignmentType>().is_err());
    }

    #[test]
    fn unknown_type_in_json_falls_back_to_assignment() {
        let record: AssignmentRecord =
            serde_json::from_str(r#"{"title":"Lab 2","type":"calendar_event"}"#).unwrap();
        assert_eq!(record.kind, AssignmentType::Assignment);
        assert_eq!(record.points, None);
    }

    #[test]
    fn accepts_camel_and_snake_case_fields() {
        let camel: AssignmentRecord = serde_json::from_str(
            r#"{"title":"Essay","dueDate":"2026-10-21","courseGrade":0.82,"gradeWeight":15}"#,
        )
        .unwrap();
        let snake: AssignmentRecord = serde_json::from_str(
            r#"{"title":"Essay","due_date":"2026-10-21","course_grade":0.82,"grade_weight":15}"#,
        )
        .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.course_grade, Some(0.82));
    }

    #[test]
    fn levels_order_by_urgency() {
        assert!(PriorityLevel::High > PriorityLevel::Medium);
        assert!(PriorityLevel::Medium > PriorityLevel::Low);
        assert_eq!("Medium".parse(), Ok(PriorityLevel::Medium));
    }
}
