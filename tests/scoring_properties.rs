use assignment_priority::{
    calculate_priority, rank_assignments, AssignmentRecord, AssignmentType, PartialWeights,
    PriorityCalculator, PriorityLevel, ScoringConfig,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn sample_record(title: &str, kind: AssignmentType, due_in_hours: i64, points: Option<f64>) -> AssignmentRecord {
    AssignmentRecord {
        id: Some(format!("{title}-{due_in_hours}")),
        title: title.to_string(),
        due_date: Some((fixed_now() + Duration::hours(due_in_hours)).to_rfc3339()),
        kind,
        points,
        course: Some("MATH 221".to_string()),
        course_grade: None,
        grade_weight: None,
    }
}

fn variants() -> Vec<AssignmentRecord> {
    let mut records = Vec::new();
    let kinds = [
        AssignmentType::Assignment,
        AssignmentType::Quiz,
        AssignmentType::Discussion,
        AssignmentType::Announcement,
        AssignmentType::Exam,
    ];
    let titles = ["Homework 5", "Final Exam", "Quiz 7", "Week 3 discussion"];
    let points = [None, Some(0.0), Some(5.0), Some(45.0), Some(100.0), Some(500.0)];
    let grades = [None, Some(0.0), Some(0.55), Some(1.0)];
    let grade_weights = [None, Some(0.0), Some(25.0), Some(100.0)];

    for kind in kinds {
        for title in titles {
            for points in points {
                for (index, course_grade) in grades.iter().enumerate() {
                    let mut record = sample_record(title, kind, -48 + 24 * index as i64, points);
                    record.course_grade = *course_grade;
                    record.grade_weight = grade_weights[index];
                    records.push(record);
                }
            }
        }
    }
    records
}

#[test]
fn scores_stay_within_bounds() {
    let config = ScoringConfig::default();
    for record in variants() {
        let result = calculate_priority(&record, &config, fixed_now());
        assert!(
            (0.0..=1.5).contains(&result.score),
            "{} scored {}",
            record.title,
            result.score
        );
        assert!((0.0..=1.5).contains(&result.factors.time_urgency));
        assert!((0.0..=1.5).contains(&result.factors.points_weight));
        assert!((0.0..=1.0).contains(&result.factors.course_weight));
    }
}

#[test]
fn overdue_dominates_and_score_decays_with_distance() {
    let config = ScoringConfig::default();
    for kind in [AssignmentType::Assignment, AssignmentType::Quiz, AssignmentType::Discussion] {
        for points in [None, Some(8.0), Some(30.0), Some(120.0)] {
            let overdue = calculate_priority(
                &sample_record("Problem set", kind, -3, points),
                &config,
                fixed_now(),
            );

            let mut previous = f64::INFINITY;
            for days in 0..=30 {
                let record = sample_record("Problem set", kind, days * 24, points);
                let score = calculate_priority(&record, &config, fixed_now()).score;
                assert!(overdue.score >= score, "overdue lost to {days} days out");
                assert!(score <= previous, "score rose at {days} days out");
                previous = score;
            }
        }
    }
}

#[test]
fn larger_assignments_score_higher() {
    let config = ScoringConfig::default();
    for hours in [-5, 12, 60, 200, 600] {
        let big = calculate_priority(
            &sample_record("Project", AssignmentType::Assignment, hours, Some(100.0)),
            &config,
            fixed_now(),
        );
        let small = calculate_priority(
            &sample_record("Project", AssignmentType::Assignment, hours, Some(10.0)),
            &config,
            fixed_now(),
        );
        assert!(big.score >= small.score);
    }
}

#[test]
fn overdue_final_outranks_future_discussion() {
    let exam = sample_record("Final Exam", AssignmentType::Assignment, -1, Some(100.0));
    let discussion = sample_record("Discussion 3", AssignmentType::Discussion, 240, Some(10.0));
    let ranked = rank_assignments(&[discussion, exam], &ScoringConfig::default(), fixed_now());

    assert_eq!(ranked[0].record.title, "Final Exam");
    assert_eq!(ranked[0].priority.level, PriorityLevel::High);
    assert_eq!(ranked[0].priority.refined_type, AssignmentType::Exam);
    assert_eq!(ranked[1].priority.level, PriorityLevel::Low);
}

#[test]
fn sentinel_and_garbage_due_dates_never_fail() {
    let calculator = PriorityCalculator::default();
    for due in ["No due date set", "not a date", "Due: ???", "", "due today"] {
        let record = AssignmentRecord {
            title: "Reading".to_string(),
            due_date: Some(due.to_string()),
            ..AssignmentRecord::default()
        };
        let result = calculator.score(&record, fixed_now());
        assert!((0.0..=1.5).contains(&result.score), "{due:?}");
        assert!(result.factors.time_urgency > 0.0);
    }
}

#[test]
fn rejected_weights_leave_calculator_unchanged() {
    let mut calculator = PriorityCalculator::default();
    let before = format!("{:?}", calculator.config());

    let update = PartialWeights {
        grade_impact: Some(0.1),
        course_grade: Some(0.1),
        due_date: Some(0.1),
        types: None,
    };
    assert!(calculator.set_weights(&update).is_err());
    assert_eq!(format!("{:?}", calculator.config()), before);

    let valid = PartialWeights {
        grade_impact: Some(0.3),
        course_grade: Some(0.3),
        due_date: Some(0.4),
        types: None,
    };
    assert!(calculator.set_weights(&valid).is_ok());
    assert_eq!(calculator.config().weights.category.course_grade, 0.3);
}

#[test]
fn scored_output_serializes_with_camel_case_factors() {
    let record = sample_record("Quiz 7", AssignmentType::Quiz, 30, Some(15.0));
    let ranked = rank_assignments(&[record], &ScoringConfig::default(), fixed_now());
    let json = serde_json::to_value(&ranked[0]).unwrap();

    assert_eq!(json["title"], "Quiz 7");
    assert_eq!(json["type"], "quiz");
    assert!(json["priority"]["factors"]["timeUrgency"].is_number());
    assert!(json["priority"]["factors"]["pointsWeight"].is_number());
    assert!(json["priority"]["factors"]["courseWeight"].is_number());
    assert_eq!(json["priority"]["daysUntilDue"], 2);
}
