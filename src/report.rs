use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{CourseSummary, PriorityLevel, ScoredAssignment};

const UNASSIGNED_COURSE: &str = "(no course)";

pub fn summarize_by_course(scored: &[ScoredAssignment]) -> Vec<CourseSummary> {
    let mut map: std::collections::HashMap<String, (usize, f64, usize)> =
        std::collections::HashMap::new();

    for item in scored {
        let course = item
            .record
            .course
            .clone()
            .unwrap_or_else(|| UNASSIGNED_COURSE.to_string());
        let entry = map.entry(course).or_insert((0, 0.0, 0));
        entry.0 += 1;
        entry.1 += item.priority.score;
        if item.priority.level == PriorityLevel::High {
            entry.2 += 1;
        }
    }

    let mut summaries: Vec<CourseSummary> = map
        .into_iter()
        .map(|(course, (count, total_score, high_count))| CourseSummary {
            course,
            count,
            avg_score: if count == 0 {
                0.0
            } else {
                total_score / count as f64
            },
            high_count,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.avg_score
            .total_cmp(&a.avg_score)
            .then_with(|| a.course.cmp(&b.course))
    });
    summaries
}

pub fn level_counts(scored: &[ScoredAssignment]) -> [(PriorityLevel, usize); 3] {
    let count = |level: PriorityLevel| {
        scored
            .iter()
            .filter(|item| item.priority.level == level)
            .count()
    };
    [
        (PriorityLevel::High, count(PriorityLevel::High)),
        (PriorityLevel::Medium, count(PriorityLevel::Medium)),
        (PriorityLevel::Low, count(PriorityLevel::Low)),
    ]
}

pub fn describe_due(item: &ScoredAssignment) -> String {
    match item.priority.days_until_due {
        Some(days) if days < 0 => format!("overdue by {} day(s)", -days),
        Some(0) => "due now".to_string(),
        Some(1) => "due within a day".to_string(),
        Some(days) => format!("due in {days} days"),
        None => "no due date".to_string(),
    }
}

pub fn build_report(generated_at: DateTime<Utc>, scored: &[ScoredAssignment], limit: usize) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Assignment Priority Digest");
    let _ = writeln!(output);
    let _ = writeln!(output, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(output, "Assignments scored: {}", scored.len());
    let _ = writeln!(output);

    let _ = writeln!(output, "## Priority Levels");
    for (level, count) in level_counts(scored) {
        let _ = writeln!(output, "- {level}: {count}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Assignments");
    if scored.is_empty() {
        let _ = writeln!(output, "No assignments to rank.");
    } else {
        for item in scored.iter().take(limit) {
            let _ = writeln!(
                output,
                "- [{}] {} ({}, {}) score {:.2}, {}",
                item.priority.level,
                item.record.title,
                item.record.course.as_deref().unwrap_or(UNASSIGNED_COURSE),
                item.priority.refined_type,
                item.priority.score,
                describe_due(item)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Courses");
    let courses = summarize_by_course(scored);
    if courses.is_empty() {
        let _ = writeln!(output, "No courses found.");
    } else {
        for summary in courses {
            let _ = writeln!(
                output,
                "- {}: {} assignments, avg score {:.2}, {} high",
                summary.course, summary.count, summary.avg_score, summary.high_count
            );
        }
    }

    let flagged: Vec<&ScoredAssignment> = scored
        .iter()
        .filter(|item| !item.priority.anomalies.is_empty())
        .collect();
    if !flagged.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Data Issues");
        for item in flagged {
            let _ = writeln!(
                output,
                "- {}: {} issue(s) scored with defaults",
                item.record.title,
                item.priority.anomalies.len()
            );
        }
    }

    output
}
