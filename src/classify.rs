use std::sync::LazyLock;

use regex::Regex;

use crate::models::AssignmentType;

static EXAM_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:exams?|finals?|midterms?)\b").expect("exam marker pattern is valid")
});

static QUIZ_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:quiz|quizzes)\b").expect("quiz marker pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKeyword {
    Exam,
    Quiz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub refined: AssignmentType,
    pub keyword: Option<TitleKeyword>,
}

/// Title text can raise the upstream type, never lower it: the detector labels
/// most things "assignment".
pub fn classify(title: &str, declared: AssignmentType) -> Classification {
    let keyword = title_keyword(title);
    let from_title = match keyword {
        Some(TitleKeyword::Exam) => AssignmentType::Exam,
        Some(TitleKeyword::Quiz) => AssignmentType::Quiz,
        None => declared,
    };
    let refined = if from_title.stakes() > declared.stakes() {
        from_title
    } else {
        declared
    };
    Classification { refined, keyword }
}

pub fn title_keyword(title: &str) -> Option<TitleKeyword> {
    if EXAM_MARKERS.is_match(title) {
        Some(TitleKeyword::Exam)
    } else if QUIZ_MARKERS.is_match(title) {
        Some(TitleKeyword::Quiz)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_markers_override_declared_type() {
        let result = classify("Final Exam", AssignmentType::Assignment);
        assert_eq!(result.refined, AssignmentType::Exam);
        assert_eq!(result.keyword, Some(TitleKeyword::Exam));
        assert_eq!(
            classify("Chem 101 Midterm Review", AssignmentType::Discussion).refined,
            AssignmentType::Exam
        );
    }

    #[test]
    fn exam_wins_over_quiz() {
        assert_eq!(title_keyword("Final quiz"), Some(TitleKeyword::Exam));
        assert_eq!(title_keyword("Quiz 4: Derivatives"), Some(TitleKeyword::Quiz));
    }

    #[test]
    fn keywords_never_lower_the_declared_type() {
        let result = classify("Quiz section of the exam packet", AssignmentType::Exam);
        assert_eq!(result.refined, AssignmentType::Exam);

        let retake = classify("Quiz 3 retake", AssignmentType::Exam);
        assert_eq!(retake.refined, AssignmentType::Exam);
        assert_eq!(retake.keyword, Some(TitleKeyword::Quiz));

        assert_eq!(
            classify("Quiz 3", AssignmentType::Discussion).refined,
            AssignmentType::Quiz
        );
    }

    #[test]
    fn matches_whole_words_only() {
        assert_eq!(title_keyword("Examine the sources"), None);
        assert_eq!(title_keyword("Finalize lab notebook"), None);
        assert_eq!(
            classify("Reading response", AssignmentType::Discussion).refined,
            AssignmentType::Discussion
        );
    }
}
