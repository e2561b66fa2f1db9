use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ImportError;
use crate::models::AssignmentRecord;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    List(Vec<AssignmentRecord>),
    Wrapped { assignments: Vec<AssignmentRecord> },
}

pub fn load_records(path: &Path) -> Result<Vec<AssignmentRecord>, ImportError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let mut records = match extension.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("json") => read_json(path)?,
        _ => return Err(ImportError::UnsupportedFormat(path.to_path_buf())),
    };

    for record in records.iter_mut() {
        if record.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            record.id = Some(format!("import-{}", Uuid::new_v4()));
        }
    }

    tracing::info!(count = records.len(), path = %path.display(), "loaded assignment records");
    Ok(records)
}

fn read_csv(path: &Path) -> Result<Vec<AssignmentRecord>, ImportError> {
    let csv_error = |source| ImportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<AssignmentRecord>() {
        records.push(result.map_err(csv_error)?);
    }
    Ok(records)
}

fn read_json(path: &Path) -> Result<Vec<AssignmentRecord>, ImportError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let payload: JsonPayload = serde_json::from_str(&raw).map_err(|source| ImportError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match payload {
        JsonPayload::List(records) => records,
        JsonPayload::Wrapped { assignments } => assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentType;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_empty_cells_stay_unknown() {
        let file = write_temp(
            ".csv",
            "id,title,dueDate,type,points,course,courseGrade,gradeWeight\n\
             a1,Quiz 3,2026-10-20T23:59:00Z,online_quiz,,CHEM 201,,\n\
             ,Reading,No due date,assignment,5,CHEM 201,0.91,10\n",
        );
        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("a1"));
        assert_eq!(records[0].kind, AssignmentType::Quiz);
        assert_eq!(records[0].points, None);
        assert_eq!(records[0].course_grade, None);
        assert_eq!(records[1].points, Some(5.0));
        assert_eq!(records[1].grade_weight, Some(10.0));
        assert!(records[1].id.as_deref().unwrap().starts_with("import-"));
    }

    #[test]
    fn json_accepts_list_or_wrapped_payload() {
        let list = write_temp(
            ".json",
            r#"[{"title":"Essay","dueDate":"Due: 2026-10-25","type":"assignment","points":50}]"#,
        );
        let wrapped = write_temp(
            ".json",
            r#"{"assignments":[{"id":"x","title":"Week 4 discussion","type":"discussion_topic"}]}"#,
        );

        let from_list = load_records(list.path()).unwrap();
        assert_eq!(from_list[0].points, Some(50.0));
        assert_eq!(from_list[0].due_date.as_deref(), Some("Due: 2026-10-25"));

        let from_wrapped = load_records(wrapped.path()).unwrap();
        assert_eq!(from_wrapped[0].kind, AssignmentType::Discussion);
        assert_eq!(from_wrapped[0].id.as_deref(), Some("x"));
    }

    #[test]
    fn rejects_unknown_extensions() {
        let file = write_temp(".txt", "title\nEssay\n");
        assert!(matches!(
            load_records(file.path()),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn reports_malformed_json() {
        let file = write_temp(".json", "{not json");
        assert!(matches!(load_records(file.path()), Err(ImportError::Json { .. })));
    }
}
