use chrono::NaiveDate;
use todo_core::{DayOfWeek, Frequency, Recurrence, Task, TaskValidationError};
use uuid::Uuid;

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[test]
fn task_new_sets_defaults() {
    let task = Task::new("hello", date("2024-01-01"));

    assert!(!task.id.is_nil());
    assert_eq!(task.title, "hello");
    assert_eq!(task.description, None);
    assert_eq!(task.end_date, None);
    assert_eq!(task.recurrence, None);
    assert_eq!(task.created_at, None);
    assert!(task.validate().is_ok());
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = Task::with_id(Uuid::nil(), "invalid", date("2024-01-01")).unwrap_err();
    assert_eq!(err, TaskValidationError::NilId);
}

#[test]
fn serialization_uses_flat_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut task = Task::with_id(id, "gym", date("2024-01-01"))
        .unwrap()
        .repeating(
            Recurrence::new(Frequency::Weekly)
                .every(2)
                .on([DayOfWeek::Wednesday, DayOfWeek::Monday]),
        );
    task.end_date = Some(date("2024-12-31"));
    task.created_at = Some(1_704_067_200_000);

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "gym");
    assert_eq!(json["start_date"], "2024-01-01");
    assert_eq!(json["end_date"], "2024-12-31");
    assert_eq!(json["recurrence_type"], "Weekly");
    assert_eq!(json["recurrence_interval"], 2);
    assert_eq!(json["days_of_week"], serde_json::json!(["Monday", "Wednesday"]));
    assert_eq!(json["created_at"], 1_704_067_200_000_i64);

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn one_off_task_serializes_null_recurrence() {
    let task = Task::new("dentist", date("2024-02-02"));
    let json = serde_json::to_value(&task).unwrap();
    assert!(json["recurrence_type"].is_null());
    assert!(json["recurrence_interval"].is_null());
    assert!(json["days_of_week"].is_null());
}

#[test]
fn deserialize_reads_recurrence_like_a_create_request() {
    let one_off: Task = serde_json::from_value(serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "dentist",
        "start_date": "2024-02-02",
        "recurrence_type": "none",
        "days_of_week": null
    }))
    .unwrap();
    assert_eq!(one_off.recurrence, None);

    let weekly: Task = serde_json::from_value(serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "gym",
        "start_date": "2024-01-01",
        "recurrence_type": "weekly",
        "recurrence_interval": 0,
        "days_of_week": ["monday"]
    }))
    .unwrap();
    assert_eq!(
        weekly.recurrence,
        Some(Recurrence::new(Frequency::Weekly).on([DayOfWeek::Monday]))
    );
}

#[test]
fn deserialize_rejects_unknown_recurrence_type() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "tick",
        "start_date": "2024-01-01",
        "recurrence_type": "Hourly"
    });

    let err = serde_json::from_value::<Task>(value).unwrap_err();
    assert!(
        err.to_string().contains("unknown recurrence type `Hourly`"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_end_before_start() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "trip",
        "start_date": "2024-03-10",
        "end_date": "2024-03-01"
    });

    let err = serde_json::from_value::<Task>(value).unwrap_err();
    assert!(
        err.to_string()
            .contains("end_date (2024-03-01) must be >= start_date (2024-03-10)"),
        "unexpected error: {err}"
    );
}
