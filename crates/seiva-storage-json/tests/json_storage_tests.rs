use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use seiva_core::{seed, CoreError, SchoolSnapshot, SchoolStorage};
use seiva_domain::{
    CalendarEvent, Department, Employee, EventCategory, Grade, PayrollEntry, PayrollStatus,
    Student, Transaction,
};
use seiva_storage_json::JsonSchoolStorage;
use tempfile::tempdir;

fn sample_snapshot() -> SchoolSnapshot {
    let start = Utc.with_ymd_and_hms(2024, 10, 25, 8, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 10, 29, 12, 0, 0).unwrap();
    SchoolSnapshot {
        students: vec![Student::new("1", "Cleyton Muianga", Grade::Sixth)
            .with_paid_months(["fevereiro", "março"])],
        transactions: vec![Transaction::income(
            5000.0,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        )
        .with_id("t1")
        .linked_to("1", ["março"])],
        events: vec![
            CalendarEvent::new("Exames Trimestrais", start, end, EventCategory::Academic)
                .with_id("e1"),
        ],
        ..SchoolSnapshot::default()
    }
}

#[test]
fn empty_directory_loads_as_none() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSchoolStorage::new(dir.path().join("data")).expect("create storage");
    assert!(storage.load().expect("load").is_none());
}

#[test]
fn json_storage_round_trips_snapshot() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSchoolStorage::new(dir.path().to_path_buf()).expect("create storage");
    let snapshot = sample_snapshot();

    storage.save(&snapshot).expect("save snapshot");
    assert!(storage.students_path().exists());
    assert!(storage.transactions_path().exists());
    assert!(storage.events_path().exists());

    let loaded = storage.load().expect("load").expect("snapshot present");
    assert_eq!(loaded, snapshot);
    assert_eq!(
        loaded.events[0].start,
        Utc.with_ymd_and_hms(2024, 10, 25, 8, 0, 0).unwrap()
    );

    let raw = fs::read_to_string(storage.events_path()).expect("read events");
    assert!(raw.contains("2024-10-25T08:00:00Z"), "{raw}");
}

#[test]
fn seed_snapshot_survives_disk() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSchoolStorage::new(dir.path().to_path_buf()).expect("create storage");
    let snapshot = seed::seed_snapshot(2024);
    storage.save(&snapshot).expect("save");
    assert_eq!(storage.load().expect("load"), Some(snapshot));
}

#[test]
fn missing_collection_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSchoolStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save(&sample_snapshot()).expect("save");
    fs::remove_file(storage.transactions_path()).expect("remove transactions");

    match storage.load() {
        Err(CoreError::Storage(message)) => assert!(message.contains("transactions.json")),
        other => panic!("expected storage error, got {other:?}"),
    }
}

#[test]
fn corrupt_collection_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSchoolStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save(&sample_snapshot()).expect("save");
    fs::write(storage.students_path(), "{ not json").expect("corrupt students");

    assert!(matches!(storage.load(), Err(CoreError::Serde(_))));
}

#[test]
fn backups_restore_and_rotate() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSchoolStorage::with_retention(dir.path().to_path_buf(), 2).expect("create storage");
    let original = sample_snapshot();
    storage.save(&original).expect("save");

    let info = storage
        .backup(&original, Some("Fim do Trimestre"))
        .expect("create backup");
    assert!(info.id.starts_with("school_"));
    assert!(info.id.contains("fim-do-trimestre"));
    assert!(info.created_at.is_some());

    storage.save(&SchoolSnapshot::default()).expect("overwrite");
    let restored = storage.restore_backup(&info).expect("restore backup");
    assert_eq!(restored, original);
    assert_eq!(storage.load().expect("load"), Some(original.clone()));

    storage.backup(&original, None).expect("second backup");
    let newest = storage.backup(&original, None).expect("third backup");
    let backups = storage.list_backups().expect("list backups");
    assert_eq!(backups.len(), 2);
    assert_eq!(backups[0].id, newest.id);
}

#[test]
fn data_directory_without_staff_files_loads_empty_staff() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSchoolStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save(&seed::seed_snapshot(2024)).expect("save");
    fs::remove_file(storage.employees_path()).expect("remove employees");
    fs::remove_file(storage.payroll_path()).expect("remove payroll");

    let loaded = storage.load().expect("load").expect("snapshot present");
    assert_eq!(loaded.students.len(), 3);
    assert!(loaded.employees.is_empty());
    assert!(loaded.payroll.is_empty());
}

#[test]
fn staff_and_payroll_round_trip() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSchoolStorage::new(dir.path().to_path_buf()).expect("create storage");
    let cook = Employee::new("7", "Rosa Nhantumbo", "Cozinheira", Department::GeneralServices, 9000.0);
    let mut entry = PayrollEntry::for_employee("p7", &cook, "Novembro 2024").with_adjustments(500.0, 1200.0);
    entry.status = PayrollStatus::Paid;
    entry.payment_date = NaiveDate::from_ymd_opt(2024, 11, 28);
    let snapshot = SchoolSnapshot {
        employees: vec![cook],
        payroll: vec![entry],
        ..sample_snapshot()
    };

    storage.save(&snapshot).expect("save");
    let raw = fs::read_to_string(storage.employees_path()).expect("read employees");
    assert!(raw.contains("Serviços Gerais"), "{raw}");

    let loaded = storage.load().expect("load").expect("snapshot present");
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.payroll[0].net_salary(), 8300.0);
}

#[test]
fn corrupt_payroll_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSchoolStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save(&sample_snapshot()).expect("save");
    fs::write(storage.payroll_path(), "[{").expect("corrupt payroll");

    assert!(matches!(storage.load(), Err(CoreError::Serde(_))));
}
