mod common;

use std::fs;

use chrono::NaiveDate;
use common::{reference_day, session_at, setup_test_env, temp_base};
use seiva_core::{LoadOutcome, Reconciliation, SchoolStorage};
use seiva_domain::{
    Department, Employee, EventPatch, FinancialStatus, Grade, PayrollEntry, PayrollStatus,
    StudentPatch, Transaction,
};

#[test]
fn first_run_keeps_seed_and_persists_after_load() {
    let (mut session, storage, _config) = setup_test_env();
    assert_eq!(session.load(), LoadOutcome::Empty);
    assert!(storage.load().expect("load").is_none());

    session.refresh_financial_statuses();
    let payment = Transaction::income(6500.0, reference_day()).linked_to("3", ["outubro"]);
    let outcome = session.add_transaction(payment);
    assert!(matches!(
        outcome,
        Reconciliation::StudentUpdated { status: FinancialStatus::Paid, .. }
    ));

    let persisted = storage.load().expect("load").expect("snapshot written");
    assert_eq!(persisted.students.len(), 3);
    assert_eq!(persisted.transactions.len(), 10);
    let student = persisted
        .students
        .iter()
        .find(|student| student.id == "3")
        .expect("student 3");
    assert!(student.has_paid("outubro"));
}

#[test]
fn second_session_sees_first_sessions_writes() {
    let base = temp_base();
    {
        let (mut session, _) = session_at(&base, reference_day());
        session.load();
        assert!(session.delete_event("1"));
    }

    let (mut session, _) = session_at(&base, reference_day());
    assert!(matches!(session.load(), LoadOutcome::Restored { .. }));
    assert!(session.store().event("1").is_none());
    assert_eq!(session.store().events().len(), 3);
    assert!((session.store().kpis().delinquency_rate - 66.7).abs() < 1e-9);
}

#[test]
fn statuses_are_rederived_for_the_loading_day() {
    let base = temp_base();
    {
        let (session, _) = session_at(&base, reference_day());
        session.save().expect("save seed");
    }

    let january = NaiveDate::from_ymd_opt(2025, 1, 15).expect("date");
    let (mut session, _) = session_at(&base, january);
    session.load();
    assert!(session
        .store()
        .students()
        .iter()
        .all(|student| student.financial_status == FinancialStatus::Paid));
}

#[test]
fn corrupt_data_falls_back_to_seed_records() {
    let base = temp_base();
    let (session, storage) = session_at(&base, reference_day());
    session.save().expect("save seed");
    fs::write(storage.events_path(), "[{ broken").expect("corrupt events");

    let (mut session, _) = session_at(&base, reference_day());
    assert!(matches!(session.load(), LoadOutcome::Fallback { .. }));
    assert!(session.is_loaded());
    assert_eq!(session.store().students().len(), 3);
    assert_eq!(session.store().events().len(), 4);
}

#[test]
fn restoring_a_backup_replaces_every_collection() {
    let (mut session, storage, _config) = setup_test_env();
    session.load();
    let before = session.store().snapshot();
    let backup = storage.backup(&before, Some("inicio")).expect("backup");

    assert!(session.delete_event("2"));
    session.add_transaction(Transaction::expense(1200.0, reference_day()));
    assert_ne!(session.store().snapshot(), before);

    let restored = storage.restore_backup(&backup).expect("restore");
    session.replace_all(restored);
    assert_eq!(session.store().snapshot(), before);
    assert_eq!(storage.load().expect("load"), Some(before));
}

#[test]
fn profile_and_agenda_edits_are_written_through() {
    let (mut session, storage, _config) = setup_test_env();
    session.load();

    let patch = StudentPatch {
        grade: Some(Grade::Sixth),
        email: Some("ana.m@escola.co.mz".into()),
        ..StudentPatch::default()
    };
    assert!(session.patch_student("2", patch));
    assert!(!session.patch_student("99", StudentPatch::default()));

    let mut event = session.store().event("3").expect("seed event 3").clone();
    event.title = "Reunião Geral".into();
    assert!(session.update_event(event));
    assert!(session.patch_event(
        "4",
        EventPatch {
            location: Some(None),
            ..EventPatch::default()
        }
    ));

    let persisted = storage.load().expect("load").expect("snapshot written");
    let student = persisted.students.iter().find(|s| s.id == "2").expect("student 2");
    assert_eq!(student.grade, Grade::Sixth);
    assert_eq!(student.financial_status, FinancialStatus::Late);
    let titles: Vec<&str> = persisted.events.iter().map(|e| e.title.as_str()).collect();
    assert!(titles.contains(&"Reunião Geral"));
    let event = persisted.events.iter().find(|e| e.id == "4").expect("event 4");
    assert!(event.location.is_none());
}

#[test]
fn payroll_changes_reach_disk_and_the_next_session() {
    let base = temp_base();
    {
        let (mut session, _) = session_at(&base, reference_day());
        session.load();
        let cook = Employee::new("5", "Rosa Nhantumbo", "Cozinheira", Department::GeneralServices, 9000.0);
        session.add_payroll_entry(PayrollEntry::for_employee("p5", &cook, "Novembro 2024"));
        session.add_employee(cook);
        assert!(session.set_payroll_status("p4", PayrollStatus::Paid));
        assert!(!session.set_payroll_status("p404", PayrollStatus::Paid));
    }

    let (mut session, storage) = session_at(&base, reference_day());
    assert!(matches!(session.load(), LoadOutcome::Restored { ref warnings } if warnings.is_empty()));
    assert!(storage.payroll_path().exists());
    assert_eq!(session.store().employees().len(), 5);
    let settled = session
        .store()
        .payroll()
        .iter()
        .find(|entry| entry.id == "p4")
        .expect("entry p4");
    assert_eq!(settled.payment_date, Some(reference_day()));
    assert_eq!(session.store().payroll_summary().outstanding, 11600.0 + 9000.0);
}
