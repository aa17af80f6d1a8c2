use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use seiva_domain::{is_academic_month, CalendarEvent, Employee, PayrollEntry, Student, Transaction};

use crate::CoreError;

/// Everything the store persists, as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolSnapshot {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub payroll: Vec<PayrollEntry>,
}

/// Abstraction over persistence backends able to hold a school snapshot.
///
/// `load` is all-or-nothing: it yields a complete snapshot, `None` when
/// nothing was ever saved, or an error. It never returns partial data.
pub trait SchoolStorage: Send + Sync {
    fn load(&self) -> Result<Option<SchoolSnapshot>, CoreError>;
    fn save(&self, snapshot: &SchoolSnapshot) -> Result<(), CoreError>;
}

/// Detects dangling payment links and other anomalies within a snapshot.
pub fn snapshot_warnings(snapshot: &SchoolSnapshot) -> Vec<String> {
    let student_ids: HashSet<_> = snapshot.students.iter().map(|s| s.id.as_str()).collect();
    let mut warnings = Vec::new();

    for student in &snapshot.students {
        for month in student.paid_months.iter().filter(|m| !is_academic_month(m)) {
            warnings.push(format!(
                "student {} has unknown paid month `{}`",
                student.id, month
            ));
        }
    }

    for txn in &snapshot.transactions {
        if let Some(link) = txn.payment_link() {
            if !student_ids.contains(link.student_id.as_str()) {
                warnings.push(format!(
                    "transaction {} references unknown student {}",
                    txn.id, link.student_id
                ));
            }
            for month in link.paid_months.iter().filter(|m| !is_academic_month(m)) {
                warnings.push(format!(
                    "transaction {} pays unknown month `{}`",
                    txn.id, month
                ));
            }
        }
    }

    for event in &snapshot.events {
        if !event.has_valid_range() {
            warnings.push(format!("event {} ends before it starts", event.id));
        }
    }

    let employee_ids: HashSet<_> = snapshot.employees.iter().map(|e| e.id.as_str()).collect();
    for entry in &snapshot.payroll {
        if !employee_ids.contains(entry.employee_id.as_str()) {
            warnings.push(format!(
                "payroll entry {} references unknown employee {}",
                entry.id, entry.employee_id
            ));
        }
        if entry.net_salary() < 0.0 {
            warnings.push(format!("payroll entry {} has a negative net salary", entry.id));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use seiva_domain::{Department, EventCategory, Grade};

    #[test]
    fn warnings_flag_dangling_links_and_bad_tokens() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let snapshot = SchoolSnapshot {
            students: vec![Student::new("1", "Ana", Grade::First).with_paid_months(["Maio"])],
            transactions: vec![
                Transaction::income(10.0, date).with_id("t1").linked_to("2", ["maio"]),
                Transaction::income(10.0, date).with_id("t2").linked_to("1", ["maio"]),
            ],
            events: vec![CalendarEvent::new(
                "Backwards",
                start,
                start - chrono::Duration::hours(1),
                EventCategory::Event,
            )
            .with_id("e1")],
            ..SchoolSnapshot::default()
        };
        let warnings = snapshot_warnings(&snapshot);
        assert_eq!(warnings.len(), 3, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("`Maio`")));
        assert!(warnings.iter().any(|w| w.contains("unknown student 2")));
        assert!(warnings.iter().any(|w| w.contains("event e1")));
    }

    #[test]
    fn warnings_flag_payroll_for_unknown_staff() {
        let employee = Employee::new("1", "Rosa", "Cozinheira", Department::GeneralServices, 9000.0);
        let snapshot = SchoolSnapshot {
            payroll: vec![
                PayrollEntry::for_employee("p1", &employee, "Maio 2024"),
                PayrollEntry::for_employee("p2", &employee, "Maio 2024").with_adjustments(0.0, 9500.0),
            ],
            employees: vec![employee.clone()],
            ..SchoolSnapshot::default()
        };
        assert_eq!(snapshot_warnings(&snapshot), vec!["payroll entry p2 has a negative net salary"]);

        let orphaned = SchoolSnapshot {
            payroll: snapshot.payroll.clone(),
            ..SchoolSnapshot::default()
        };
        assert_eq!(snapshot_warnings(&orphaned).len(), 3);
    }

    #[test]
    fn clean_snapshot_has_no_warnings() {
        assert!(snapshot_warnings(&SchoolSnapshot::default()).is_empty());
    }
}
