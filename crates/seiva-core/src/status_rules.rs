//! Tuition status rules.
//!
//! January is vacation and always `paid`. For every other month the student
//! is `paid` if the month's academic token is in their history, otherwise
//! `pending` up to and including [`DUE_DAY`] and `late` afterwards.

use chrono::{Datelike, NaiveDate};
use seiva_domain::{
    academic_month_for, academic_position, FinancialStatus, Student, ACADEMIC_MONTHS, DUE_DAY,
};

/// Classifies a payment history against `reference_date`.
///
/// Only membership of the current month's token matters; other tokens,
/// including unrecognized ones, are ignored.
pub fn derive_status<S: AsRef<str>>(paid_months: &[S], reference_date: NaiveDate) -> FinancialStatus {
    let Some(current) = academic_month_for(reference_date) else {
        return FinancialStatus::Paid;
    };
    if paid_months.iter().any(|month| month.as_ref() == current) {
        return FinancialStatus::Paid;
    }
    if reference_date.day() <= DUE_DAY {
        FinancialStatus::Pending
    } else {
        FinancialStatus::Late
    }
}

/// Academic months already due on `reference_date` and missing from the history.
///
/// Earlier months of the year are always due; the current one only after
/// [`DUE_DAY`]. Nothing is due in the vacation month.
pub fn overdue_months<S: AsRef<str>>(paid_months: &[S], reference_date: NaiveDate) -> Vec<&'static str> {
    let Some(current) = academic_month_for(reference_date).and_then(academic_position) else {
        return Vec::new();
    };
    let due = if reference_date.day() > DUE_DAY {
        current + 1
    } else {
        current
    };
    ACADEMIC_MONTHS
        .iter()
        .take(due)
        .filter(|token| !paid_months.iter().any(|month| month.as_ref() == **token))
        .copied()
        .collect()
}

/// Status of `student` on `reference_date`, ignoring the stored field.
pub fn student_status(student: &Student, reference_date: NaiveDate) -> FinancialStatus {
    derive_status(&student.paid_months, reference_date)
}

/// Re-derives and stores the status of `student`. Returns true when it changed.
pub(crate) fn refresh_status(student: &mut Student, reference_date: NaiveDate) -> bool {
    let status = student_status(student, reference_date);
    let changed = student.financial_status != status;
    student.financial_status = status;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use seiva_domain::ACADEMIC_MONTHS;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn vacation_month_is_always_paid() {
        let empty: [&str; 0] = [];
        for day in [1, 10, 11, 31] {
            assert_eq!(derive_status(&empty, date(1, day)), FinancialStatus::Paid);
            assert_eq!(
                derive_status(&["março"], date(1, day)),
                FinancialStatus::Paid
            );
        }
    }

    #[test]
    fn paid_current_month_ignores_day() {
        for (idx, token) in ACADEMIC_MONTHS.iter().enumerate() {
            let month = idx as u32 + 2;
            assert_eq!(derive_status(&[*token], date(month, 1)), FinancialStatus::Paid);
            assert_eq!(derive_status(&[*token], date(month, 28)), FinancialStatus::Paid);
        }
    }

    #[test]
    fn due_day_boundary_is_inclusive() {
        let history = ["fevereiro"];
        assert_eq!(derive_status(&history, date(3, 10)), FinancialStatus::Pending);
        assert_eq!(derive_status(&history, date(3, 11)), FinancialStatus::Late);
    }

    #[test]
    fn scenario_late_in_mid_march() {
        assert_eq!(derive_status(&["fevereiro"], date(3, 15)), FinancialStatus::Late);
    }

    #[test]
    fn scenario_pending_early_march() {
        assert_eq!(derive_status(&["fevereiro"], date(3, 5)), FinancialStatus::Pending);
    }

    #[test]
    fn scenario_january_with_empty_history() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(derive_status(&empty, date(1, 20)), FinancialStatus::Paid);
    }

    #[test]
    fn unknown_and_misspelled_tokens_are_ignored() {
        let history = ["marco", "Março", "janeiro", ""];
        assert_eq!(derive_status(&history, date(3, 20)), FinancialStatus::Late);
    }

    #[test]
    fn december_maps_to_last_token() {
        assert_eq!(
            derive_status(&["dezembro"], date(12, 20)),
            FinancialStatus::Paid
        );
        assert_eq!(
            derive_status(&["novembro"], date(12, 20)),
            FinancialStatus::Late
        );
    }

    #[test]
    fn overdue_months_count_gaps_up_to_the_due_day() {
        let history = ["fevereiro", "março", "abril", "maio", "junho", "julho", "agosto"];
        assert_eq!(overdue_months(&history, date(10, 20)), vec!["setembro", "outubro"]);
        assert_eq!(overdue_months(&history, date(10, 10)), vec!["setembro"]);

        let back_paid = ["outubro", "fevereiro"];
        assert_eq!(overdue_months(&back_paid, date(3, 15)), vec!["março"]);

        let empty: [&str; 0] = [];
        assert!(overdue_months(&empty, date(1, 25)).is_empty());
        assert_eq!(overdue_months(&empty, date(2, 11)), vec!["fevereiro"]);
    }

    #[test]
    fn refresh_reports_changes() {
        let mut student = Student::new("1", "Ana", seiva_domain::Grade::First);
        student.financial_status = FinancialStatus::Paid;
        assert!(refresh_status(&mut student, date(4, 20)));
        assert_eq!(student.financial_status, FinancialStatus::Late);
        assert!(!refresh_status(&mut student, date(4, 21)));
    }
}
