//! Dashboard aggregates. Pure folds over the current collections; statuses
//! are re-derived for the supplied day rather than read from the stored field.

use chrono::{Datelike, NaiveDate};
use seiva_domain::{
    short_month_label, FinancialStatus, KpiSnapshot, MonthlyCashFlow, StatusBreakdown, Student,
    Transaction, TransactionKind,
};

use crate::status_rules::student_status;

pub struct KpiService;

impl KpiService {
    pub fn compute(students: &[Student], transactions: &[Transaction], today: NaiveDate) -> KpiSnapshot {
        let total_students = students.len();
        let total_revenue = completed_total(transactions, TransactionKind::Income);
        let total_expenses = completed_total(transactions, TransactionKind::Expense);
        let late = students
            .iter()
            .filter(|student| student_status(student, today) == FinancialStatus::Late)
            .count();
        let delinquency_rate = if total_students > 0 {
            round_one_decimal(late as f64 / total_students as f64 * 100.0)
        } else {
            0.0
        };

        KpiSnapshot {
            total_students,
            total_revenue,
            total_expenses,
            net_balance: total_revenue - total_expenses,
            delinquency_rate,
        }
    }

    /// Students who are `late` on `today`, in store order.
    pub fn late_students<'a>(students: &'a [Student], today: NaiveDate) -> Vec<&'a Student> {
        students
            .iter()
            .filter(|student| student_status(student, today) == FinancialStatus::Late)
            .collect()
    }

    pub fn status_breakdown(students: &[Student], today: NaiveDate) -> StatusBreakdown {
        students
            .iter()
            .fold(StatusBreakdown::default(), |mut acc, student| {
                match student_status(student, today) {
                    FinancialStatus::Paid => acc.paid += 1,
                    FinancialStatus::Pending => acc.pending += 1,
                    FinancialStatus::Late => acc.late += 1,
                }
                acc
            })
    }

    /// Completed income and expenses for the `months` calendar months ending
    /// with `today`'s month, oldest first.
    pub fn monthly_cash_flow(
        transactions: &[Transaction],
        today: NaiveDate,
        months: u32,
    ) -> Vec<MonthlyCashFlow> {
        let current = today.year() * 12 + today.month0() as i32;
        (0..months as i32)
            .rev()
            .map(|offset| {
                let index = current - offset;
                let year = index.div_euclid(12);
                let month = index.rem_euclid(12) as u32 + 1;
                let mut bucket = MonthlyCashFlow {
                    year,
                    month,
                    label: short_month_label(month).to_string(),
                    income: 0.0,
                    expenses: 0.0,
                };
                for txn in transactions.iter().filter(|txn| {
                    txn.is_completed() && txn.date.year() == year && txn.date.month() == month
                }) {
                    match txn.kind {
                        TransactionKind::Income => bucket.income += txn.amount,
                        TransactionKind::Expense => bucket.expenses += txn.amount,
                    }
                }
                bucket
            })
            .collect()
    }
}

fn completed_total(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|txn| txn.kind == kind && txn.is_completed())
        .map(|txn| txn.amount)
        .sum()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use seiva_domain::{Grade, TransactionStatus};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            Transaction::income(5000.0, day(2024, 10, 25)),
            Transaction::expense(2000.0, day(2024, 10, 24)),
            Transaction::income(3000.0, day(2024, 10, 20)).with_status(TransactionStatus::Pending),
        ]
    }

    #[test]
    fn pending_transactions_are_excluded() {
        let kpis = KpiService::compute(&[], &ledger(), day(2024, 10, 26));
        assert_eq!(kpis.total_revenue, 5000.0);
        assert_eq!(kpis.total_expenses, 2000.0);
        assert_eq!(kpis.net_balance, 3000.0);
    }

    #[test]
    fn cancelled_transactions_are_excluded() {
        let txns = vec![
            Transaction::expense(900.0, day(2024, 10, 2)).with_status(TransactionStatus::Cancelled),
        ];
        let kpis = KpiService::compute(&[], &txns, day(2024, 10, 26));
        assert_eq!(kpis.total_expenses, 0.0);
    }

    #[test]
    fn empty_school_has_zero_delinquency() {
        let kpis = KpiService::compute(&[], &[], day(2024, 3, 20));
        assert_eq!(kpis.total_students, 0);
        assert_eq!(kpis.delinquency_rate, 0.0);
    }

    #[test]
    fn delinquency_depends_on_reference_day() {
        let students = vec![
            Student::new("1", "A", Grade::First).with_paid_months(["março"]),
            Student::new("2", "B", Grade::First).with_paid_months(["fevereiro"]),
            Student::new("3", "C", Grade::Second),
        ];
        let early = KpiService::compute(&students, &[], day(2024, 3, 5));
        let late = KpiService::compute(&students, &[], day(2024, 3, 15));
        assert_eq!(early.delinquency_rate, 0.0);
        assert_eq!(late.delinquency_rate, 66.7);
        assert_eq!(early.total_students, 3);
    }

    #[test]
    fn stored_status_field_is_not_trusted() {
        let mut stale = Student::new("1", "A", Grade::First);
        stale.financial_status = FinancialStatus::Paid;
        let kpis = KpiService::compute(&[stale], &[], day(2024, 6, 30));
        assert_eq!(kpis.delinquency_rate, 100.0);
    }

    #[test]
    fn breakdown_and_late_list_agree() {
        let students = vec![
            Student::new("1", "A", Grade::First).with_paid_months(["abril"]),
            Student::new("2", "B", Grade::First),
            Student::new("3", "C", Grade::Fifth),
        ];
        let today = day(2024, 4, 11);
        let breakdown = KpiService::status_breakdown(&students, today);
        assert_eq!(breakdown, StatusBreakdown { paid: 1, pending: 0, late: 2 });
        let late: Vec<_> = KpiService::late_students(&students, today)
            .into_iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(late, vec!["2", "3"]);
    }

    #[test]
    fn cash_flow_spans_year_boundary() {
        let txns = vec![
            Transaction::income(100.0, day(2023, 11, 3)),
            Transaction::expense(40.0, day(2023, 11, 9)),
            Transaction::income(250.0, day(2024, 2, 1)),
            Transaction::income(999.0, day(2024, 2, 2)).with_status(TransactionStatus::Pending),
            Transaction::income(7.0, day(2023, 8, 1)),
        ];
        let flow = KpiService::monthly_cash_flow(&txns, day(2024, 2, 15), 6);
        let labels: Vec<_> = flow.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Set", "Out", "Nov", "Dez", "Jan", "Fev"]);
        assert_eq!(flow[2].year, 2023);
        assert_eq!(flow[2].income, 100.0);
        assert_eq!(flow[2].net(), 60.0);
        assert_eq!(flow[5].income, 250.0);
        assert_eq!(flow[0].income, 0.0);
    }
}
