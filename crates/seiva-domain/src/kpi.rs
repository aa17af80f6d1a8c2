//! Derived reporting structures. None of these are ever persisted.

use serde::{Deserialize, Serialize};

/// Dashboard aggregates folded from the current students and transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct KpiSnapshot {
    pub total_students: usize,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    /// Percentage of students currently `late`, one decimal place.
    pub delinquency_rate: f64,
}

/// Completed income and expenses for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyCashFlow {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub income: f64,
    pub expenses: f64,
}

impl MonthlyCashFlow {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Number of students in each financial status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StatusBreakdown {
    pub paid: usize,
    pub pending: usize,
    pub late: usize,
}

impl StatusBreakdown {
    pub fn total(&self) -> usize {
        self.paid + self.pending + self.late
    }
}

/// Payroll totals for a set of entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PayrollSummary {
    pub entries: usize,
    pub total_base: f64,
    pub total_bonuses: f64,
    pub total_deductions: f64,
    pub total_net: f64,
    /// Net amount of entries not yet paid.
    pub outstanding: f64,
}
