//! In-memory owner of the school's students, transactions and agenda.

use chrono::{Datelike, NaiveDate};
use seiva_domain::{
    CalendarEvent, Employee, EventPatch, FinancialStatus, KpiSnapshot, PayrollEntry,
    PayrollStatus, PayrollSummary, Student, StudentPatch, Transaction,
};
use tracing::{debug, info};

use crate::{
    kpi_service::KpiService,
    payroll_service::PayrollService,
    seed,
    status_rules::refresh_status,
    storage::SchoolSnapshot,
    time::Clock,
    CoreError,
};

/// Outcome of reconciling a transaction's payment link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The transaction carries no usable payment link.
    NotLinked,
    /// The linked student's history was merged and their status re-derived.
    StudentUpdated {
        student_id: String,
        months_added: usize,
        status: FinancialStatus,
    },
    /// No student matched the link; only the transaction was recorded.
    StudentMissing { student_id: String },
}

/// Authoritative collections plus the clock used for status derivation.
///
/// Every mutation takes `&mut self`, so a caller never observes a
/// transaction without its reconciliation effect.
pub struct SchoolStore {
    students: Vec<Student>,
    transactions: Vec<Transaction>,
    events: Vec<CalendarEvent>,
    employees: Vec<Employee>,
    payroll: Vec<PayrollEntry>,
    clock: Box<dyn Clock>,
}

impl SchoolStore {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            students: Vec::new(),
            transactions: Vec::new(),
            events: Vec::new(),
            employees: Vec::new(),
            payroll: Vec::new(),
            clock,
        }
    }

    /// Builds a store from a snapshot, re-deriving every student's status.
    pub fn from_snapshot(snapshot: SchoolSnapshot, clock: Box<dyn Clock>) -> Self {
        let mut store = Self::new(clock);
        store.replace_all(snapshot);
        store
    }

    /// Store pre-populated with the bundled demonstration records.
    pub fn seeded(clock: Box<dyn Clock>) -> Self {
        let year = clock.today().year();
        Self::from_snapshot(seed::seed_snapshot(year), clock)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    pub fn require_student(&self, id: &str) -> Result<&Student, CoreError> {
        self.student(id)
            .ok_or_else(|| CoreError::StudentNotFound(id.to_string()))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Inserts a student at the front of the list (most recent first).
    pub fn add_student(&mut self, mut student: Student) {
        refresh_status(&mut student, self.today());
        debug!(student = %student.id, status = %student.financial_status, "student added");
        self.students.insert(0, student);
    }

    /// Replaces the student with the same id. Unknown ids are left alone and yield `false`.
    pub fn update_student(&mut self, mut student: Student) -> bool {
        let today = self.today();
        match self.students.iter_mut().find(|item| item.id == student.id) {
            Some(slot) => {
                refresh_status(&mut student, today);
                *slot = student;
                true
            }
            None => {
                debug!(student = %student.id, "update skipped, student not found");
                false
            }
        }
    }

    /// Applies a field-level patch to a student profile.
    pub fn patch_student(&mut self, id: &str, patch: StudentPatch) -> bool {
        let today = self.today();
        match self.students.iter_mut().find(|item| item.id == id) {
            Some(student) => {
                patch.apply_to(student);
                refresh_status(student, today);
                true
            }
            None => false,
        }
    }

    /// Records a transaction and reconciles its payment link, if any, in one step.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Reconciliation {
        let link = transaction.payment_link().cloned();
        debug!(txn = %transaction.id, kind = %transaction.kind, amount = transaction.amount, "transaction added");
        self.transactions.insert(0, transaction);

        let Some(link) = link else {
            return Reconciliation::NotLinked;
        };
        let today = self.today();
        match self
            .students
            .iter_mut()
            .find(|student| student.id == link.student_id)
        {
            Some(student) => {
                let months_added = student.merge_paid_months(link.paid_months);
                refresh_status(student, today);
                info!(
                    student = %student.id,
                    months_added,
                    status = %student.financial_status,
                    "tuition reconciled"
                );
                Reconciliation::StudentUpdated {
                    student_id: student.id.clone(),
                    months_added,
                    status: student.financial_status,
                }
            }
            None => {
                debug!(student = %link.student_id, "payment link does not match any student");
                Reconciliation::StudentMissing {
                    student_id: link.student_id,
                }
            }
        }
    }

    pub fn add_event(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn update_event(&mut self, event: CalendarEvent) -> bool {
        match self.events.iter_mut().find(|item| item.id == event.id) {
            Some(slot) => {
                *slot = event;
                true
            }
            None => false,
        }
    }

    pub fn patch_event(&mut self, id: &str, patch: EventPatch) -> bool {
        match self.events.iter_mut().find(|item| item.id == id) {
            Some(event) => {
                patch.apply_to(event);
                true
            }
            None => false,
        }
    }

    pub fn delete_event(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        self.events.len() != before
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn payroll(&self) -> &[PayrollEntry] {
        &self.payroll
    }

    pub fn add_employee(&mut self, employee: Employee) {
        debug!(employee = %employee.id, department = %employee.department, "employee added");
        self.employees.push(employee);
    }

    pub fn add_payroll_entry(&mut self, entry: PayrollEntry) {
        self.payroll.push(entry);
    }

    /// Moves a payroll entry to `status`; paying stamps today's date. Unknown ids yield `false`.
    pub fn set_payroll_status(&mut self, id: &str, status: PayrollStatus) -> bool {
        let today = self.today();
        match self.payroll.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.status = status;
                entry.payment_date = (status == PayrollStatus::Paid).then_some(today);
                info!(entry = %entry.id, %status, "payroll status changed");
                true
            }
            None => false,
        }
    }

    /// Totals over the whole payroll.
    pub fn payroll_summary(&self) -> PayrollSummary {
        PayrollService::summarize(&self.payroll)
    }

    /// Recomputes the dashboard aggregates for the clock's current day.
    pub fn kpis(&self) -> KpiSnapshot {
        KpiService::compute(&self.students, &self.transactions, self.today())
    }

    /// Re-derives every stored status for today. Returns how many changed.
    pub fn refresh_financial_statuses(&mut self) -> usize {
        let today = self.today();
        self.students
            .iter_mut()
            .map(|student| refresh_status(student, today))
            .filter(|changed| *changed)
            .count()
    }

    pub fn snapshot(&self) -> SchoolSnapshot {
        SchoolSnapshot {
            students: self.students.clone(),
            transactions: self.transactions.clone(),
            events: self.events.clone(),
            employees: self.employees.clone(),
            payroll: self.payroll.clone(),
        }
    }

    /// Swaps in every collection at once.
    pub fn replace_all(&mut self, snapshot: SchoolSnapshot) {
        self.students = snapshot.students;
        self.transactions = snapshot.transactions;
        self.events = snapshot.events;
        self.employees = snapshot.employees;
        self.payroll = snapshot.payroll;
        self.refresh_financial_statuses();
    }
}
