//! Staff registry and monthly payroll.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{Displayable, Identifiable, NamedEntity};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Department {
    #[serde(rename = "Docentes")]
    Teaching,
    #[serde(rename = "Administrativo")]
    Administrative,
    #[serde(rename = "Serviços Gerais")]
    GeneralServices,
    #[serde(rename = "Segurança")]
    Security,
    #[serde(rename = "Direção")]
    Management,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Teaching,
        Department::Administrative,
        Department::GeneralServices,
        Department::Security,
        Department::Management,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Department::Teaching => "Docentes",
            Department::Administrative => "Administrativo",
            Department::GeneralServices => "Serviços Gerais",
            Department::Security => "Segurança",
            Department::Management => "Direção",
        }
    }

    /// Case-insensitive match on the label or a short English alias.
    pub fn parse(value: &str) -> Option<Self> {
        let key = value.trim().to_lowercase();
        Department::ALL
            .into_iter()
            .find(|dept| dept.label().to_lowercase() == key)
            .or(match key.as_str() {
                "teaching" | "docente" => Some(Department::Teaching),
                "admin" | "administrative" => Some(Department::Administrative),
                "services" | "servicos" | "serviços" => Some(Department::GeneralServices),
                "security" | "seguranca" => Some(Department::Security),
                "management" | "direcao" => Some(Department::Management),
                _ => None,
            })
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ContractType {
    #[default]
    #[serde(rename = "Tempo Integral")]
    FullTime,
    #[serde(rename = "Tempo Parcial")]
    PartTime,
    #[serde(rename = "Prestador de Serviço")]
    Contractor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    Active,
    Vacation,
    SickLeave,
    Terminated,
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmploymentStatus::Active => "active",
            EmploymentStatus::Vacation => "vacation",
            EmploymentStatus::SickLeave => "sick leave",
            EmploymentStatus::Terminated => "terminated",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmployeeDocuments {
    pub bi_number: String,
    pub nuit: String,
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub nib: String,
}

/// A member of staff and their contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: Department,
    /// Monthly gross salary.
    pub base_salary: f64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub contract_type: ContractType,
    #[serde(default)]
    pub admission_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EmploymentStatus,
    #[serde(default)]
    pub personal: EmployeeDocuments,
    #[serde(default)]
    pub bank: BankDetails,
}

impl Employee {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        department: Department,
        base_salary: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            department,
            base_salary,
            email: String::new(),
            phone: String::new(),
            avatar: String::new(),
            contract_type: ContractType::default(),
            admission_date: None,
            status: EmploymentStatus::default(),
            personal: EmployeeDocuments::default(),
            bank: BankDetails::default(),
        }
    }

    pub fn is_on_payroll(&self) -> bool {
        self.status != EmploymentStatus::Terminated
    }
}

impl Identifiable for Employee {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Employee {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Employee {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.role, self.department)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    Paid,
    Processing,
    #[default]
    Pending,
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayrollStatus::Paid => "paid",
            PayrollStatus::Processing => "processing",
            PayrollStatus::Pending => "pending",
        };
        f.write_str(label)
    }
}

/// One employee's pay for one month. The net amount is always derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayrollEntry {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub employee_role: String,
    /// Free-form period label, e.g. "Outubro 2023".
    pub month_reference: String,
    pub base_salary: f64,
    #[serde(default)]
    pub bonuses: f64,
    #[serde(default)]
    pub deductions: f64,
    #[serde(default)]
    pub status: PayrollStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

impl PayrollEntry {
    /// Pending entry for `employee` at their current base salary.
    pub fn for_employee(
        id: impl Into<String>,
        employee: &Employee,
        month_reference: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            employee_role: employee.role.clone(),
            month_reference: month_reference.into(),
            base_salary: employee.base_salary,
            bonuses: 0.0,
            deductions: 0.0,
            status: PayrollStatus::default(),
            payment_date: None,
        }
    }

    pub fn with_adjustments(mut self, bonuses: f64, deductions: f64) -> Self {
        self.bonuses = bonuses;
        self.deductions = deductions;
        self
    }

    pub fn net_salary(&self) -> f64 {
        self.base_salary + self.bonuses - self.deductions
    }
}

impl Identifiable for PayrollEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for PayrollEntry {
    fn name(&self) -> &str {
        &self.employee_name
    }
}

impl Displayable for PayrollEntry {
    fn display_label(&self) -> String {
        format!("{} - {} [{}]", self.employee_name, self.month_reference, self.status)
    }
}
