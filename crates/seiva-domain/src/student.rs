use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::academic_position;
use crate::common::{Displayable, Identifiable, NamedEntity};

/// Payment standing of a student for the current billing month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FinancialStatus {
    #[default]
    Paid,
    Pending,
    Late,
}

impl FinancialStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FinancialStatus::Paid => "paid",
            FinancialStatus::Pending => "pending",
            FinancialStatus::Late => "late",
        }
    }
}

impl fmt::Display for FinancialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary school grades (Ensino Primário do 1º Grau).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Grade {
    #[serde(rename = "1ª Classe")]
    First,
    #[serde(rename = "2ª Classe")]
    Second,
    #[serde(rename = "3ª Classe")]
    Third,
    #[serde(rename = "4ª Classe")]
    Fourth,
    #[serde(rename = "5ª Classe")]
    Fifth,
    #[serde(rename = "6ª Classe")]
    Sixth,
}

/// Education cycle a grade belongs to; tuition is priced per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationCycle {
    /// 1ª–3ª Classe.
    First,
    /// 4ª–6ª Classe.
    Second,
}

impl Grade {
    pub const ALL: [Grade; 6] = [
        Grade::First,
        Grade::Second,
        Grade::Third,
        Grade::Fourth,
        Grade::Fifth,
        Grade::Sixth,
    ];

    pub fn number(self) -> u8 {
        match self {
            Grade::First => 1,
            Grade::Second => 2,
            Grade::Third => 3,
            Grade::Fourth => 4,
            Grade::Fifth => 5,
            Grade::Sixth => 6,
        }
    }

    pub fn from_number(value: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|grade| grade.number() == value)
    }

    pub fn cycle(self) -> EducationCycle {
        if self.number() <= 3 {
            EducationCycle::First
        } else {
            EducationCycle::Second
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ª Classe", self.number())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Suspended,
    Transferred,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    M,
    F,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersonalDetails {
    pub dob: Option<NaiveDate>,
    pub gender: Gender,
    pub nationality: String,
    pub bi_number: String,
    pub address: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AcademicRecord {
    pub enrollment_date: Option<NaiveDate>,
    pub prev_school: String,
    #[serde(default)]
    pub submitted_docs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Parent {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub profession: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmergencyContact {
    pub name: String,
    pub relation: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FinancialResponsible {
    #[default]
    Father,
    Mother,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Guardians {
    pub father: Parent,
    pub mother: Parent,
    pub emergency: EmergencyContact,
    pub financial_responsible: FinancialResponsible,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HealthRecord {
    pub blood_type: String,
    pub allergies: String,
    pub conditions: String,
    pub notes: String,
}

/// An enrolled student together with their tuition history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub enrollment_id: String,
    pub grade: Grade,
    /// Positive = credit, negative = debt.
    #[serde(default)]
    pub balance: f64,
    /// Derived from `paid_months`; only the store writes it.
    #[serde(default)]
    pub financial_status: FinancialStatus,
    #[serde(default)]
    pub paid_months: Vec<String>,
    #[serde(default)]
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub personal: PersonalDetails,
    #[serde(default)]
    pub academic: AcademicRecord,
    #[serde(default)]
    pub guardians: Guardians,
    #[serde(default)]
    pub health: HealthRecord,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, grade: Grade) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            avatar: String::new(),
            enrollment_id: String::new(),
            grade,
            balance: 0.0,
            financial_status: FinancialStatus::default(),
            paid_months: Vec::new(),
            status: EnrollmentStatus::default(),
            personal: PersonalDetails::default(),
            academic: AcademicRecord::default(),
            guardians: Guardians::default(),
            health: HealthRecord::default(),
        }
    }

    pub fn with_paid_months<I, S>(mut self, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paid_months = Vec::new();
        self.merge_paid_months(months.into_iter().map(Into::into));
        self
    }

    pub fn has_paid(&self, token: &str) -> bool {
        self.paid_months.iter().any(|month| month == token)
    }

    /// Latest academic month in the history, ignoring insertion order and unknown tokens.
    pub fn latest_paid_month(&self) -> Option<&str> {
        self.paid_months
            .iter()
            .filter_map(|month| academic_position(month).map(|pos| (pos, month.as_str())))
            .max_by_key(|(pos, _)| *pos)
            .map(|(_, month)| month)
    }

    /// Appends tokens not yet present, keeping the existing order. Returns how many were added.
    pub fn merge_paid_months<I>(&mut self, months: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = 0;
        for month in months {
            if !self.has_paid(&month) {
                self.paid_months.push(month);
                added += 1;
            }
        }
        added
    }
}

impl Identifiable for Student {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Student {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Student {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.grade, self.financial_status)
    }
}

/// Explicit field-level update for a student profile.
///
/// Payment history and financial status are not patchable; they change only
/// through reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub enrollment_id: Option<String>,
    pub grade: Option<Grade>,
    pub balance: Option<f64>,
    pub status: Option<EnrollmentStatus>,
    pub personal: Option<PersonalDetails>,
    pub academic: Option<AcademicRecord>,
    pub guardians: Option<Guardians>,
    pub health: Option<HealthRecord>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(avatar) = self.avatar {
            student.avatar = avatar;
        }
        if let Some(enrollment_id) = self.enrollment_id {
            student.enrollment_id = enrollment_id;
        }
        if let Some(grade) = self.grade {
            student.grade = grade;
        }
        if let Some(balance) = self.balance {
            student.balance = balance;
        }
        if let Some(status) = self.status {
            student.status = status;
        }
        if let Some(personal) = self.personal {
            student.personal = personal;
        }
        if let Some(academic) = self.academic {
            student.academic = academic;
        }
        if let Some(guardians) = self.guardians {
            student.guardians = guardians;
        }
        if let Some(health) = self.health {
            student.health = health;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_serializes_with_portuguese_label() {
        let json = serde_json::to_string(&Grade::Fourth).unwrap();
        assert_eq!(json, "\"4ª Classe\"");
        let parsed: Grade = serde_json::from_str("\"6ª Classe\"").unwrap();
        assert_eq!(parsed, Grade::Sixth);
        assert_eq!(Grade::Third.cycle(), EducationCycle::First);
        assert_eq!(Grade::Fourth.cycle(), EducationCycle::Second);
    }

    #[test]
    fn merge_paid_months_deduplicates_and_keeps_order() {
        let mut student =
            Student::new("1", "Ana", Grade::First).with_paid_months(["fevereiro", "março"]);
        let added =
            student.merge_paid_months(vec!["março".to_string(), "outubro".to_string()]);
        assert_eq!(added, 1);
        assert_eq!(student.paid_months, vec!["fevereiro", "março", "outubro"]);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut student = Student::new("7", "Rui", Grade::Second).with_paid_months(["maio"]);
        student.email = "rui@seiva.mz".into();
        StudentPatch {
            name: Some("Rui Lobo".into()),
            balance: Some(-1500.0),
            ..StudentPatch::default()
        }
        .apply_to(&mut student);
        assert_eq!(student.name, "Rui Lobo");
        assert_eq!(student.balance, -1500.0);
        assert_eq!(student.email, "rui@seiva.mz");
        assert_eq!(student.paid_months, vec!["maio"]);
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let student: Student =
            serde_json::from_str(r#"{"id":"9","name":"Lia","grade":"2ª Classe"}"#).unwrap();
        assert!(student.paid_months.is_empty());
        assert_eq!(student.status, EnrollmentStatus::Active);
    }

    #[test]
    fn latest_paid_month_follows_the_academic_calendar() {
        let mut student = Student::new("3", "Almiro", Grade::Fourth).with_paid_months(["outubro"]);
        student.merge_paid_months(vec!["março".to_string(), "Maio".to_string()]);
        assert_eq!(student.latest_paid_month(), Some("outubro"));
        assert_eq!(Student::new("4", "Lia", Grade::First).latest_paid_month(), None);
    }
}
