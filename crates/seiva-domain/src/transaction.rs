use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{new_id, Displayable, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    #[serde(rename = "M-Pesa")]
    #[default]
    MPesa,
    #[serde(rename = "E-Mola")]
    EMola,
    #[serde(rename = "POS")]
    Pos,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Cash")]
    Cash,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::MPesa => "M-Pesa",
            PaymentMethod::EMola => "E-Mola",
            PaymentMethod::Pos => "POS",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Cash => "Cash",
        }
    }

    /// Parses a label case-insensitively, ignoring spaces and dashes.
    pub fn parse(value: &str) -> Option<Self> {
        let key: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "mpesa" => Some(PaymentMethod::MPesa),
            "emola" => Some(PaymentMethod::EMola),
            "pos" => Some(PaymentMethod::Pos),
            "banktransfer" | "bank" => Some(PaymentMethod::BankTransfer),
            "cash" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Marks a transaction as a tuition payment for specific academic months of one student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentLink {
    pub student_id: String,
    #[serde(default)]
    pub paid_months: Vec<String>,
}

/// A recorded movement of money. Never edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<PaymentLink>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            date,
            kind,
            amount,
            category: String::new(),
            description: String::new(),
            method: PaymentMethod::default(),
            status: TransactionStatus::default(),
            attachment: None,
            link: None,
        }
    }

    pub fn income(amount: f64, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Income, amount, date)
    }

    pub fn expense(amount: f64, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Expense, amount, date)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn linked_to<I, S>(mut self, student_id: impl Into<String>, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.link = Some(PaymentLink {
            student_id: student_id.into(),
            paid_months: months.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Linkage that should be reconciled; a link with no months is treated as absent.
    pub fn payment_link(&self) -> Option<&PaymentLink> {
        self.link
            .as_ref()
            .filter(|link| !link.student_id.is_empty() && !link.paid_months.is_empty())
    }

    /// Signed contribution to the net balance when completed.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{} {}]", self.id, self.kind, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 25).unwrap()
    }

    #[test]
    fn empty_link_is_not_reconciled() {
        let txn = Transaction::income(5000.0, day()).linked_to("1", Vec::<String>::new());
        assert!(txn.link.is_some());
        assert!(txn.payment_link().is_none());
    }

    #[test]
    fn method_labels_match_wire_format() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"Bank Transfer\"");
        assert_eq!(PaymentMethod::parse("m-pesa"), Some(PaymentMethod::MPesa));
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn transaction_without_link_omits_field() {
        let txn = Transaction::expense(3500.0, day()).with_id("2");
        let json = serde_json::to_string(&txn).unwrap();
        assert!(!json.contains("link"));
        assert!(json.contains("\"date\":\"2023-10-25\""));
        assert_eq!(txn.signed_amount(), -3500.0);
    }
}
