//! Academic calendar vocabulary shared by status rules and anything that
//! builds `paid_months` lists.
//!
//! The billable year runs February through December. January is the
//! vacation month and is never billed. Tokens are matched verbatim: no
//! case folding or accent normalization happens anywhere.

use chrono::{Datelike, NaiveDate};

/// Billable academic months, in order. Position `i` corresponds to calendar
/// month index `i + 1` (0-based, January = 0).
pub const ACADEMIC_MONTHS: [&str; 11] = [
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Calendar month (1-based, as returned by `chrono`) during which billing is suspended.
pub const VACATION_MONTH: u32 = 1;

/// Last day of the month on which an unpaid month is still `pending` rather than `late`.
pub const DUE_DAY: u32 = 10;

const SHORT_MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Returns the academic token billed in `date`'s month, or `None` during the vacation month.
pub fn academic_month_for(date: NaiveDate) -> Option<&'static str> {
    academic_month_for_index(date.month0())
}

/// Maps a 0-based calendar month index onto its academic token.
pub fn academic_month_for_index(month0: u32) -> Option<&'static str> {
    if month0 + 1 == VACATION_MONTH {
        return None;
    }
    ACADEMIC_MONTHS.get(month0.checked_sub(1)? as usize).copied()
}

/// Returns true when `token` belongs to the academic vocabulary.
pub fn is_academic_month(token: &str) -> bool {
    ACADEMIC_MONTHS.contains(&token)
}

/// Position of `token` within [`ACADEMIC_MONTHS`].
pub fn academic_position(token: &str) -> Option<usize> {
    ACADEMIC_MONTHS.iter().position(|month| *month == token)
}

/// Returns true when `date` falls in the vacation month.
pub fn is_vacation(date: NaiveDate) -> bool {
    date.month() == VACATION_MONTH
}

/// Three-letter pt-MZ label for a 1-based calendar month.
pub fn short_month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| SHORT_MONTH_LABELS.get(idx as usize))
        .copied()
        .unwrap_or("")
}
