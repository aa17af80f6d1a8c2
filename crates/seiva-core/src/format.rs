use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// pt-MZ conventions: `.` groups thousands, `,` separates cents, dates as dd/MM/yyyy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MozambicanFormat;

impl CurrencyFormatter for MozambicanFormat {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let cents = (amount.abs() * 100.0).round() as u64;
        let units = group_thousands(cents / 100);
        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!("{sign}{units},{:02} {currency}", cents % 100)
    }
}

impl DateFormatter for MozambicanFormat {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }
}

/// `1250.0` becomes `"1.250,00 MT"`.
pub fn format_currency(amount: f64) -> String {
    MozambicanFormat.format_amount(amount, "MT")
}

pub fn format_date(date: NaiveDate) -> String {
    MozambicanFormat.format_date(date)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_dot_groups_and_comma_cents() {
        assert_eq!(format_currency(1250.0), "1.250,00 MT");
        assert_eq!(format_currency(0.5), "0,50 MT");
        assert_eq!(format_currency(1_234_567.891), "1.234.567,89 MT");
        assert_eq!(format_currency(-2500.0), "-2.500,00 MT");
        assert_eq!(format_currency(-0.001), "0,00 MT");
    }

    #[test]
    fn dates_are_day_first() {
        let date = NaiveDate::from_ymd_opt(2023, 10, 5).unwrap();
        assert_eq!(format_date(date), "05/10/2023");
    }
}
