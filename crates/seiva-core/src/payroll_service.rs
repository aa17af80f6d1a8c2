use seiva_domain::{PayrollEntry, PayrollStatus, PayrollSummary};

pub struct PayrollService;

impl PayrollService {
    /// Totals over every entry, regardless of period.
    pub fn summarize<'a>(entries: impl IntoIterator<Item = &'a PayrollEntry>) -> PayrollSummary {
        entries
            .into_iter()
            .fold(PayrollSummary::default(), |mut summary, entry| {
                let net = entry.net_salary();
                summary.entries += 1;
                summary.total_base += entry.base_salary;
                summary.total_bonuses += entry.bonuses;
                summary.total_deductions += entry.deductions;
                summary.total_net += net;
                if entry.status != PayrollStatus::Paid {
                    summary.outstanding += net;
                }
                summary
            })
    }

    /// Totals for one period label, e.g. "Outubro 2023".
    pub fn summarize_month(entries: &[PayrollEntry], month_reference: &str) -> PayrollSummary {
        Self::summarize(
            entries
                .iter()
                .filter(|entry| entry.month_reference == month_reference),
        )
    }

    /// Period labels in first-seen order.
    pub fn months(entries: &[PayrollEntry]) -> Vec<&str> {
        let mut months: Vec<&str> = Vec::new();
        for entry in entries {
            if !months.contains(&entry.month_reference.as_str()) {
                months.push(&entry.month_reference);
            }
        }
        months
    }
}
