use seiva_core::{format_currency, format_date, PayrollService};
use seiva_domain::{
    Department, Displayable, Employee, Identifiable, NamedEntity, PayrollEntry, PayrollStatus,
};

use crate::cli::core::{parse_amount, CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{require_args, ShellContext};
use crate::cli::table::{Table, TableColumn};

use super::{name_and_id, next_numeric_id};

const HIRE_USAGE: &str = "hire <name> <role> <department> <monthly salary>";
const PAYROLL_USAGE: &str =
    "payroll [month] | payroll run <month> | payroll pay <id> | payroll process <id>";
const PAYROLL_ID_PREFIX: char = 'p';

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "staff",
            "List staff, optionally for one department",
            "staff [department]",
            cmd_staff,
        ),
        CommandEntry::new("hire", "Add a member of staff", HIRE_USAGE, cmd_hire),
        CommandEntry::new(
            "payroll",
            "Show payroll totals, generate a month or settle an entry",
            PAYROLL_USAGE,
            cmd_payroll,
        ),
    ]
}

fn parse_department(raw: &str) -> Result<Department, CommandError> {
    Department::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = Department::ALL.iter().map(|dept| dept.label()).collect();
        CommandError::InvalidArguments(format!(
            "unknown department `{raw}` (expected one of: {})",
            known.join(", ")
        ))
    })
}

fn cmd_staff(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = if args.is_empty() {
        None
    } else {
        Some(parse_department(&args.join(" "))?)
    };
    let staff: Vec<&Employee> = context
        .session
        .store()
        .employees()
        .iter()
        .filter(|employee| filter.map_or(true, |dept| employee.department == dept))
        .collect();
    if staff.is_empty() {
        io::print_info("No staff match.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("ID", 5),
        TableColumn::new("Name", 22),
        TableColumn::new("Role", 20),
        TableColumn::new("Department", 16),
        TableColumn::new("Salary", 13),
        TableColumn::new("Status", 10),
    ]);
    for employee in &staff {
        table.add_row(vec![
            employee.id().to_string(),
            employee.name().to_string(),
            employee.role.clone(),
            employee.department.to_string(),
            format_currency(employee.base_salary),
            employee.status.to_string(),
        ]);
    }
    output_section("Staff");
    table.print();

    let on_payroll: Vec<&&Employee> = staff.iter().filter(|e| e.is_on_payroll()).collect();
    let monthly: f64 = on_payroll.iter().map(|employee| employee.base_salary).sum();
    io::print_info(format!(
        "{} on payroll, {} in base salaries per month.",
        on_payroll.len(),
        format_currency(monthly)
    ));
    Ok(())
}

fn cmd_hire(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 4, HIRE_USAGE)?;
    let name = args[0].trim();
    if name.is_empty() {
        return Err(CommandError::InvalidArguments("staff name cannot be empty".into()));
    }
    let department = parse_department(args[2])?;
    let salary = parse_amount(args[3])?;

    let store = context.session.store();
    let id = next_numeric_id(store.employees().iter().map(|employee| employee.id()));
    let mut employee = Employee::new(id.clone(), name, args[1].trim(), department, salary);
    employee.admission_date = Some(store.today());
    let label = employee.display_label();

    context.session.add_employee(employee);
    io::print_success(format!("Hired {label} with id {id}."));
    if let Some(employee) = context.session.store().employee(&id) {
        io::print_info(format!(
            "{} joins the {} payroll from the next run.",
            name_and_id(employee),
            employee.department
        ));
    }
    Ok(())
}

fn cmd_payroll(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        Some("run") => {
            let month = month_argument(&args[1..])?;
            run_payroll(context, &month)
        }
        Some("pay") => settle(context, args.get(1).copied(), PayrollStatus::Paid),
        Some("process") => settle(context, args.get(1).copied(), PayrollStatus::Processing),
        _ => {
            let month = (!args.is_empty()).then(|| args.join(" "));
            show_payroll(context, month.as_deref())
        }
    }
}

fn month_argument(args: &[&str]) -> Result<String, CommandError> {
    let month = args.join(" ");
    if month.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {PAYROLL_USAGE}")));
    }
    Ok(month.trim().to_string())
}

fn show_payroll(context: &ShellContext, month: Option<&str>) -> CommandResult {
    let payroll = context.session.store().payroll();
    let entries: Vec<&PayrollEntry> = payroll
        .iter()
        .filter(|entry| month.map_or(true, |wanted| entry.month_reference == wanted))
        .collect();
    if entries.is_empty() {
        match month {
            Some(month) => io::print_info(format!(
                "No payroll for {month}. Months on record: {}.",
                PayrollService::months(payroll).join(", ")
            )),
            None => io::print_info("No payroll recorded. Use `payroll run <month>`."),
        }
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("ID", 5),
        TableColumn::new("Employee", 22),
        TableColumn::new("Month", 15),
        TableColumn::new("Base", 13),
        TableColumn::new("Bonuses", 12),
        TableColumn::new("Deductions", 12),
        TableColumn::new("Net", 13),
        TableColumn::new("Status", 10),
        TableColumn::new("Paid on", 10),
    ]);
    for entry in &entries {
        table.add_row(vec![
            entry.id().to_string(),
            entry.name().to_string(),
            entry.month_reference.clone(),
            format_currency(entry.base_salary),
            format_currency(entry.bonuses),
            format_currency(entry.deductions),
            format_currency(entry.net_salary()),
            entry.status.to_string(),
            entry.payment_date.map(format_date).unwrap_or_else(|| "-".into()),
        ]);
    }
    output_section(format!("Payroll {}", month.unwrap_or("(all months)")));
    table.print();

    let summary = PayrollService::summarize(entries.iter().copied());
    io::print_info(format!("  Base salaries:  {}", format_currency(summary.total_base)));
    io::print_info(format!("  Bonuses:        {}", format_currency(summary.total_bonuses)));
    io::print_info(format!("  Deductions:     {}", format_currency(summary.total_deductions)));
    io::print_info(format!("  Total net:      {}", format_currency(summary.total_net)));
    io::print_info(format!("  Outstanding:    {}", format_currency(summary.outstanding)));
    Ok(())
}

fn run_payroll(context: &mut ShellContext, month: &str) -> CommandResult {
    let store = context.session.store();
    let payroll = store.payroll();
    let mut next = next_numeric_id(
        payroll
            .iter()
            .map(|entry| entry.id.trim_start_matches(PAYROLL_ID_PREFIX)),
    )
    .parse::<u64>()
    .unwrap_or(1);

    let mut generated = Vec::new();
    for employee in store.employees().iter().filter(|e| e.is_on_payroll()) {
        let covered = payroll
            .iter()
            .any(|entry| entry.employee_id == employee.id && entry.month_reference == month);
        if covered {
            continue;
        }
        generated.push(PayrollEntry::for_employee(
            format!("{PAYROLL_ID_PREFIX}{next}"),
            employee,
            month,
        ));
        next += 1;
    }

    if generated.is_empty() {
        io::print_warning(format!("Payroll for {month} already covers every active employee."));
        return Ok(());
    }
    let count = generated.len();
    for entry in generated {
        context.session.add_payroll_entry(entry);
    }
    io::print_success(format!("Generated {count} payroll entries for {month}."));
    Ok(())
}

fn settle(context: &mut ShellContext, id: Option<&str>, status: PayrollStatus) -> CommandResult {
    let id = id.ok_or_else(|| CommandError::InvalidArguments(format!("usage: {PAYROLL_USAGE}")))?;
    if !context.session.set_payroll_status(id, status) {
        io::print_warning(format!("No payroll entry with id `{id}`."));
        return Ok(());
    }
    if let Some(entry) = context.session.store().payroll().iter().find(|e| e.id == id) {
        io::print_success(format!(
            "Marked {}, net {}.",
            entry.display_label(),
            format_currency(entry.net_salary())
        ));
    }
    let summary = context.session.store().payroll_summary();
    io::print_info(format!("Outstanding payroll: {}.", format_currency(summary.outstanding)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn departments_parse_labels_and_aliases() {
        assert_eq!(parse_department("Segurança").unwrap(), Department::Security);
        assert_eq!(parse_department("admin").unwrap(), Department::Administrative);
        let err = parse_department("cozinha").unwrap_err().to_string();
        assert!(err.contains("Serviços Gerais"), "{err}");
    }

    #[test]
    fn month_argument_joins_words() {
        assert_eq!(month_argument(&["Novembro", "2023"]).unwrap(), "Novembro 2023");
        assert!(month_argument(&[]).is_err());
    }
}
