use chrono::Datelike;
use seiva_core::{format_currency, format_date, overdue_months, student_status, KpiService};
use seiva_domain::{Displayable, FinancialResponsible, FinancialStatus, Grade, Student};

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{require_args, ShellContext};
use crate::cli::table::{Table, TableColumn};

use super::{name_and_id, next_numeric_id};

const ENROLL_USAGE: &str = "enroll <name> <grade 1-6> [email]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "students",
            "List students, optionally filtered by financial status",
            "students [paid|pending|late]",
            cmd_students,
        ),
        CommandEntry::new(
            "student",
            "Show one student's profile and payment history",
            "student <id>",
            cmd_student,
        ),
        CommandEntry::new("enroll", "Enroll a new student", ENROLL_USAGE, cmd_enroll),
        CommandEntry::new(
            "alerts",
            "List students with overdue tuition",
            "alerts",
            cmd_alerts,
        ),
    ]
}

fn parse_status_filter(raw: &str) -> Result<FinancialStatus, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "paid" | "pago" => Ok(FinancialStatus::Paid),
        "pending" | "pendente" => Ok(FinancialStatus::Pending),
        "late" | "atrasado" => Ok(FinancialStatus::Late),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown status `{other}` (use paid, pending or late)"
        ))),
    }
}

fn cmd_students(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = args.first().map(|raw| parse_status_filter(raw)).transpose()?;
    let store = context.session.store();
    let today = store.today();

    let mut table = Table::new(vec![
        TableColumn::new("ID", 6),
        TableColumn::new("Name", 26),
        TableColumn::new("Grade", 11),
        TableColumn::new("Status", 9),
        TableColumn::new("Last paid", 10),
    ]);
    for student in store.students() {
        let status = student_status(student, today);
        if filter.is_some_and(|wanted| wanted != status) {
            continue;
        }
        table.add_row(vec![
            student.id.clone(),
            student.name.clone(),
            student.grade.to_string(),
            status.to_string(),
            student.latest_paid_month().unwrap_or("-").to_string(),
        ]);
    }

    if table.is_empty() {
        io::print_info("No students match.");
    } else {
        output_section("Students");
        table.print();
    }
    Ok(())
}

fn cmd_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 1, "student <id>")?;
    let student = context.student(args[0])?;
    let today = context.session.store().today();
    let tuition = context.config.tuition_for(student.grade);

    output_section(&student.display_label());
    io::print_info(format!("  ID:            {}", student.id));
    if !student.enrollment_id.is_empty() {
        io::print_info(format!("  Enrollment:    {}", student.enrollment_id));
    }
    io::print_info(format!("  Grade:         {}", student.grade));
    io::print_info(format!("  Status:        {}", student_status(student, today)));
    io::print_info(format!("  Balance:       {}", format_currency(student.balance)));
    io::print_info(format!("  Tuition:       {} / month", format_currency(tuition)));
    let paid = if student.paid_months.is_empty() {
        "none".to_string()
    } else {
        student.paid_months.join(", ")
    };
    io::print_info(format!("  Paid months:   {paid}"));
    if let Some(latest) = student.latest_paid_month() {
        io::print_info(format!("  Last paid:     {latest}"));
    }
    if let Some(date) = student.academic.enrollment_date {
        io::print_info(format!("  Enrolled on:   {}", format_date(date)));
    }

    let guardians = &student.guardians;
    let responsible = match guardians.financial_responsible {
        FinancialResponsible::Father => Some(&guardians.father),
        FinancialResponsible::Mother => Some(&guardians.mother),
        FinancialResponsible::Other => None,
    };
    match responsible.filter(|parent| !parent.name.is_empty()) {
        Some(parent) => io::print_info(format!(
            "  Responsible:   {} ({})",
            parent.name, parent.phone
        )),
        None if !guardians.emergency.name.is_empty() => io::print_info(format!(
            "  Responsible:   {} ({})",
            guardians.emergency.name, guardians.emergency.phone
        )),
        None => {}
    }
    if !student.health.allergies.is_empty() {
        io::print_warning(format!("Allergies: {}", student.health.allergies));
    }
    Ok(())
}

fn cmd_enroll(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 2, ENROLL_USAGE)?;
    let name = args[0].trim();
    if name.is_empty() {
        return Err(CommandError::InvalidArguments("student name cannot be empty".into()));
    }
    let grade = args[1]
        .parse::<u8>()
        .ok()
        .and_then(Grade::from_number)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("invalid grade `{}` (use 1-6)", args[1]))
        })?;

    let store = context.session.store();
    let today = store.today();
    let id = next_numeric_id(store.students().iter().map(|student| student.id.as_str()));
    let mut student = Student::new(id.clone(), name, grade);
    student.enrollment_id = format!("#{}-{:0>3}", today.year(), id);
    student.academic.enrollment_date = Some(today);
    if let Some(email) = args.get(2) {
        student.email = email.to_string();
    }

    context.session.add_student(student);
    let status = context
        .session
        .store()
        .student(&id)
        .map(|student| student.financial_status)
        .unwrap_or_default();
    io::print_success(format!("Enrolled {name} with id {id} ({grade}, {status})."));
    Ok(())
}

fn cmd_alerts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.session.store();
    let today = store.today();
    let late = KpiService::late_students(store.students(), today);
    let breakdown = KpiService::status_breakdown(store.students(), today);

    output_section("Tuition alerts");
    if late.is_empty() {
        io::print_success("No overdue tuition.");
    } else {
        for student in &late {
            let overdue = overdue_months(&student.paid_months, today);
            let owed = context.config.tuition_for(student.grade) * overdue.len() as f64;
            io::print_warning(format!(
                "{} owes {} for {} month(s) ({}): last paid {}",
                name_and_id(*student),
                format_currency(owed),
                overdue.len(),
                overdue.join(", "),
                student.latest_paid_month().unwrap_or("never")
            ));
        }
    }
    if breakdown.pending > 0 {
        io::print_info(format!(
            "{} student(s) still within the payment window.",
            breakdown.pending
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filters_accept_english_and_portuguese() {
        assert_eq!(parse_status_filter("LATE").unwrap(), FinancialStatus::Late);
        assert_eq!(parse_status_filter("pendente").unwrap(), FinancialStatus::Pending);
        assert!(parse_status_filter("overdue").is_err());
    }
}
