use seiva_core::{format_currency, format_date, KpiService, Reconciliation};
use seiva_domain::{
    is_academic_month, Displayable, PaymentMethod, Transaction, TransactionKind, ACADEMIC_MONTHS,
};

use crate::cli::core::{parse_amount, parse_date, CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{require_args, ShellContext};
use crate::cli::table::{Table, TableColumn};

const PAY_USAGE: &str = "pay <student-id> <month[,month...]> [amount] [method]";
const INCOME_USAGE: &str = "income <amount> <category> [description] [method] [YYYY-MM-DD]";
const EXPENSE_USAGE: &str = "expense <amount> <category> [description] [method] [YYYY-MM-DD]";
const TUITION_CATEGORY: &str = "Mensalidade";
const DEFAULT_LISTING: usize = 10;
const MAX_CASH_FLOW_MONTHS: u32 = 24;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "pay",
            "Record a tuition payment and update the student's status",
            PAY_USAGE,
            cmd_pay,
        ),
        CommandEntry::new("income", "Record other income", INCOME_USAGE, cmd_income),
        CommandEntry::new("expense", "Record an expense", EXPENSE_USAGE, cmd_expense),
        CommandEntry::new(
            "transactions",
            "List the most recent transactions",
            "transactions [count]",
            cmd_transactions,
        ),
        CommandEntry::new(
            "kpis",
            "Show revenue, expenses, net balance and delinquency",
            "kpis",
            cmd_kpis,
        ),
        CommandEntry::new(
            "cashflow",
            "Show completed income and expenses per month",
            "cashflow [months]",
            cmd_cashflow,
        ),
    ]
}

fn parse_months(raw: &str) -> Result<Vec<String>, CommandError> {
    let months: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    if months.is_empty() {
        return Err(CommandError::InvalidArguments("no months given".into()));
    }
    if let Some(unknown) = months.iter().find(|token| !is_academic_month(token)) {
        return Err(CommandError::InvalidArguments(format!(
            "unknown month `{unknown}` (expected one of: {})",
            ACADEMIC_MONTHS.join(", ")
        )));
    }
    Ok(months)
}

fn parse_method(raw: Option<&&str>) -> Result<PaymentMethod, CommandError> {
    match raw {
        None => Ok(PaymentMethod::default()),
        Some(value) => PaymentMethod::parse(value).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown payment method `{value}` (use M-Pesa, E-Mola, POS, Bank Transfer or Cash)"
            ))
        }),
    }
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 2, PAY_USAGE)?;
    let student = context.student(args[0])?;
    let months = parse_months(args[1])?;
    let amount = match args.get(2) {
        Some(raw) => parse_amount(raw)?,
        None => context.config.tuition_for(student.grade) * months.len() as f64,
    };
    let method = parse_method(args.get(3))?;

    let transaction = Transaction::income(amount, context.session.store().today())
        .with_category(TUITION_CATEGORY)
        .with_description(format!("{TUITION_CATEGORY} - {}", student.name))
        .with_method(method)
        .linked_to(student.id.clone(), months.iter().cloned());

    match context.session.add_transaction(transaction) {
        Reconciliation::StudentUpdated {
            student_id,
            months_added,
            status,
        } => {
            io::print_success(format!(
                "Recorded {} for student {student_id} ({}).",
                format_currency(amount),
                months.join(", ")
            ));
            if months_added < months.len() {
                io::print_info(format!(
                    "{} month(s) were already paid.",
                    months.len() - months_added
                ));
            }
            io::print_info(format!("Status is now {status}."));
        }
        Reconciliation::StudentMissing { student_id } => {
            io::print_warning(format!(
                "Payment recorded, but student {student_id} no longer exists."
            ));
        }
        Reconciliation::NotLinked => {}
    }
    Ok(())
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    record_movement(context, args, TransactionKind::Income, INCOME_USAGE)
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    record_movement(context, args, TransactionKind::Expense, EXPENSE_USAGE)
}

fn record_movement(
    context: &mut ShellContext,
    args: &[&str],
    kind: TransactionKind,
    usage: &str,
) -> CommandResult {
    let args = require_args(args, 2, usage)?;
    let amount = parse_amount(args[0])?;
    let category = args[1];
    let method = parse_method(args.get(3))?;
    let date = match args.get(4) {
        Some(raw) => parse_date(raw)?,
        None => context.session.store().today(),
    };

    let mut transaction = Transaction::new(kind, amount, date)
        .with_category(category)
        .with_method(method);
    if let Some(description) = args.get(2) {
        transaction = transaction.with_description(*description);
    }
    let label = transaction.display_label();
    context.session.add_transaction(transaction);
    io::print_success(format!(
        "Recorded {label}: {} ({category}).",
        format_currency(amount)
    ));
    Ok(())
}

fn cmd_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid count `{raw}`"))
        })?,
        None => DEFAULT_LISTING,
    };
    let transactions = context.session.store().transactions();
    if transactions.is_empty() {
        io::print_info("No transactions recorded.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Date", 11),
        TableColumn::new("Type", 8),
        TableColumn::new("Amount", 14),
        TableColumn::new("Category", 14),
        TableColumn::new("Method", 14),
        TableColumn::new("Status", 10),
    ]);
    for transaction in transactions.iter().take(limit) {
        table.add_row(vec![
            format_date(transaction.date),
            transaction.kind.to_string(),
            format_currency(transaction.signed_amount()),
            transaction.category.clone(),
            transaction.method.to_string(),
            transaction.status.to_string(),
        ]);
    }
    output_section(format!(
        "Transactions ({} of {})",
        limit.min(transactions.len()),
        transactions.len()
    ));
    table.print();
    Ok(())
}

fn cmd_kpis(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.session.store();
    let kpis = store.kpis();
    let breakdown = KpiService::status_breakdown(store.students(), store.today());

    output_section(format!("Indicators on {}", format_date(store.today())));
    io::print_info(format!("  Students:          {}", kpis.total_students));
    io::print_info(format!(
        "  Revenue:           {}",
        format_currency(kpis.total_revenue)
    ));
    io::print_info(format!(
        "  Expenses:          {}",
        format_currency(kpis.total_expenses)
    ));
    io::print_info(format!(
        "  Net balance:       {}",
        format_currency(kpis.net_balance)
    ));
    io::print_info(format!("  Delinquency rate:  {:.1}%", kpis.delinquency_rate));
    io::print_info(format!(
        "  Paid / pending / late: {} / {} / {}",
        breakdown.paid, breakdown.pending, breakdown.late
    ));
    Ok(())
}

fn cmd_cashflow(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let months = match args.first() {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|months| (1..=MAX_CASH_FLOW_MONTHS).contains(months))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "invalid month count `{raw}` (use 1-{MAX_CASH_FLOW_MONTHS})"
                ))
            })?,
        None => 6,
    };
    let store = context.session.store();
    let flow = KpiService::monthly_cash_flow(store.transactions(), store.today(), months);

    let mut table = Table::new(vec![
        TableColumn::new("Month", 9),
        TableColumn::new("Income", 16),
        TableColumn::new("Expenses", 16),
        TableColumn::new("Net", 16),
    ]);
    for entry in &flow {
        table.add_row(vec![
            format!("{} {}", entry.label, entry.year),
            format_currency(entry.income),
            format_currency(entry.expenses),
            format_currency(entry.net()),
        ]);
    }
    output_section("Cash flow");
    table.print();
    Ok(())
}
