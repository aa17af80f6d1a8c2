mod common;

use std::{fs, path::Path};

use assert_cmd::Command;
use common::temp_base;
use predicates::prelude::*;
use predicates::str::contains;

fn run_script(base: &Path, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("seiva_cli").unwrap();
    cmd.env("SEIVA_CLI_SCRIPT", "1")
        .env("SEIVA_HOME", base)
        .env("SEIVA_TODAY", "2024-10-20")
        .env("RUST_LOG", "off")
        .write_stdin(input.to_string())
        .assert()
        .success()
}

#[test]
fn script_mode_reports_seeded_indicators() {
    let base = temp_base();
    run_script(&base, "# dashboard\nkpis\nexit\n")
        .stdout(contains("27.500,00 MT"))
        .stdout(contains("19.700,00 MT"))
        .stdout(contains("7.800,00 MT"))
        .stdout(contains("Delinquency rate:  66.7%"));
}

#[test]
fn tuition_payment_updates_status_and_delinquency() {
    let base = temp_base();
    run_script(&base, "pay 3 outubro\nkpis\nexit\n")
        .stdout(contains("Status is now paid."))
        .stdout(contains("Delinquency rate:  33.3%"));
}

#[test]
fn invalid_month_token_is_rejected() {
    let base = temp_base();
    run_script(&base, "pay 3 Outubro\nexit\n")
        .stdout(contains("unknown month `Outubro`"))
        .stdout(contains("hint: Use `help <command>`"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let base = temp_base();
    run_script(&base, "studnets\nexit\n")
        .stdout(contains("Unknown command `studnets`"))
        .stdout(contains("Suggestion: `students`?"));
}

#[test]
fn enrollments_survive_a_restart() {
    let base = temp_base();
    run_script(&base, "enroll \"Ana Langa\" 2 ana@example.com\nexit\n")
        .stdout(contains("Enrolled Ana Langa with id 4"));
    assert!(base.join("data").join("students.json").exists());

    run_script(&base, "students\nstudent 4\nexit\n")
        .stdout(contains("Ana Langa"))
        .stdout(contains("2ª Classe"))
        .stdout(contains("Enrollment:    #2024-004"));
}

#[test]
fn settings_changes_are_saved() {
    let base = temp_base();
    run_script(&base, "set financial.tuition_cycle1 5500\nexit\n")
        .stdout(contains("financial.tuition_cycle1 updated."));

    let raw = fs::read_to_string(base.join("config").join("settings.json")).unwrap();
    assert!(raw.contains("5500"), "{raw}");

    run_script(&base, "settings financial\nset financial.due_day 40\nexit\n")
        .stdout(contains("5.500,00 MT"))
        .stdout(contains("day must be between 1 and 31"));
}

#[test]
fn agenda_entries_can_be_added_and_removed() {
    let base = temp_base();
    run_script(
        &base,
        "event-add \"Feira de Ciências\" event 2024-11-08T08:00 2024-11-08T13:00 Pátio\n\
         events\nevent-delete 5\nevent-delete 5\nexit\n",
    )
    .stdout(contains("Added event 5: Feira de Ciências."))
    .stdout(contains("08/11/2024 08:00"))
    .stdout(contains("Deleted event 5: Feira de Ciências [event]."))
    .stdout(contains("No event with id `5`."));
}

#[test]
fn backups_can_be_listed_and_restored() {
    let base = temp_base();
    let assert = run_script(&base, "backup antes\nexit\n").stdout(contains("Backup created: school_"));
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let id = output
        .lines()
        .find_map(|line| line.split("Backup created: ").nth(1))
        .unwrap()
        .trim()
        .to_string();

    let script = format!("event-delete 1\nbackup list\nbackup restore {id}\nevents\nexit\n");
    run_script(&base, &script)
        .stdout(contains(id.as_str()))
        .stdout(contains(format!("Restored {id}.")))
        .stdout(contains("Dia da Paz"));
}

#[test]
fn alerts_charge_every_overdue_month() {
    let base = temp_base();
    run_script(&base, "alerts\nexit\n")
        .stdout(contains(
            "Neyma Sousa (2) owes 13.000,00 MT for 2 month(s) (setembro, outubro): last paid agosto",
        ))
        .stdout(contains(
            "Almiro Lobo (3) owes 6.500,00 MT for 1 month(s) (outubro): last paid setembro",
        ));
}

#[test]
fn last_paid_month_follows_the_calendar_not_entry_order() {
    let base = temp_base();
    run_script(&base, "pay 2 outubro\npay 2 setembro\nstudent 2\nalerts\nexit\n")
        .stdout(contains("Last paid:     outubro"))
        .stdout(contains("Neyma Sousa (2) owes").not());
}

#[test]
fn staff_listing_and_department_filter() {
    let base = temp_base();
    run_script(&base, "staff\nstaff seguranca\nstaff cozinha\nexit\n")
        .stdout(contains("Ricardo Mendes"))
        .stdout(contains("65.000,00 MT"))
        .stdout(contains("4 on payroll, 120.000,00 MT in base salaries per month."))
        .stdout(contains("1 on payroll, 12.000,00 MT in base salaries per month."))
        .stdout(contains("unknown department `cozinha`"));
}

#[test]
fn payroll_totals_and_settlement_persist() {
    let base = temp_base();
    run_script(&base, "payroll\npayroll pay p4\nexit\n")
        .stdout(contains("Total net:      103.500,00 MT"))
        .stdout(contains("Outstanding:    26.400,00 MT"))
        .stdout(contains("Marked Carla Dias - Outubro 2023 [paid], net 14.800,00 MT."))
        .stdout(contains("Outstanding payroll: 11.600,00 MT."));

    run_script(&base, "payroll Outubro 2023\npayroll pay p99\nexit\n")
        .stdout(contains("Outstanding:    11.600,00 MT"))
        .stdout(contains("20/10/2024"))
        .stdout(contains("No payroll entry with id `p99`."));
}

#[test]
fn hiring_and_running_a_new_payroll_month() {
    let base = temp_base();
    run_script(
        &base,
        "hire \"Rosa Nhantumbo\" Cozinheira servicos 9000\n\
         payroll run Novembro 2023\npayroll run Novembro 2023\npayroll Novembro 2023\nexit\n",
    )
    .stdout(contains("Hired Rosa Nhantumbo (Cozinheira, Serviços Gerais) with id 5."))
    .stdout(contains("Generated 5 payroll entries for Novembro 2023."))
    .stdout(contains("Payroll for Novembro 2023 already covers every active employee."))
    .stdout(contains("p9"))
    .stdout(contains("Total net:      129.000,00 MT"));
}
