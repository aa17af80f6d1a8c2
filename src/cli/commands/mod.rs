pub mod agenda;
pub mod finance;
pub mod hr;
pub mod settings;
pub mod students;
pub mod system;

use seiva_domain::{Identifiable, NamedEntity};

use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(students::definitions());
    commands.extend(finance::definitions());
    commands.extend(hr::definitions());
    commands.extend(agenda::definitions());
    commands.extend(settings::definitions());
    commands
}

pub(crate) fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in all_definitions() {
        registry.register(entry);
    }
    registry
}

/// Next free numeric id, ignoring non-numeric ones.
pub(crate) fn next_numeric_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let max = ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0);
    (max + 1).to_string()
}

/// `Name (id)` for any named record.
pub(crate) fn name_and_id<T: Identifiable + NamedEntity>(record: &T) -> String {
    format!("{} ({})", record.name(), record.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_documented_command_is_registered() {
        let registry = registry();
        for name in [
            "help", "students", "student", "enroll", "pay", "income", "expense", "transactions",
            "kpis", "cashflow", "alerts", "events", "event-add", "event-delete", "settings",
            "set", "save", "backup", "exit", "staff", "hire", "payroll",
        ] {
            assert!(registry.get(name).is_some(), "missing `{name}`");
        }
    }

    #[test]
    fn numeric_ids_skip_generated_ones() {
        let ids = ["1", "3", "a1b2c3", "2"];
        assert_eq!(next_numeric_id(ids.iter().copied()), "4");
        assert_eq!(next_numeric_id(std::iter::empty()), "1");
    }

    #[test]
    fn records_render_with_their_id() {
        let student = seiva_domain::Student::new("7", "Ana Langa", seiva_domain::Grade::Second);
        assert_eq!(name_and_id(&student), "Ana Langa (7)");
    }
}
