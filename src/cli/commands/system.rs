use seiva_core::CoreError;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(
            "save",
            "Write school data and settings to disk now",
            "save",
            cmd_save,
        ),
        CommandEntry::new(
            "backup",
            "Create, list or restore data backups",
            "backup [note] | backup list | backup restore <id>",
            cmd_backup,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.save()?;
    context.save_settings()?;
    let store = context.session.store();
    io::print_success(format!(
        "Saved {} students, {} transactions, {} events and {} staff records.",
        store.students().len(),
        store.transactions().len(),
        store.events().len(),
        store.employees().len()
    ));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        Some("list") => list_backups(context),
        Some("restore") => {
            let id = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: backup restore <id>".into())
            })?;
            restore_backup(context, id)
        }
        _ => {
            let note = (!args.is_empty()).then(|| args.join(" "));
            let snapshot = context.session.store().snapshot();
            let info = context.storage.backup(&snapshot, note.as_deref())?;
            let settings = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            io::print_success(format!("Backup created: {}", info.id));
            io::print_info(format!("Settings backup: {settings}"));
            Ok(())
        }
    }
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.storage.list_backups()?;
    output_section("Backups");
    if backups.is_empty() {
        io::print_info("No backups yet. Use `backup [note]` to create one.");
        return Ok(());
    }
    for backup in backups {
        let created = backup
            .created_at
            .map(|ts| ts.format("%d/%m/%Y %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".into());
        io::print_info(format!(
            "  {}  ({created}, {} bytes)",
            backup.id, backup.size_bytes
        ));
    }
    Ok(())
}

fn restore_backup(context: &mut ShellContext, id: &str) -> CommandResult {
    let backup = context
        .storage
        .list_backups()?
        .into_iter()
        .find(|backup| backup.id == id || backup.id.trim_end_matches(".json") == id)
        .ok_or_else(|| CoreError::Storage(format!("backup `{id}` not found")))?;
    let snapshot = context.storage.restore_backup(&backup)?;
    context.session.replace_all(snapshot);
    io::print_success(format!("Restored {}.", backup.id));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
