use chrono::{DateTime, TimeZone, Utc};
use seiva_domain::{CalendarEvent, Displayable, EventCategory};

use crate::cli::core::{parse_date_time, CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{require_args, ShellContext};
use crate::cli::table::{Table, TableColumn};

use super::next_numeric_id;

const EVENT_ADD_USAGE: &str =
    "event-add <title> <academic|holiday|administrative|event> <start> <end> [location]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("events", "List the school agenda", "events", cmd_events),
        CommandEntry::new(
            "event-add",
            "Add an agenda entry (times as YYYY-MM-DDTHH:MM, UTC)",
            EVENT_ADD_USAGE,
            cmd_event_add,
        ),
        CommandEntry::new(
            "event-delete",
            "Remove an agenda entry",
            "event-delete <id>",
            cmd_event_delete,
        ),
    ]
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%d/%m/%Y %H:%M").to_string()
}

fn cmd_events(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let mut events: Vec<&CalendarEvent> = context.session.store().events().iter().collect();
    if events.is_empty() {
        io::print_info("The agenda is empty.");
        return Ok(());
    }
    events.sort_by_key(|event| event.start);

    let mut table = Table::new(vec![
        TableColumn::new("ID", 6),
        TableColumn::new("Title", 28),
        TableColumn::new("Category", 15),
        TableColumn::new("Start", 17),
        TableColumn::new("End", 17),
        TableColumn::new("Location", 20),
    ]);
    for event in events {
        table.add_row(vec![
            event.id.clone(),
            event.title.clone(),
            event.category.to_string(),
            format_instant(event.start),
            format_instant(event.end),
            event.location.clone().unwrap_or_default(),
        ]);
    }
    output_section("Agenda");
    table.print();
    Ok(())
}

fn cmd_event_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 4, EVENT_ADD_USAGE)?;
    let title = args[0].trim();
    if title.is_empty() {
        return Err(CommandError::InvalidArguments("event title cannot be empty".into()));
    }
    let category = EventCategory::parse(args[1]).ok_or_else(|| {
        CommandError::InvalidArguments(format!("unknown event category `{}`", args[1]))
    })?;
    let start = Utc.from_utc_datetime(&parse_date_time(args[2])?);
    let end = Utc.from_utc_datetime(&parse_date_time(args[3])?);
    if end < start {
        return Err(CommandError::InvalidArguments(
            "event end must not be before its start".into(),
        ));
    }

    let id = next_numeric_id(
        context
            .session
            .store()
            .events()
            .iter()
            .map(|event| event.id.as_str()),
    );
    let mut event = CalendarEvent::new(title, start, end, category).with_id(id.clone());
    if let Some(location) = args.get(4) {
        event = event.with_location(*location);
    }
    context.session.add_event(event);
    io::print_success(format!("Added event {id}: {title}."));
    Ok(())
}

fn cmd_event_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 1, "event-delete <id>")?;
    let label = context
        .session
        .store()
        .event(args[0])
        .map(Displayable::display_label);
    match label {
        Some(label) if context.session.delete_event(args[0]) => {
            io::print_success(format!("Deleted event {}: {label}.", args[0]));
        }
        _ => io::print_warning(format!("No event with id `{}`.", args[0])),
    }
    Ok(())
}
