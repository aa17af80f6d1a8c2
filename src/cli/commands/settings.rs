use seiva_config::Config;
use seiva_core::format_currency;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{require_args, ShellContext};

const SECTIONS: [&str; 5] = ["profile", "academic", "financial", "system", "user"];
const SETTINGS_USAGE: &str =
    "settings [section|json|backups|reset|restore <backup>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "settings",
            "Show or manage school settings",
            SETTINGS_USAGE,
            cmd_settings,
        ),
        CommandEntry::new(
            "set",
            "Change one setting, e.g. `set financial.tuition_cycle1 5500`",
            "set <section.field> <value>",
            cmd_set,
        ),
    ]
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None => {
            for section in SECTIONS {
                print_section(&context.config, section);
            }
            Ok(())
        }
        Some("json") => {
            io::print_info(serde_json::to_string_pretty(&context.config)?);
            Ok(())
        }
        Some("backups") => {
            let backups = context.config_manager.list_backups()?;
            output_section("Settings backups");
            if backups.is_empty() {
                io::print_info("No settings backups yet.");
            }
            for name in backups {
                io::print_info(format!("  {name}"));
            }
            Ok(())
        }
        Some("reset") => {
            context.config = context.config_manager.reset()?;
            io::print_success("Settings reset to defaults.");
            Ok(())
        }
        Some("restore") => {
            let args = require_args(args, 2, "settings restore <backup>")?;
            context.config = context.config_manager.restore(args[1])?;
            io::print_success(format!("Settings restored from {}.", args[1]));
            Ok(())
        }
        Some(section) if SECTIONS.contains(&section) => {
            print_section(&context.config, section);
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown settings section `{other}` (use {})",
            SECTIONS.join(", ")
        ))),
    }
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 2, "set <section.field> <value>")?;
    let value = args[1..].join(" ");
    context.config.apply_setting(args[0], &value)?;
    context.save_settings()?;
    io::print_success(format!("{} updated.", args[0]));
    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn print_section(config: &Config, section: &str) {
    output_section(section);
    let lines: Vec<(&str, String)> = match section {
        "profile" => {
            let p = &config.profile;
            vec![
                ("name", p.name.clone()),
                ("slogan", p.slogan.clone()),
                ("nuit", p.nuit.clone()),
                ("address", p.address.clone()),
                ("email", p.email.clone()),
                ("phone", p.phone.clone()),
            ]
        }
        "academic" => {
            let a = &config.academic;
            vec![
                ("current_year", a.current_year.to_string()),
                ("grading_system", a.grading_system.to_string()),
                ("passing_grade", a.passing_grade.to_string()),
                ("active_terms", a.active_terms.join(", ")),
            ]
        }
        "financial" => {
            let f = &config.financial;
            vec![
                ("currency", f.currency.clone()),
                ("due_day", f.due_day.to_string()),
                ("late_fee", format!("{}%", f.late_fee)),
                ("tuition_cycle1", format_currency(f.tuition_cycle1)),
                ("tuition_cycle2", format_currency(f.tuition_cycle2)),
                ("bank_info", f.bank_info.replace('\n', " | ")),
            ]
        }
        "system" => {
            let s = &config.system;
            vec![
                ("maintenance_mode", on_off(s.maintenance_mode).to_string()),
                ("email_alerts", on_off(s.email_alerts).to_string()),
                ("sms_integration", on_off(s.sms_integration).to_string()),
            ]
        }
        "user" => {
            let u = &config.user;
            vec![
                ("name", u.name.clone()),
                ("role", u.role.clone()),
                ("email", u.email.clone()),
            ]
        }
        _ => Vec::new(),
    };
    for (key, value) in lines {
        io::print_info(format!("  {key:<18} {value}"));
    }
}
