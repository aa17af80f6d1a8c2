use seiva_config::{Config, ConfigManager};
use seiva_core::{LoadOutcome, SchoolSession, SchoolStore};
use seiva_domain::Student;
use seiva_storage_json::JsonSchoolStorage;
use tracing::warn;

use crate::{
    cli::{
        commands,
        core::{CliMode, CommandError, CommandResult, LoopControl},
        io as cli_io,
        output::{self, OutputPreferences},
        registry::{CommandEntry, CommandRegistry},
        shell::parse_command_line,
        system_clock::clock_from_env,
    },
    errors::{CliError, SchoolError},
    utils,
};

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: SchoolSession,
    pub storage: JsonSchoolStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script || std::env::var_os("NO_COLOR").is_some(),
            high_contrast: false,
        });

        let base = utils::data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load().unwrap_or_else(|err| {
            warn!(error = %err, "settings unreadable, using defaults");
            cli_io::print_warning(format!("Settings could not be read ({err}); using defaults."));
            Config::default()
        });
        let storage = JsonSchoolStorage::new(base.join("data"))?;

        let store = SchoolStore::seeded(clock_from_env()?);
        let mut session = SchoolSession::new(store, Box::new(storage.clone()));
        match session.load() {
            LoadOutcome::Restored { warnings } => {
                for warning in warnings {
                    cli_io::print_warning(warning);
                }
            }
            LoadOutcome::Empty => {}
            LoadOutcome::Fallback { reason } => {
                cli_io::print_warning(format!(
                    "Saved school data could not be loaded ({reason}); showing demo records."
                ));
            }
        }

        Ok(Self {
            mode,
            registry: commands::registry(),
            session,
            storage,
            config_manager,
            config,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        format!("{}> ", self.config.profile.name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn student(&self, id: &str) -> Result<&Student, CommandError> {
        self.session
            .store()
            .student(id)
            .ok_or_else(|| CommandError::Core(SchoolError::StudentNotFound(id.to_string())))
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };

        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?")?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(SchoolError::StudentNotFound(id)) => {
                cli_io::print_error(format!("Student not found: {id}"));
                cli_io::print_hint("Use `students` to list enrolled students.");
            }
            other => cli_io::print_error(other),
        }
        Ok(())
    }

    pub(crate) fn save_settings(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}

pub(crate) fn require_args<'a>(
    args: &'a [&'a str],
    count: usize,
    usage: &str,
) -> Result<&'a [&'a str], CommandError> {
    if args.len() < count {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    } else {
        Ok(args)
    }
}
