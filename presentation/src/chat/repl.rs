//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::{HELP, ReplCommand};
use crate::config::ReplConfig;
use crate::output::{ConsoleFormatter, StreamPrinter, StreamUpdate};
use crate::progress::TurnProgress;
use chatstream_application::{ExportHistoryUseCase, SubmitTurnInput, SubmitTurnUseCase};
use chatstream_domain::{GenerationParams, Session};
use colored::Colorize;
use futures::StreamExt;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io::Write;
use tracing::{info, warn};

const HISTORY_CAPACITY: usize = 1000;

/// Interactive chat REPL
pub struct ChatRepl {
    submit: SubmitTurnUseCase,
    export: ExportHistoryUseCase,
    session: Session,
    params: GenerationParams,
    system_prompt: String,
    prefill: String,
    config: ReplConfig,
}

impl ChatRepl {
    pub fn new(
        submit: SubmitTurnUseCase,
        export: ExportHistoryUseCase,
        params: GenerationParams,
    ) -> Self {
        let session = Session::new();
        info!(session = %session.id(), "New session created");
        Self {
            submit,
            export,
            session,
            params,
            system_prompt: String::new(),
            prefill: String::new(),
            config: ReplConfig::default(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_prefill(mut self, prefill: impl Into<String>) -> Self {
        self.prefill = prefill.into();
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send one message and print the reply (non-interactive mode).
    pub async fn ask(&mut self, message: &str) {
        self.process_message(message).await;
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();
        if let Some(path) = self.config.history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!("Could not open history file {}: {}", path.display(), e),
            }
        }
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("chat".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)) {
                            break;
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Signal::CtrlC => continue,
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("Chatstream"));
        println!();
        println!("Model: {}", self.params.model);
        println!("Session: {}", self.session.id().dimmed());
        println!();
        println!("Type /help for commands.");
        println!();
    }

    fn print_settings(&self) {
        println!();
        println!("{} {}", "Model:".cyan().bold(), self.params.model);
        println!(
            "{} {}",
            "Temperature:".cyan().bold(),
            self.params.temperature()
        );
        println!("{} {}", "Max tokens:".cyan().bold(), self.params.max_tokens());
        let or_none = |s: &str| {
            if s.trim().is_empty() {
                "(none)".dimmed().to_string()
            } else {
                s.to_string()
            }
        };
        println!("{} {}", "System:".cyan().bold(), or_none(&self.system_prompt));
        println!("{} {}", "Prefill:".cyan().bold(), or_none(&self.prefill));
        println!(
            "{} {} completed turns",
            "History:".cyan().bold(),
            self.session.assistant_messages().len()
        );
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                println!("{}", HELP);
                println!();
            }
            ReplCommand::Settings => self.print_settings(),
            ReplCommand::Clear => {
                self.session.clear();
                info!(session = %self.session.id(), "Cleared history");
                println!("{}", ConsoleFormatter::status("History cleared."));
            }
            ReplCommand::Export(format) => match self.export.execute(&self.session, format) {
                Ok(receipt) => println!("{}", ConsoleFormatter::status(&receipt.status())),
                Err(e) => eprintln!("{}", ConsoleFormatter::error(&e.to_string())),
            },
            ReplCommand::Temperature(value) => {
                match self.params.clone().with_temperature(value) {
                    Ok(params) => {
                        self.params = params;
                        println!(
                            "{}",
                            ConsoleFormatter::status(&format!(
                                "Temperature set to {}",
                                self.params.temperature()
                            ))
                        );
                    }
                    Err(e) => eprintln!("{}", ConsoleFormatter::error(&e.to_string())),
                }
            }
            ReplCommand::MaxTokens(value) => match self.params.clone().with_max_tokens(value) {
                Ok(params) => {
                    self.params = params;
                    println!(
                        "{}",
                        ConsoleFormatter::status(&format!("Max tokens set to {}", value))
                    );
                }
                Err(e) => eprintln!("{}", ConsoleFormatter::error(&e.to_string())),
            },
            ReplCommand::System(text) => {
                self.system_prompt = text;
                println!("{}", ConsoleFormatter::status("System instruction updated."));
            }
            ReplCommand::Prefill(text) => {
                self.prefill = text;
                println!("{}", ConsoleFormatter::status("Prefill updated."));
            }
            ReplCommand::Usage(usage) => println!("Usage: {}", usage),
            ReplCommand::Unknown(name) => {
                println!("Unknown command: {}", name);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_message(&mut self, message: &str) {
        println!();

        let input = SubmitTurnInput::new(message, self.params.clone())
            .with_prefill(self.prefill.clone())
            .with_system_prompt(self.system_prompt.clone());
        let stop = self.session.stop_handle();
        let mut progress = TurnProgress::start(self.config.show_progress);
        let mut printer = StreamPrinter::new();
        let mut stdout = std::io::stdout();

        let turn = self.submit.submit(&mut self.session, input);
        futures::pin_mut!(turn);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut stopping = false;

        loop {
            tokio::select! {
                next = turn.next() => {
                    let Some(transcript) = next else { break };
                    let Some(reply) = transcript.last_assistant() else { continue };
                    progress.clear();
                    match printer.update(reply) {
                        StreamUpdate::Unchanged => {}
                        StreamUpdate::Append(text) => {
                            let _ = write!(stdout, "{}", text);
                        }
                        StreamUpdate::Restart(text) => {
                            let _ = write!(stdout, "\n{}\n{}", "(restarted)".dimmed(), text);
                        }
                    }
                    let _ = stdout.flush();
                }
                _ = &mut ctrl_c, if !stopping => {
                    stopping = true;
                    stop.request_stop();
                    progress.clear();
                    info!("Stop requested");
                    let _ = write!(stdout, " {}", "[stopping]".yellow());
                    let _ = stdout.flush();
                }
            }
        }

        println!();
        println!();
    }
}
