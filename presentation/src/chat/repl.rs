//! REPL (Read-Eval-Print Loop) for a negotiation

use super::command::ReplCommand;
use crate::ConsoleFormatter;
use crate::TurnSpinner;
use colored::Colorize;
use negotia_application::{NegotiationController, NegotiationError, TurnOutcome, TurnReply};
use negotia_domain::ProductUsage;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Interactive negotiation shell
pub struct ChatRepl {
    controller: NegotiationController,
    show_progress: bool,
    top_products: usize,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(controller: NegotiationController) -> Self {
        Self {
            controller,
            show_progress: true,
            top_products: 5,
            history_file: dirs::data_dir().map(|p| p.join("negotia").join("history.txt")),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Number of products in the ranking of `/products`
    pub fn with_top_products(mut self, n: usize) -> Self {
        self.top_products = n;
        self
    }

    /// Override where line history is kept
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_file = path;
        }
        self
    }

    pub fn controller(&self) -> &NegotiationController {
        &self.controller
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline("cliente> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    self.process_turn(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Até logo!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "╭─────────────────────────────────────────────╮".cyan());
        println!("{}", "│        negotia - Negociação com ANA         │".cyan());
        println!("{}", "╰─────────────────────────────────────────────╯".cyan());
        println!();
        println!(
            "{} {} ({} produtos no catálogo)",
            "Agente:".bold(),
            self.controller.backend_name(),
            self.controller.catalog().len()
        );
        if let Some(session) = self.controller.state().current_session() {
            println!("{} {}", "Sessão:".bold(), session);
        }
        println!();
        println!(
            "{}",
            "Digite a mensagem do cliente. A sessão é salva automaticamente".dimmed()
        );
        println!(
            "{}",
            "quando nome e telefone do cliente estão preenchidos (/client).".dimmed()
        );
        println!("Type {} for commands.", "/help".cyan());
        println!();
    }

    fn print_help() {
        println!();
        println!("{}", "Commands:".bold());
        println!("  /new                       - Start a new negotiation");
        println!("  /client <nome> | <telefone> - Set client (no args: show)");
        println!("  /save                      - Save the current session");
        println!("  /sessions [termo]          - List saved sessions");
        println!("  /load <arquivo>            - Resume a saved session");
        println!("  /history                   - Show the conversation");
        println!("  /products                  - Show products used");
        println!("  /help, /h, /?              - Show this help");
        println!("  /quit, /exit, /q           - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        match ReplCommand::parse(line) {
            ReplCommand::Quit => {
                println!("Até logo!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::New => {
                self.controller.new_negotiation().await;
                println!("{}", "Nova negociação iniciada.".green());
            }
            ReplCommand::ShowClient => {
                print!(
                    "{}",
                    ConsoleFormatter::format_client(self.controller.state().client())
                );
            }
            ReplCommand::SetClient { name, phone } => {
                self.controller.set_client_info(&name, &phone);
                print!(
                    "{}",
                    ConsoleFormatter::format_client(self.controller.state().client())
                );
            }
            ReplCommand::Save => match self.controller.save_current_session() {
                Ok(filename) => println!("{} {}", "Sessão salva:".green(), filename),
                Err(NegotiationError::MissingClientInfo) => {
                    println!(
                        "{}",
                        ConsoleFormatter::format_error(
                            "informe nome e telefone com /client antes de salvar"
                        )
                    );
                }
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Sessions(term) => match self.controller.list_sessions(term.as_deref()) {
                Ok(sessions) => print!("{}", ConsoleFormatter::format_sessions(&sessions)),
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Load(filename) => match self.controller.load_session(&filename) {
                Ok(()) => {
                    println!("{} {}", "Sessão carregada:".green(), filename);
                    print!(
                        "{}",
                        ConsoleFormatter::format_history(&self.controller.visible_history())
                    );
                }
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::History => {
                print!(
                    "{}",
                    ConsoleFormatter::format_history(&self.controller.visible_history())
                );
            }
            ReplCommand::Products => {
                let log = self.controller.products_log();
                let top = ProductUsage::top(log, self.top_products);
                print!("{}", ConsoleFormatter::format_products(log, &top));
            }
            ReplCommand::Usage(usage) => {
                println!("{} {}", "Usage:".yellow().bold(), usage);
            }
            ReplCommand::Unknown(command) => {
                println!(
                    "{} Unknown command: {} (try /help)",
                    "Error:".red().bold(),
                    command
                );
            }
        }
        false
    }

    /// Send one client message; Ctrl+C while waiting cancels the agent call.
    async fn process_turn(&mut self, text: &str) {
        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let spinner = TurnSpinner::start("pensando...", self.show_progress);
        let result = self.controller.submit_user_turn(text, &cancel).await;
        watcher.abort();

        match result {
            Ok(TurnOutcome::Replied(TurnReply {
                reply,
                extraction,
                saved_as,
            })) => {
                spinner.finish_ok();
                print!("{}", ConsoleFormatter::format_reply(&reply, &extraction));
                if let Some(filename) = saved_as {
                    debug!(session = %filename, "Turn persisted");
                }
                println!();
            }
            Ok(TurnOutcome::NoReply) => {
                spinner.finish_err("sem resposta");
                println!("{}", "ANA não respondeu. Tente novamente.".yellow());
            }
            Ok(TurnOutcome::Ignored) => spinner.finish_ok(),
            Err(NegotiationError::Agent(e)) if e.is_cancelled() => {
                spinner.finish_err("cancelado");
            }
            Err(e) => {
                spinner.finish_err("falhou");
                println!("{}", ConsoleFormatter::format_error(&e.to_string()));
            }
        }
    }
}
