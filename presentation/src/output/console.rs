//! Console output formatter
//!
//! Every method returns a `String`; printing is left to the shell.

use colored::Colorize;
use negotia_domain::{
    ClientInfo, Extraction, ExtractionOutcome, ProductLogEntry, ProductUsage, Role,
    SessionSummary, VisibleTurn,
};

const USER_LABEL: &str = "Cliente";
const ASSISTANT_LABEL: &str = "ANA";

/// Formats negotiation state for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// An assistant reply followed by the products it used.
    pub fn format_reply(reply: &str, extraction: &Extraction) -> String {
        let mut output = format!("\n{} {}\n", Self::label(Role::Assistant), reply);

        match &extraction.outcome {
            ExtractionOutcome::Untagged => {}
            ExtractionOutcome::Tagged {
                entries,
                unknown_ids,
            } => {
                for entry in entries {
                    output.push_str(&format!(
                        "  {} {}\n",
                        "Produto utilizado:".dimmed(),
                        Self::product_name(entry)
                    ));
                }
                if !unknown_ids.is_empty() {
                    let ids: Vec<String> = unknown_ids.iter().map(i64::to_string).collect();
                    output.push_str(&format!(
                        "  {} {}\n",
                        "Produtos fora do catálogo:".yellow(),
                        ids.join(", ")
                    ));
                }
            }
            ExtractionOutcome::Failed(e) => {
                output.push_str(&format!(
                    "  {} {}\n",
                    "Marcação de produtos ilegível:".yellow(),
                    e
                ));
            }
        }

        output
    }

    /// The whole visible conversation, marking replies that used a product.
    pub fn format_history(history: &[VisibleTurn]) -> String {
        if history.is_empty() {
            return format!("{}\n", "(conversa vazia)".dimmed());
        }

        let mut output = Self::section_header("Conversa");
        for visible in history {
            output.push_str(&format!(
                "{} {}",
                Self::label(visible.turn.role()),
                visible.turn.content()
            ));
            if let Some(product) = &visible.product {
                output.push_str(&format!(" {}", format!("[{}]", product.name).cyan()));
            }
            output.push('\n');
        }
        output
    }

    /// The product log, newest first, followed by the most used products.
    pub fn format_products(log: &[ProductLogEntry], top: &[ProductUsage]) -> String {
        if log.is_empty() {
            return format!("{}\n", "Nenhum produto utilizado ainda.".dimmed());
        }

        let mut output = Self::section_header("Produtos utilizados");
        for entry in log.iter().rev() {
            output.push_str(&format!(
                "{} {}\n    {} {}\n",
                Self::short_time(&entry.timestamp).dimmed(),
                Self::product_name(entry).bold(),
                "Contexto:".dimmed(),
                entry.usage_context
            ));
        }

        if !top.is_empty() {
            output.push_str(&Self::section_header("Mais utilizados"));
            for (rank, usage) in top.iter().enumerate() {
                output.push_str(&format!(
                    "{:>2}. {} (#{}) - {}x\n",
                    rank + 1,
                    usage.name,
                    usage.id,
                    usage.count
                ));
            }
        }
        output
    }

    /// Saved sessions, one label per line.
    pub fn format_sessions(sessions: &[SessionSummary]) -> String {
        if sessions.is_empty() {
            return format!("{}\n", "Nenhuma sessão encontrada.".dimmed());
        }

        let mut output = Self::section_header("Sessões salvas");
        for session in sessions {
            output.push_str(&format!(
                "  {}\n    {}\n",
                session.label(),
                session.filename.dimmed()
            ));
        }
        output
    }

    pub fn format_client(client: &ClientInfo) -> String {
        let show = |value: &str| {
            if value.is_empty() {
                "(não informado)".dimmed().to_string()
            } else {
                value.to_string()
            }
        };
        format!(
            "{} {}\n{} {}\n",
            "Nome:".bold(),
            show(client.name()),
            "Telefone:".bold(),
            show(client.phone())
        )
    }

    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn label(role: Role) -> String {
        match role {
            Role::User => format!("{}:", USER_LABEL).green().bold().to_string(),
            Role::Assistant => format!("{}:", ASSISTANT_LABEL).cyan().bold().to_string(),
        }
    }

    fn product_name(entry: &ProductLogEntry) -> String {
        format!("{} (#{})", entry.name, entry.id)
    }

    /// `YYYY-mm-dd HH:MM` part of a stored timestamp.
    fn short_time(timestamp: &str) -> String {
        timestamp.chars().take(16).collect::<String>().replace('T', " ")
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}
