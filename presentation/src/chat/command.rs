//! Slash-command parsing for the negotiation shell

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    /// Start a new negotiation
    New,
    /// Show the current client
    ShowClient,
    /// Set client name and phone
    SetClient { name: String, phone: String },
    Save,
    /// List sessions, optionally filtered
    Sessions(Option<String>),
    Load(String),
    History,
    Products,
    /// Known command with bad arguments; carries the usage line
    Usage(&'static str),
    Unknown(String),
}

pub const CLIENT_USAGE: &str = "/client <nome> | <telefone>";
pub const LOAD_USAGE: &str = "/load <arquivo>";

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/new" | "/nova" => ReplCommand::New,
            "/client" | "/cliente" => Self::parse_client(args),
            "/save" | "/salvar" => ReplCommand::Save,
            "/sessions" | "/sessoes" => {
                ReplCommand::Sessions((!args.is_empty()).then(|| args.to_string()))
            }
            "/load" | "/carregar" => {
                if args.is_empty() {
                    ReplCommand::Usage(LOAD_USAGE)
                } else {
                    ReplCommand::Load(args.to_string())
                }
            }
            "/history" | "/historico" => ReplCommand::History,
            "/products" | "/produtos" => ReplCommand::Products,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }

    fn parse_client(args: &str) -> Self {
        if args.is_empty() {
            return ReplCommand::ShowClient;
        }
        match args.split_once('|') {
            Some((name, phone)) => ReplCommand::SetClient {
                name: name.trim().to_string(),
                phone: phone.trim().to_string(),
            },
            None => ReplCommand::Usage(CLIENT_USAGE),
        }
    }
}
