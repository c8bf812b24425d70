//! Chat command parsing.

/// A command addressed to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Positions,
    AddLimit { coin: String, time: String },
    RemoveLimit { coin: String },
    Limits,
    /// `None` asks for the current interval.
    SetCheckInterval { interval: Option<String> },
    /// A known command with missing arguments.
    Usage(UsageTopic),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageTopic {
    AddLimit,
    RemoveLimit,
}

/// Commands advertised in the client's command menu.
pub const MENU: [(&str, &str); 6] = [
    ("positions", "Show open futures positions"),
    ("add_limit", "Set a holding limit: /add_limit LSK 12h"),
    ("remove_limit", "Remove a holding limit"),
    ("limits", "List holding limits"),
    ("set_check_interval", "Show or change the check interval"),
    ("help", "Show help"),
];

impl Command {
    /// Parse a chat message. Returns `None` for text that is not a command.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let body = text.strip_prefix('/')?;
        let mut words = body.split_whitespace();
        let head = words.next()?;
        // `/cmd@SomeBot` in group chats
        let name = head.split('@').next().unwrap_or(head).to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "positions" | "ps" => Self::Positions,
            "limits" | "ls" => Self::Limits,
            "add_limit" | "l" => match args.as_slice() {
                [coin, time, ..] => Self::AddLimit {
                    coin: coin.to_string(),
                    time: time.to_string(),
                },
                _ => Self::Usage(UsageTopic::AddLimit),
            },
            "remove_limit" | "rl" => match args.first() {
                Some(coin) => Self::RemoveLimit {
                    coin: coin.to_string(),
                },
                None => Self::Usage(UsageTopic::RemoveLimit),
            },
            "set_check_interval" => Self::SetCheckInterval {
                interval: args.first().map(|s| s.to_string()),
            },
            _ => Self::Unknown(head.to_string()),
        };
        Some(command)
    }
}
