//! Parsing of lines sent from engine to GUI.

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id {
        name: Option<String>,
        author: Option<String>,
    },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information, kept as raw text.
    Info(String),
    /// Best move found.
    BestMove { mv: String, ponder: Option<String> },
    /// Anything else (options, copyright banners, blank lines).
    Other(String),
}

impl EngineMessage {
    /// Parse a single line of engine output.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("uciok") => EngineMessage::UciOk,
            Some("readyok") => EngineMessage::ReadyOk,
            Some("id") => match parts.next() {
                Some("name") => EngineMessage::Id {
                    name: Some(rest_after(line, "name")),
                    author: None,
                },
                Some("author") => EngineMessage::Id {
                    name: None,
                    author: Some(rest_after(line, "author")),
                },
                _ => EngineMessage::Other(line.to_string()),
            },
            Some("info") => EngineMessage::Info(rest_after(line, "info")),
            Some("bestmove") => {
                let mv = parts.next().unwrap_or("").to_string();
                let ponder = match parts.next() {
                    Some("ponder") => parts.next().map(str::to_string),
                    _ => None,
                };
                EngineMessage::BestMove { mv, ponder }
            }
            _ => EngineMessage::Other(line.to_string()),
        }
    }
}

/// Everything after the first occurrence of `keyword`, trimmed.
fn rest_after(line: &str, keyword: &str) -> String {
    line.split_once(keyword)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}
