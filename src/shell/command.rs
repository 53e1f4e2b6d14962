//! Line parsing for the interactive shell.

use super::View;

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:home`, `:recall`, `:graph`, `:settings`
    Navigate(View),
    /// `:help`
    Help,
    /// `:quit` / `:q`
    Quit,
    /// `:dismiss`, clears the active view's notices.
    Dismiss,
    /// Anything else, routed to the active view.
    Action {
        /// First word, lowercased.
        verb: String,
        /// The rest of the line, trimmed.
        arg: String,
    },
    /// An unrecognized `:` command.
    Unknown(String),
}

impl Command {
    /// Parses one line; blank lines yield `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(meta) = line.strip_prefix(':') {
            let meta = meta.trim().to_lowercase();
            return Some(match meta.as_str() {
                "help" | "h" | "?" => Self::Help,
                "quit" | "q" | "exit" => Self::Quit,
                "dismiss" => Self::Dismiss,
                other => other
                    .parse::<View>()
                    .map_or_else(|_| Self::Unknown(other.to_string()), Self::Navigate),
            });
        }

        let (verb, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        Some(Self::Action {
            verb: verb.to_lowercase(),
            arg: arg.trim().to_string(),
        })
    }
}

/// Help text listing every command.
pub const HELP: &str = "\
Views:    :home  :recall  :graph  :settings
General:  :help  :dismiss  :quit
home:     title <text> | content <text> | context <text> | submit | answer <text> | confirm | discard
recall:   ask <question>
graph:    refresh | reindex | filter [text] | select <id> | clear | delete | confirm | cancel | canvas
settings: show | set <field> <value> | reindex | reset | confirm | cancel";

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(":graph", Some(Command::Navigate(View::Graph)); "navigate")]
    #[test_case("  :Q ", Some(Command::Quit); "quit alias")]
    #[test_case(":nope", Some(Command::Unknown("nope".to_string())); "unknown meta")]
    #[test_case("", None; "blank")]
    #[test_case("ask  what is  up ", Some(Command::Action { verb: "ask".to_string(), arg: "what is  up".to_string() }); "action keeps inner spacing")]
    #[test_case("Submit", Some(Command::Action { verb: "submit".to_string(), arg: String::new() }); "bare verb")]
    fn test_parse(line: &str, expected: Option<Command>) {
        assert_eq!(Command::parse(line), expected);
    }
}
