//! Terminal commands understood by the chat prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    /// `/voice on|off`; `None` reports the current setting.
    Voice(Option<bool>),
    Mic,
    Replay,
    Wave,
    Tilt,
    Status,
    Help,
    Unknown(String),
    Say(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return ReplCommand::Quit;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Say(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("quit"), _) => ReplCommand::Quit,
            (Some("voice"), None) => ReplCommand::Voice(None),
            (Some("voice"), Some("on")) => ReplCommand::Voice(Some(true)),
            (Some("voice"), Some("off")) => ReplCommand::Voice(Some(false)),
            (Some("mic"), _) => ReplCommand::Mic,
            (Some("replay"), _) => ReplCommand::Replay,
            (Some("wave"), _) => ReplCommand::Wave,
            (Some("tilt"), _) => ReplCommand::Tilt,
            (Some("status"), _) => ReplCommand::Status,
            (Some("help"), _) => ReplCommand::Help,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  /voice [on|off]  toggle spoken replies
  /mic             talk instead of typing
  /replay          speak the last reply again
  /wave, /tilt     play a motion
  /status          print the avatar state
  quit             leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse(" /voice off "), ReplCommand::Voice(Some(false)));
        assert_eq!(ReplCommand::parse("/voice"), ReplCommand::Voice(None));
        assert_eq!(ReplCommand::parse("/mic"), ReplCommand::Mic);
        assert_eq!(
            ReplCommand::parse("/voice loud"),
            ReplCommand::Unknown("/voice loud".into())
        );
    }

    #[test]
    fn test_plain_text_is_said() {
        assert_eq!(
            ReplCommand::parse("こんにちは"),
            ReplCommand::Say("こんにちは".into())
        );
        assert_eq!(ReplCommand::parse(""), ReplCommand::Say(String::new()));
    }
}
