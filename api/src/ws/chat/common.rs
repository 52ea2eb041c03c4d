use serde::Deserialize;

/// Inbound chat frames.
///
/// The wire shape is positional rather than type-tagged: a plain
/// `{"message": "..."}` sends a chat message, while `{"action": "..."}`
/// frames carry the two lifecycle commands. Anything else fails to parse
/// and is answered with an `error` event.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChatIncoming {
    Command(ChatCommand),
    Send { message: String },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChatCommand {
    /// Employee ends the conversation; closes the intervention for everyone.
    EndChat,
    /// Client rates a closed conversation.
    RateChat { rating: Option<i32> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_parses_as_send() {
        let frame: ChatIncoming = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert!(matches!(frame, ChatIncoming::Send { message } if message == "hello"));
    }

    #[test]
    fn end_chat_parses_as_command() {
        let frame: ChatIncoming = serde_json::from_str(r#"{"action":"end_chat"}"#).unwrap();
        assert!(matches!(frame, ChatIncoming::Command(ChatCommand::EndChat)));
    }

    #[test]
    fn rate_chat_carries_rating() {
        let frame: ChatIncoming =
            serde_json::from_str(r#"{"action":"rate_chat","rating":5}"#).unwrap();
        assert!(matches!(
            frame,
            ChatIncoming::Command(ChatCommand::RateChat { rating: Some(5) })
        ));
    }

    #[test]
    fn rate_chat_without_rating_still_parses() {
        let frame: ChatIncoming = serde_json::from_str(r#"{"action":"rate_chat"}"#).unwrap();
        assert!(matches!(
            frame,
            ChatIncoming::Command(ChatCommand::RateChat { rating: None })
        ));
    }

    #[test]
    fn unknown_action_does_not_parse() {
        assert!(serde_json::from_str::<ChatIncoming>(r#"{"action":"self_destruct"}"#).is_err());
    }
}
