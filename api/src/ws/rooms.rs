/// Room keys the gateway multiplexes onto.
///
/// One chat room per intervention, one personal notification room per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKey {
    Chat(i64),
    User(i64),
}

impl RoomKey {
    pub fn path(&self) -> String {
        match *self {
            RoomKey::Chat(intervention_id) => format!("chat_{intervention_id}"),
            RoomKey::User(user_id) => format!("user_{user_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_paths_are_stable() {
        assert_eq!(RoomKey::Chat(7).path(), "chat_7");
        assert_eq!(RoomKey::User(3).path(), "user_3");
    }
}
