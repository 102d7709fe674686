use serde::{Deserialize, Serialize};
use crate::manager_db::models::Location;

#[derive(Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
    pub location: Option<Location>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub username: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

impl Message {
    /// Returns the command name if the message text is a bot command for this bot.
    ///
    /// "/forecast" gives "forecast". A command addressed to a named bot, "/forecast@SomeBot",
    /// is only returned when the name matches our own username, otherwise it belongs to
    /// some other bot in the same group chat.
    ///
    /// # Arguments
    ///
    /// * 'bot_username' - this bot's username, if known
    pub fn command(&self, bot_username: Option<&str>) -> Option<&str> {
        let text = self.text.as_deref()?;
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;

        let name = match name.split_once('@') {
            Some((name, addressee)) => {
                let ours = bot_username.is_some_and(|u| u.eq_ignore_ascii_case(addressee));
                if !ours {
                    return None;
                }
                name
            }
            None => name,
        };

        if name.is_empty() { None } else { Some(name) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> Message {
        Message { chat: Chat { id: 1 }, text: Some(text.to_string()), location: None }
    }

    #[test]
    fn command_names() {
        assert_eq!(message("/start").command(Some("RideBot")), Some("start"));
        assert_eq!(message("/forecast@RideBot").command(Some("RideBot")), Some("forecast"));
        assert_eq!(message("/checkride now please").command(None), Some("checkride"));
        assert_eq!(message("hello").command(None), None);
        assert_eq!(message("/").command(None), None);
    }

    #[test]
    fn commands_for_other_bots_are_ignored() {
        assert_eq!(message("/forecast@OtherBot").command(Some("RideBot")), None);
        assert_eq!(message("/forecast@ridebot").command(Some("RideBot")), Some("forecast"));
        // own name unknown, nothing addressed by name can be ours
        assert_eq!(message("/forecast@RideBot").command(None), None);
        assert_eq!(message("/forecast").command(None), Some("forecast"));
    }

    #[test]
    fn bot_identity_document() {
        let json = r#"{"ok": true, "result": {"id": 99, "is_bot": true, "first_name": "Ride", "username": "RideBot"}}"#;
        let response: ApiResponse<User> = serde_json::from_str(json).unwrap();

        assert_eq!(response.result.unwrap().username.as_deref(), Some("RideBot"));
    }

    #[test]
    fn updates_document() {
        let json = r#"{
            "ok": true,
            "result": [
                {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 5, "type": "private"}, "text": "/start"}},
                {"update_id": 11, "message": {"message_id": 2, "chat": {"id": 5, "type": "private"},
                    "location": {"latitude": 55.75, "longitude": 37.61}}},
                {"update_id": 12, "edited_message": {"message_id": 1}}
            ]
        }"#;

        let response: ApiResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        let updates = response.result.unwrap();

        assert!(response.ok);
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].message.as_ref().unwrap().command(None), Some("start"));
        assert_eq!(
            updates[1].message.as_ref().unwrap().location,
            Some(Location { latitude: 55.75, longitude: 37.61 })
        );
        assert!(updates[2].message.is_none());
    }
}
