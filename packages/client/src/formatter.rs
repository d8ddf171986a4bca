//! Message formatting utilities for client display.

use irori_server::infrastructure::dto::http::OnlineUserDto;
use irori_shared::time::epoch_millis_to_jst_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the online-users panel from a presence snapshot
    ///
    /// # Arguments
    ///
    /// * `users` - The snapshot entries
    /// * `current_username` - The local username (marked as "me"; with
    ///   duplicate usernames every matching entry gets the mark)
    pub fn format_roster(users: &[OnlineUserDto], current_username: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Online users:\n");

        if users.is_empty() {
            output.push_str("(Nobody online)\n");
        } else {
            for user in users {
                let is_me = user.username == current_username;
                let me_suffix = if is_me { " (me)" } else { "" };
                output.push_str(&format!("{}{}\n", user.username, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a chat message received from another participant
    pub fn format_chat_message(sender: &str, text: &str, sent_at: i64) -> String {
        let timestamp_str = epoch_millis_to_jst_rfc3339(sent_at);
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            sender, text, timestamp_str
        )
    }

    /// Format the confirmation line shown after a local send
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        let timestamp_str = epoch_millis_to_jst_rfc3339(sent_at);
        format!("sent at {}\n", timestamp_str)
    }

    /// Format the notice shown once registration is confirmed
    pub fn format_identified(username: &str) -> String {
        format!(
            "\nYou are now chatting as '{}'. Type messages and press Enter to send.\n",
            username
        )
    }

    /// Format the notice shown when the connection is lost
    pub fn format_disconnected() -> String {
        "\nConnection lost. The chat log and online-users panel show the last known state.\n"
            .to_string()
    }
}
