//! Utility functions.
//!
//! Collection of helper functions used across the bot.

pub mod args;
pub mod reply;

pub use args::{ArgError, CommandArgs};
pub use reply::{reply_html, reply_html_chunked};

/// Escape text for Telegram HTML.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// HTML mention of a user by ID.
pub fn user_link(user_id: u64, name: &str) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        user_id,
        html_escape(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b>&\"x\""), "&lt;b&gt;&amp;&quot;x&quot;");
    }

    #[test]
    fn test_user_link() {
        assert_eq!(
            user_link(7, "A<B"),
            "<a href=\"tg://user?id=7\">A&lt;B</a>"
        );
    }
}
