//! The conversation store: an append-only list of messages.

use super::attachment::Attachment;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// One chat bubble.  Never modified after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub text: Option<String>,
    pub image: Option<Attachment>,
}

impl Message {
    /// A user message.  Blank text is stored as `None`.
    pub fn user(text: &str, image: Option<Attachment>) -> Self {
        Self {
            sender: Sender::User,
            text: (!text.trim().is_empty()).then(|| text.to_string()),
            image,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Messages in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation, optionally opened by an assistant greeting.
    pub fn new(greeting: Option<&str>) -> Self {
        let messages = greeting
            .filter(|g| !g.trim().is_empty())
            .map(|g| vec![Message::assistant(g)])
            .unwrap_or_default();
        Self { messages }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_opens_the_conversation() {
        let c = Conversation::new(Some("สวัสดีครับ"));
        assert_eq!(c.len(), 1);
        assert_eq!(c.messages()[0].sender, Sender::Assistant);
        assert_eq!(c.messages()[0].text.as_deref(), Some("สวัสดีครับ"));
    }

    #[test]
    fn blank_greeting_is_skipped() {
        assert!(Conversation::new(Some("  ")).is_empty());
        assert!(Conversation::new(None).is_empty());
    }

    #[test]
    fn push_preserves_order() {
        let mut c = Conversation::new(None);
        c.push(Message::user("first", None));
        c.push(Message::assistant("second"));
        c.push(Message::user("third", None));

        let texts: Vec<_> = c.messages().iter().filter_map(|m| m.text.as_deref()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn blank_user_text_is_none() {
        let image = Attachment::from_bytes("a.png", vec![1]).unwrap();
        let m = Message::user("   ", Some(image));
        assert!(m.text.is_none());
        assert!(m.image.is_some());
        assert!(m.is_user());
    }
}
