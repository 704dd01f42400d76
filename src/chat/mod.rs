//! Conversation store and input composer.

pub mod attachment;
pub mod composer;
pub mod conversation;

pub use attachment::{Attachment, AttachmentError};
pub use composer::Composer;
pub use conversation::{Conversation, Message, Sender};
