//! Panya Chat: a desktop chat client for the PLCnext AI assistant.
//!
//! Text questions, image questions and voice dictation go to a small HTTP
//! backend; the answers are shown as chat bubbles.

pub mod app;
pub mod audio;
pub mod chat;
pub mod config;
pub mod recording;
pub mod render;
pub mod session;
pub mod transport;
