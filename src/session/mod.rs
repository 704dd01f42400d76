//! Session wiring between the window and the backend.
//!
//! ```text
//! PanyaApp::update()  (egui frame loop, owns ChatSession)
//!        │  ChatRequest (mpsc)
//!        ▼
//! RequestRunner::run()  ← async tokio task, one child task per request
//!        │  RunnerEvent (mpsc, drained with try_recv each frame)
//!        ▼
//! ChatSession::receive_answer / receive_transcript
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use panya_chat::config::AppConfig;
//! use panya_chat::session::{ChatSession, RequestRunner};
//! use panya_chat::transport::HttpTransport;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let runner = RequestRunner::new(Arc::new(HttpTransport::from_config(&config.server)));
//!     let (request_tx, request_rx) = mpsc::channel(8);
//!     let (event_tx, mut event_rx) = mpsc::channel(8);
//!     tokio::spawn(runner.run(request_rx, event_tx));
//!
//!     let mut session = ChatSession::new(&config);
//!     session.composer_mut().draft_mut().push_str("What is PLCnext?");
//!     if let Some(request) = session.submit() {
//!         request_tx.send(request).await.unwrap();
//!     }
//!     println!("{:?}", event_rx.recv().await);
//! }
//! ```

pub mod runner;
pub mod state;

pub use runner::{RequestRunner, RunnerEvent};
pub use state::{ChatSession, Notice, NoticeKind, NOTICE_TTL};
