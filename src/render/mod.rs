//! Message formatting, copy feedback and transcript export.
//!
//! Nothing here touches egui; the widgets in `app` consume these types.

pub mod copy;
pub mod markup;
pub mod transcript;

pub use copy::{BlockKey, CopyFlags, COPY_FEEDBACK};
pub use markup::{escape_html, parse, to_html, Block, Span};
pub use transcript::{export_html, render_document, ExportError};
