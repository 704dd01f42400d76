//! Saving a conversation as a standalone HTML page.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::chat::{Conversation, Sender};

use super::markup::{escape_html, to_html};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create transcript directory `{path}`: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write transcript `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const STYLE: &str = "body{font-family:sans-serif;max-width:760px;margin:2em auto;background:#f5f7fa}\
.msg{padding:.6em 1em;margin:.5em 0;border-radius:12px;max-width:80%}\
.user{background:#00a1e0;color:#fff;margin-left:auto}\
.assistant{background:#fff;border:1px solid #dde3ea}\
.image{font-style:italic;opacity:.8}\
pre{background:#1e1e1e;color:#ddd;padding:.6em;border-radius:6px;overflow-x:auto}";

/// The whole conversation as one HTML document.
///
/// Message bodies go through [`to_html`]; the title and file names are
/// escaped as well.
pub fn render_document(conversation: &Conversation, title: &str) -> String {
    let title = escape_html(title);
    let mut body = String::new();

    for message in conversation.messages() {
        let class = match message.sender {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        };
        body.push_str(&format!("<div class=\"msg {class}\">"));
        if let Some(image) = &message.image {
            body.push_str(&format!(
                "<div class=\"image\">[{} {}]</div>",
                escape_html(&image.file_name),
                escape_html(&image.size_label())
            ));
        }
        if let Some(text) = &message.text {
            body.push_str(&to_html(text));
        }
        body.push_str("</div>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n"
    )
}

/// File name for a transcript saved at `at`.
pub fn transcript_file_name(at: DateTime<Local>) -> String {
    format!("transcript-{}.html", at.format("%Y%m%d-%H%M%S"))
}

/// Write the conversation into `dir` and return the file path.
pub fn export_html(
    conversation: &Conversation,
    title: &str,
    dir: &Path,
    at: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(transcript_file_name(at));
    std::fs::write(&path, render_document(conversation, title)).map_err(|source| {
        ExportError::Write {
            path: path.clone(),
            source,
        }
    })?;

    log::info!("transcript: saved {} messages to {}", conversation.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Attachment, Message};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn sample() -> Conversation {
        let mut c = Conversation::new(Some("สวัสดีครับ"));
        c.push(Message::user(
            "what is <this>?",
            Some(Attachment::from_bytes("io<1>.png", vec![1; 10]).unwrap()),
        ));
        c.push(Message::assistant("It is **an I/O module**"));
        c
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn document_escapes_user_content() {
        let html = render_document(&sample(), "PLCnext <AI>");

        assert!(html.contains("<title>PLCnext &lt;AI&gt;</title>"));
        assert!(html.contains("what is &lt;this&gt;?"));
        assert!(html.contains("[io&lt;1&gt;.png 10 B]"));
        assert!(html.contains("<strong>an I/O module</strong>"));
        assert!(!html.contains("<this>"));
    }

    #[test]
    fn one_div_per_message() {
        let html = render_document(&sample(), "t");
        assert_eq!(html.matches("<div class=\"msg ").count(), 3);
        assert_eq!(html.matches("msg user").count(), 1);
    }

    #[test]
    fn file_name_uses_timestamp() {
        assert_eq!(transcript_file_name(at()), "transcript-20240305-140709.html");
    }

    #[test]
    fn export_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("transcripts");

        let path = export_html(&sample(), "t", &target, at()).unwrap();

        assert_eq!(path, target.join("transcript-20240305-140709.html"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn export_into_a_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = export_html(&sample(), "t", &blocker, at()).unwrap_err();
        assert!(matches!(err, ExportError::CreateDir { .. }));
    }
}
