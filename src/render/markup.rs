//! Message text formatting.
//!
//! Message text is treated as plain text with exactly three extras:
//! fenced code blocks, line breaks and `**bold**` spans.  [`parse`] turns it
//! into [`Block`]s for the egui renderer, which draws every span literally.
//! [`to_html`] produces the same structure as HTML for transcript export,
//! escaping the text first and only then adding the whitelisted tags.

use std::sync::OnceLock;

use regex::Regex;

/// A run of prose text, bold or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Prose, one entry per line.
    Prose(Vec<Vec<Span>>),
    /// A fenced code block, shown verbatim with a copy button.
    Code { lang: Option<String>, code: String },
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:([^\n`]*)\n)?(.*?)```").expect("fence pattern is valid"))
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"))
}

/// Split message text into prose and code blocks.
///
/// A language tag is only read from a fence that is followed by a line
/// break; a one-line fence is all code.  An opening fence with no closing
/// fence turns the rest of the text into a code block.
pub fn parse(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut rest_start = 0;

    for caps in fence_re().captures_iter(text) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let lang = caps.get(1).map_or("", |m| m.as_str());
        push_prose(&mut blocks, &text[rest_start..whole.start()]);
        blocks.push(code_block(lang, code.as_str()));
        rest_start = whole.end();
    }

    let tail = &text[rest_start..];
    match tail.find("```") {
        Some(open) => {
            log::debug!("markup: unterminated code fence, rendering to end of message");
            push_prose(&mut blocks, &tail[..open]);
            let body = &tail[open + 3..];
            let (lang, code) = body.split_once('\n').unwrap_or(("", body));
            blocks.push(code_block(lang, code));
        }
        None => push_prose(&mut blocks, tail),
    }

    blocks
}

fn code_block(lang: &str, code: &str) -> Block {
    let lang = lang.trim();
    Block::Code {
        lang: (!lang.is_empty()).then(|| lang.to_string()),
        code: code.trim_end_matches('\n').to_string(),
    }
}

fn push_prose(blocks: &mut Vec<Block>, text: &str) {
    let text = text.trim_matches('\n');
    if text.trim().is_empty() {
        return;
    }
    let lines = text.split('\n').map(spans).collect();
    blocks.push(Block::Prose(lines));
}

/// Split one line into plain and bold spans.
pub fn spans(line: &str) -> Vec<Span> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in bold_re().captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Span {
                text: line[last..whole.start()].to_string(),
                bold: false,
            });
        }
        out.push(Span {
            text: inner.as_str().to_string(),
            bold: true,
        });
        last = whole.end();
    }

    if last < line.len() {
        out.push(Span {
            text: line[last..].to_string(),
            bold: false,
        });
    }
    out
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render message text as an HTML fragment.
///
/// The only tags ever produced are `<br />`, `<strong>`, `<pre>` and
/// `<code>`; everything from the message itself is escaped.
///
/// ```rust
/// use panya_chat::render::markup::to_html;
///
/// assert_eq!(
///     to_html("**Hi** <b>there</b>"),
///     "<strong>Hi</strong> &lt;b&gt;there&lt;/b&gt;"
/// );
/// ```
pub fn to_html(text: &str) -> String {
    let mut html = String::new();
    for block in parse(text) {
        match block {
            Block::Prose(lines) => {
                let rendered: Vec<String> = lines
                    .iter()
                    .map(|line| {
                        line.iter()
                            .map(|span| {
                                let text = escape_html(&span.text);
                                if span.bold {
                                    format!("<strong>{text}</strong>")
                                } else {
                                    text
                                }
                            })
                            .collect()
                    })
                    .collect();
                html.push_str(&rendered.join("<br />"));
            }
            Block::Code { code, .. } => {
                html.push_str("<pre><code>");
                html.push_str(&escape_html(&code));
                html.push_str("</code></pre>");
            }
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span {
            text: text.into(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Span {
        Span {
            text: text.into(),
            bold: true,
        }
    }

    #[test]
    fn plain_text_is_one_prose_block() {
        assert_eq!(parse("hello"), vec![Block::Prose(vec![vec![plain("hello")]])]);
    }

    #[test]
    fn bold_spans_are_split_out() {
        assert_eq!(
            spans("use **AXC F 2152** here"),
            vec![plain("use "), bold("AXC F 2152"), plain(" here")]
        );
    }

    #[test]
    fn lone_asterisks_stay_literal() {
        assert_eq!(spans("2 ** 3 = 8"), vec![plain("2 ** 3 = 8")]);
    }

    #[test]
    fn newlines_become_lines() {
        let blocks = parse("one\ntwo");
        assert_eq!(
            blocks,
            vec![Block::Prose(vec![vec![plain("one")], vec![plain("two")]])]
        );
    }

    #[test]
    fn fenced_code_is_extracted_with_language() {
        let blocks = parse("Try this:\n```python\nprint('hi')\n```\nDone.");
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[1],
            Block::Code {
                lang: Some("python".into()),
                code: "print('hi')".into()
            }
        );
        assert_eq!(blocks[2], Block::Prose(vec![vec![plain("Done.")]]));
    }

    #[test]
    fn bold_markers_inside_code_are_literal() {
        let blocks = parse("```\na **b** c\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                lang: None,
                code: "a **b** c".into()
            }]
        );
    }

    #[test]
    fn one_line_fence_is_all_code() {
        assert_eq!(
            parse("Run ```ls -la``` now"),
            vec![
                Block::Prose(vec![vec![plain("Run ")]]),
                Block::Code {
                    lang: None,
                    code: "ls -la".into()
                },
                Block::Prose(vec![vec![plain(" now")]]),
            ]
        );
    }

    #[test]
    fn fence_without_language_keeps_first_line_as_code() {
        assert_eq!(
            parse("```\nmake install\n```"),
            vec![Block::Code {
                lang: None,
                code: "make install".into()
            }]
        );
    }

    #[test]
    fn one_line_fence_before_tagged_fence() {
        let blocks = parse("```a``` then\n```sh\nb\n```");
        assert_eq!(
            blocks,
            vec![
                Block::Code {
                    lang: None,
                    code: "a".into()
                },
                Block::Prose(vec![vec![plain(" then")]]),
                Block::Code {
                    lang: Some("sh".into()),
                    code: "b".into()
                },
            ]
        );
    }

    #[test]
    fn unterminated_one_line_fence_is_code() {
        assert_eq!(
            parse("```ls -la"),
            vec![Block::Code {
                lang: None,
                code: "ls -la".into()
            }]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let blocks = parse("intro\n```st\nx := 1;\ny := 2;");
        assert_eq!(
            blocks,
            vec![
                Block::Prose(vec![vec![plain("intro")]]),
                Block::Code {
                    lang: Some("st".into()),
                    code: "x := 1;\ny := 2;".into()
                }
            ]
        );
    }

    #[test]
    fn escape_covers_all_five_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn script_tags_are_escaped() {
        let html = to_html("<script>alert(1)</script>");
        assert_eq!(html, "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert!(!html.contains('<'));
    }

    #[test]
    fn bold_cannot_smuggle_markup() {
        let html = to_html("**<img src=x onerror=alert(1)>**");
        assert_eq!(
            html,
            "<strong>&lt;img src=x onerror=alert(1)&gt;</strong>"
        );
    }

    #[test]
    fn line_breaks_become_br() {
        assert_eq!(to_html("a\nb"), "a<br />b");
    }

    #[test]
    fn code_blocks_are_escaped_inside_pre() {
        assert_eq!(
            to_html("```html\n<div>\n```"),
            "<pre><code>&lt;div&gt;</code></pre>"
        );
    }

    #[test]
    fn only_whitelisted_tags_appear() {
        let html = to_html("**x** <i>y</i>\n```\n<z>\n```\n<p>");
        let tags: Vec<&str> = html
            .match_indices('<')
            .map(|(i, _)| {
                let end = html[i..].find('>').map(|e| i + e + 1).unwrap_or(html.len());
                &html[i..end]
            })
            .collect();
        for tag in tags {
            assert!(
                ["<strong>", "</strong>", "<br />", "<pre>", "</pre>", "<code>", "</code>"]
                    .contains(&tag),
                "unexpected tag {tag}"
            );
        }
    }
}
