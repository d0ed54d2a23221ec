//! Canonical formatting.
//!
//! The document is cut into groups: an assignment with the comment lines
//! directly above it, a comment block that is not attached to an assignment
//! (a "section"), an unknown line, or a blank line. Repeated keys keep only
//! their last assignment and inherit the comments of the dropped ones.

use std::collections::HashMap;
use tracing::debug;
use crate::codec;
use crate::document::Document;
use crate::lexer::normalize_newlines;
use crate::types::{Assignment, Line, RawLine};

enum Group<'d, 'a> {
    Entry {
        comments: Vec<&'d RawLine<'a>>,
        assignment: &'d Assignment<'a>,
    },
    Section(Vec<&'d RawLine<'a>>),
    Unknown(&'d RawLine<'a>),
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Plain,
    Commented,
    Section,
}

/// Formats `text` into canonical form. `format(format(t)) == format(t)`.
pub fn format(text: &str) -> String {
    let normalized = normalize_newlines(text);
    let doc = Document::parse(&normalized);
    let groups = group(&doc);

    let mut last: HashMap<&str, usize> = HashMap::new();
    for (i, g) in groups.iter().enumerate() {
        if let Group::Entry { assignment, .. } = g {
            last.insert(assignment.key, i);
        }
    }

    let mut carried: HashMap<&str, Vec<&RawLine<'_>>> = HashMap::new();
    let mut dropped = 0usize;
    let mut out = String::with_capacity(normalized.len());
    let mut prev: Option<Kind> = None;
    let mut pending_blank = false;

    for (i, g) in groups.iter().enumerate() {
        let (kind, block) = match g {
            Group::Blank => {
                pending_blank = prev.is_some();
                continue;
            }
            Group::Entry { comments, assignment } if last.get(assignment.key) != Some(&i) => {
                carried.entry(assignment.key).or_default().extend(comments.iter().copied());
                dropped += 1;
                continue;
            }
            Group::Entry { comments, assignment } => {
                let mut all = carried.remove(assignment.key).unwrap_or_default();
                all.extend(comments.iter().copied());
                let kind = if all.is_empty() { Kind::Plain } else { Kind::Commented };
                let mut block: Vec<String> = all.iter().map(|c| comment_text(c)).collect();
                block.push(render(assignment));
                (kind, block)
            }
            Group::Section(comments) => (
                Kind::Section,
                comments.iter().map(|c| comment_text(c)).collect(),
            ),
            Group::Unknown(raw) => {
                let text = unknown_text(raw);
                if text.trim_matches([' ', '\t']).is_empty() {
                    pending_blank = prev.is_some();
                    continue;
                }
                (Kind::Plain, vec![text])
            }
        };

        if let Some(p) = prev {
            if pending_blank || p == Kind::Section || kind != Kind::Plain {
                out.push('\n');
            }
        }
        for line in block {
            out.push_str(&line);
            out.push('\n');
        }
        prev = Some(kind);
        pending_blank = false;
    }

    debug!(groups = groups.len(), dropped, "formatted document");
    out
}

fn group<'d, 'a>(doc: &'d Document<'a>) -> Vec<Group<'d, 'a>> {
    let mut groups = Vec::with_capacity(doc.lines().len());
    let mut pending: Vec<&'d RawLine<'a>> = Vec::new();

    for line in doc.lines() {
        match line {
            Line::Comment(c) => pending.push(c),
            Line::Assignment(assignment) => groups.push(Group::Entry {
                comments: std::mem::take(&mut pending),
                assignment,
            }),
            Line::Blank(_) => {
                flush_section(&mut groups, &mut pending);
                groups.push(Group::Blank);
            }
            Line::Unknown(raw) => {
                flush_section(&mut groups, &mut pending);
                groups.push(Group::Unknown(raw));
            }
        }
    }
    flush_section(&mut groups, &mut pending);
    groups
}

fn flush_section<'d, 'a>(groups: &mut Vec<Group<'d, 'a>>, pending: &mut Vec<&'d RawLine<'a>>) {
    if !pending.is_empty() {
        groups.push(Group::Section(std::mem::take(pending)));
    }
}

fn comment_text(comment: &RawLine<'_>) -> String {
    comment.text().trim_start_matches('\u{FEFF}').trim().to_owned()
}

/// Unknown text with each physical line's trailing `\r` removed, since a `\r`
/// before the `\n` written after it reads back as a CRLF terminator.
fn unknown_text(raw: &RawLine<'_>) -> String {
    raw.text()
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(assignment: &Assignment<'_>) -> String {
    let (encoded, _) = codec::encode(&assignment.value);
    let export = if assignment.is_exported { "export " } else { "" };
    match assignment.trailing_comment() {
        Some(comment) => format!("{}{}={} {}", export, assignment.key, encoded, comment),
        None => format!("{}{}={}", export, assignment.key, encoded),
    }
}
