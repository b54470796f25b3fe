// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use textwrap::wrap_algorithms::wrap_first_fit;
use textwrap::{Options, WordSeparator, WordSplitter};

use crate::catalog::{Catalog, Entry, Msgstr};

/// Render `catalog` as PO text.
///
/// With a `wrap_width` of `0`, every string is written on a single
/// line, except that strings with embedded newlines are split after
/// each newline.
pub fn write_string(catalog: &Catalog, wrap_width: usize) -> String {
    let mut blocks = Vec::new();
    if let Some(header) = &catalog.header {
        blocks.push(entry_lines(header, wrap_width));
    }
    for entry in &catalog.entries {
        blocks.push(entry_lines(entry, wrap_width));
    }
    if !catalog.trailing_comments.is_empty() {
        blocks.push(catalog.trailing_comments.clone());
    }

    let newline = catalog.line_ending.as_str();
    let mut output = blocks
        .iter()
        .map(|lines| lines.join(newline))
        .collect::<Vec<_>>()
        .join(&newline.repeat(2));
    if !output.is_empty() {
        output.push_str(newline);
    }
    output
}

fn entry_lines(entry: &Entry, wrap_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for comment in &entry.translator_comments {
        lines.push(comment_line("#", comment));
    }
    for comment in &entry.other_comments {
        lines.push(format!("#{comment}"));
    }
    for comment in &entry.extracted_comments {
        lines.push(comment_line("#.", comment));
    }
    if !entry.references.is_empty() {
        let references = entry
            .references
            .iter()
            .map(|reference| reference.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if wrap_width == 0 {
            lines.push(format!("#: {references}"));
        } else {
            // References never contain spaces, so wrapping at spaces
            // keeps each of them intact.
            let options = Options::new(wrap_width.saturating_sub(3).max(1))
                .break_words(false)
                .word_splitter(WordSplitter::NoHyphenation);
            for line in textwrap::wrap(&references, options) {
                lines.push(format!("#: {line}"));
            }
        }
    }
    if !entry.flags.is_empty() {
        lines.push(format!("#, {}", entry.flags.join(", ")));
    }

    let (previous_prefix, prefix) = if entry.obsolete {
        ("#~| ", "#~ ")
    } else {
        ("#| ", "")
    };
    let previous = &entry.previous;
    if let Some(msgctxt) = &previous.msgctxt {
        push_field(&mut lines, previous_prefix, "msgctxt", msgctxt, wrap_width);
    }
    if let Some(msgid) = &previous.msgid {
        push_field(&mut lines, previous_prefix, "msgid", msgid, wrap_width);
    }
    if let Some(msgid_plural) = &previous.msgid_plural {
        push_field(&mut lines, previous_prefix, "msgid_plural", msgid_plural, wrap_width);
    }

    if let Some(msgctxt) = &entry.msgctxt {
        push_field(&mut lines, prefix, "msgctxt", msgctxt, wrap_width);
    }
    push_field(&mut lines, prefix, "msgid", &entry.msgid, wrap_width);
    if let Some(msgid_plural) = &entry.msgid_plural {
        push_field(&mut lines, prefix, "msgid_plural", msgid_plural, wrap_width);
    }
    match &entry.msgstr {
        Msgstr::Singular(msgstr) => push_field(&mut lines, prefix, "msgstr", msgstr, wrap_width),
        Msgstr::Plural(forms) => {
            for (index, msgstr) in forms {
                let keyword = format!("msgstr[{index}]");
                push_field(&mut lines, prefix, &keyword, msgstr, wrap_width);
            }
        }
    }

    lines
}

fn comment_line(marker: &str, comment: &str) -> String {
    if comment.is_empty() {
        String::from(marker)
    } else {
        format!("{marker} {comment}")
    }
}

/// Push `keyword "value"`, splitting the value over several lines
/// when it has embedded newlines or does not fit into `wrap_width`.
fn push_field(
    lines: &mut Vec<String>,
    prefix: &str,
    keyword: &str,
    value: &str,
    wrap_width: usize,
) {
    let chunk_width = wrap_width
        .saturating_sub(prefix.chars().count() + 2)
        .max(1);
    let mut chunks = Vec::new();
    for segment in value.split_inclusive('\n') {
        let escaped = escape(segment);
        if wrap_width == 0 {
            chunks.push(escaped);
        } else {
            chunks.extend(break_after_spaces(&escaped, chunk_width));
        }
    }

    let first = chunks.first().map(String::as_str).unwrap_or_default();
    let single = format!("{prefix}{keyword} \"{first}\"");
    if chunks.len() <= 1 && (wrap_width == 0 || single.chars().count() <= wrap_width) {
        lines.push(single);
        return;
    }

    lines.push(format!("{prefix}{keyword} \"\""));
    for chunk in chunks {
        lines.push(format!("{prefix}\"{chunk}\""));
    }
}

/// Break `text` into pieces of at most `width` columns.
///
/// Breaks only happen after spaces, which stay on the earlier piece,
/// so concatenating the pieces gives back `text`. A single word wider
/// than `width` is not broken.
fn break_after_spaces(text: &str, width: usize) -> Vec<String> {
    let words = WordSeparator::AsciiSpace.find_words(text).collect::<Vec<_>>();
    wrap_first_fit(&words, &[width as f64])
        .into_iter()
        .map(|line| {
            line.iter()
                .flat_map(|word| [word.word, word.whitespace])
                .collect::<String>()
        })
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\x07' => escaped.push_str("\\a"),
            '\x08' => escaped.push_str("\\b"),
            '\x0C' => escaped.push_str("\\f"),
            '\x0B' => escaped.push_str("\\v"),
            c if c.is_ascii_control() => escaped.push_str(&format!("\\{:03o}", u32::from(c))),
            _ => escaped.push(c),
        }
    }
    escaped
}
