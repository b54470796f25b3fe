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

use std::str::Chars;

use crate::catalog::{Catalog, Entry, LineEnding, Msgstr, Reference};
use crate::error::ParseError;

/// The string field a continuation line appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    /// Index into the plural forms, or `0` for a singular `msgstr`.
    Msgstr(usize),
    PreviousMsgctxt,
    PreviousMsgid,
    PreviousMsgidPlural,
}

struct Parser {
    catalog: Catalog,
    entry: Entry,
    /// Raw comment lines of `entry`, kept in case no message follows.
    comments: Vec<String>,
    has_msgid: bool,
    has_msgstr: bool,
    field: Option<Field>,
    lineno: usize,
}

/// Parse the text of a PO file.
pub fn parse_str(text: &str) -> Result<Catalog, ParseError> {
    let mut parser = Parser {
        catalog: Catalog {
            line_ending: LineEnding::detect(text),
            ..Catalog::default()
        },
        entry: Entry::default(),
        comments: Vec::new(),
        has_msgid: false,
        has_msgstr: false,
        field: None,
        lineno: 0,
    };
    for line in text.lines() {
        parser.lineno += 1;
        parser.parse_line(line)?;
    }
    parser.finish()
}

impl Parser {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            line: self.lineno,
            message: message.into(),
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<(), ParseError> {
        if line.trim().is_empty() {
            if self.has_msgid {
                self.finish_entry()?;
            }
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("#~") {
            if self.has_msgstr && !self.entry.obsolete {
                self.finish_entry()?;
            }
            self.entry.obsolete = true;
            return match rest.strip_prefix('|') {
                Some(previous) => self.parse_previous(previous),
                None => self.parse_keyword(rest.trim()),
            };
        }

        if let Some(rest) = line.strip_prefix('#') {
            if self.has_msgstr {
                self.finish_entry()?;
            }
            return self.parse_comment(line, rest);
        }

        if self.has_msgstr && self.entry.obsolete {
            self.finish_entry()?;
        }
        self.parse_keyword(line.trim())
    }

    fn parse_comment(&mut self, line: &str, rest: &str) -> Result<(), ParseError> {
        match rest.chars().next() {
            Some('.') => {
                let comment = strip_space(&rest[1..]);
                self.entry.extracted_comments.push(String::from(comment));
            }
            Some(':') => {
                let references = rest[1..].split_whitespace().map(Reference::new);
                self.entry.references.extend(references);
            }
            Some(',') => {
                let flags = rest[1..]
                    .split(',')
                    .map(str::trim)
                    .filter(|flag| !flag.is_empty())
                    .map(String::from);
                self.entry.flags.extend(flags);
            }
            Some('|') => self.parse_previous(&rest[1..])?,
            None | Some(' ') => {
                let comment = strip_space(rest);
                self.entry.translator_comments.push(String::from(comment));
            }
            // Markers like `#@` or `#=` are written back verbatim.
            Some(_) => self.entry.other_comments.push(String::from(rest)),
        }
        self.comments.push(String::from(line));
        Ok(())
    }

    /// Parse the part of a `#|` line after the marker.
    fn parse_previous(&mut self, rest: &str) -> Result<(), ParseError> {
        let rest = rest.trim();
        if rest.starts_with('"') {
            return self.continue_field(rest);
        }

        let (field, value) = if let Some(value) = rest.strip_prefix("msgctxt") {
            (Field::PreviousMsgctxt, value)
        } else if let Some(value) = rest.strip_prefix("msgid_plural") {
            (Field::PreviousMsgidPlural, value)
        } else if let Some(value) = rest.strip_prefix("msgid") {
            (Field::PreviousMsgid, value)
        } else {
            return Err(self.error(format!("unexpected previous field {rest:?}")));
        };

        let value = self.parse_string(value)?;
        let previous = &mut self.entry.previous;
        match field {
            Field::PreviousMsgctxt => previous.msgctxt = Some(value),
            Field::PreviousMsgidPlural => previous.msgid_plural = Some(value),
            _ => previous.msgid = Some(value),
        }
        self.field = Some(field);
        Ok(())
    }

    fn parse_keyword(&mut self, line: &str) -> Result<(), ParseError> {
        if line.starts_with('"') {
            return self.continue_field(line);
        }

        if let Some(value) = line.strip_prefix("msgctxt") {
            self.start_entry()?;
            if self.entry.msgctxt.is_some() {
                return Err(self.error("duplicate msgctxt"));
            }
            self.entry.msgctxt = Some(self.parse_string(value)?);
            self.field = Some(Field::Msgctxt);
        } else if let Some(value) = line.strip_prefix("msgid_plural") {
            if !self.has_msgid || self.has_msgstr {
                return Err(self.error("msgid_plural must follow msgid"));
            }
            self.entry.msgid_plural = Some(self.parse_string(value)?);
            self.field = Some(Field::MsgidPlural);
        } else if let Some(value) = line.strip_prefix("msgid") {
            self.start_entry()?;
            self.entry.msgid = self.parse_string(value)?;
            self.has_msgid = true;
            self.field = Some(Field::Msgid);
        } else if let Some(rest) = line.strip_prefix("msgstr[") {
            let Some((index, value)) = rest.split_once(']') else {
                return Err(self.error("missing ] after msgstr index"));
            };
            let index = index
                .trim()
                .parse::<usize>()
                .map_err(|_| self.error(format!("invalid msgstr index {index:?}")))?;
            let value = self.parse_string(value)?;
            self.push_msgstr(Some(index), value)?;
        } else if let Some(value) = line.strip_prefix("msgstr") {
            let value = self.parse_string(value)?;
            self.push_msgstr(None, value)?;
        } else {
            return Err(self.error(format!("unexpected line {line:?}")));
        }
        Ok(())
    }

    /// Prepare for a `msgctxt` or `msgid` line.
    ///
    /// Entries need not be separated by blank lines, so a new keyword
    /// after a complete entry starts the next one.
    fn start_entry(&mut self) -> Result<(), ParseError> {
        if self.has_msgstr {
            let obsolete = self.entry.obsolete;
            self.finish_entry()?;
            self.entry.obsolete = obsolete;
        } else if self.has_msgid {
            return Err(self.error("missing msgstr"));
        }
        Ok(())
    }

    fn push_msgstr(&mut self, index: Option<usize>, value: String) -> Result<(), ParseError> {
        if !self.has_msgid {
            return Err(self.error("msgstr without msgid"));
        }
        let field = match index {
            None => {
                if self.has_msgstr {
                    return Err(self.error("duplicate msgstr"));
                }
                self.entry.msgstr = Msgstr::Singular(value);
                Field::Msgstr(0)
            }
            Some(index) => {
                if self.has_msgstr && matches!(self.entry.msgstr, Msgstr::Singular(_)) {
                    return Err(self.error("mixed msgstr and msgstr[N]"));
                }
                match &mut self.entry.msgstr {
                    Msgstr::Plural(forms) if self.has_msgstr => {
                        forms.push((index, value));
                        Field::Msgstr(forms.len() - 1)
                    }
                    msgstr => {
                        *msgstr = Msgstr::Plural(vec![(index, value)]);
                        Field::Msgstr(0)
                    }
                }
            }
        };
        self.field = Some(field);
        self.has_msgstr = true;
        Ok(())
    }

    /// Append a `"..."` continuation line to the current field.
    fn continue_field(&mut self, line: &str) -> Result<(), ParseError> {
        let value = self.parse_string(line)?;
        let target = match self.field {
            None => return Err(self.error("string without a keyword")),
            Some(Field::Msgctxt) => self.entry.msgctxt.as_mut(),
            Some(Field::Msgid) => Some(&mut self.entry.msgid),
            Some(Field::MsgidPlural) => self.entry.msgid_plural.as_mut(),
            Some(Field::Msgstr(index)) => match &mut self.entry.msgstr {
                Msgstr::Singular(msgstr) => Some(msgstr),
                Msgstr::Plural(forms) => forms.get_mut(index).map(|(_, msgstr)| msgstr),
            },
            Some(Field::PreviousMsgctxt) => self.entry.previous.msgctxt.as_mut(),
            Some(Field::PreviousMsgid) => self.entry.previous.msgid.as_mut(),
            Some(Field::PreviousMsgidPlural) => self.entry.previous.msgid_plural.as_mut(),
        };
        match target {
            Some(target) => {
                target.push_str(&value);
                Ok(())
            }
            None => Err(self.error("string without a keyword")),
        }
    }

    /// Parse a quoted string, `value` is the rest of the line after
    /// the keyword.
    fn parse_string(&self, value: &str) -> Result<String, ParseError> {
        let value = value.trim();
        let Some(quoted) = value.strip_prefix('"') else {
            return Err(self.error(format!("expected a quoted string, found {value:?}")));
        };

        let mut result = String::with_capacity(quoted.len());
        // Bytes from octal and hex escapes, which may spell out a
        // multi-byte character.
        let mut bytes = Vec::new();
        let mut chars = quoted.chars();
        loop {
            match chars.next() {
                None => return Err(self.error("unterminated string")),
                Some('\\') => {
                    if let Some(byte) = self.numeric_escape(&mut chars)? {
                        bytes.push(byte);
                        continue;
                    }
                    let c = match chars.next() {
                        None => return Err(self.error("unterminated string")),
                        Some(c) => unescape(c)
                            .ok_or_else(|| self.error(format!("unknown escape sequence \\{c}")))?,
                    };
                    self.push_bytes(&mut bytes, &mut result)?;
                    result.push(c);
                }
                Some(c) => {
                    self.push_bytes(&mut bytes, &mut result)?;
                    if c == '"' {
                        break;
                    }
                    result.push(c);
                }
            }
        }

        let rest = chars.as_str().trim();
        if !rest.is_empty() {
            return Err(self.error(format!("unexpected {rest:?} after string")));
        }
        Ok(result)
    }

    /// Parse the digits of an octal (`\101`) or hex (`\x41`) escape,
    /// `chars` starts right after the backslash.
    fn numeric_escape(&self, chars: &mut Chars<'_>) -> Result<Option<u8>, ParseError> {
        let value = match chars.clone().next() {
            Some('x') => {
                chars.next();
                take_digits(chars, 16, 2).ok_or_else(|| self.error("missing hex digits after \\x"))?
            }
            Some('0'..='7') => take_digits(chars, 8, 3).unwrap_or_default(),
            _ => return Ok(None),
        };
        u8::try_from(value)
            .map(Some)
            .map_err(|_| self.error(format!("escape value {value:#o} out of range")))
    }

    fn push_bytes(&self, bytes: &mut Vec<u8>, result: &mut String) -> Result<(), ParseError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let text = std::str::from_utf8(bytes.as_slice())
            .map_err(|_| self.error("escaped bytes are not valid UTF-8"))?;
        result.push_str(text);
        bytes.clear();
        Ok(())
    }

    fn finish_entry(&mut self) -> Result<(), ParseError> {
        if !self.has_msgstr {
            return Err(self.error("missing msgstr"));
        }
        let entry = std::mem::take(&mut self.entry);
        let first = self.catalog.header.is_none() && self.catalog.entries.is_empty();
        if first && entry.is_header() {
            self.catalog.header = Some(entry);
        } else {
            self.catalog.entries.push(entry);
        }
        self.comments.clear();
        self.has_msgid = false;
        self.has_msgstr = false;
        self.field = None;
        Ok(())
    }

    fn finish(mut self) -> Result<Catalog, ParseError> {
        if self.has_msgid {
            self.finish_entry()?;
        } else if self.entry != Entry::default() && self.comments.is_empty() {
            // Obsolete or previous fields without a message.
            return Err(self.error("incomplete entry at end of file"));
        }
        self.catalog.trailing_comments = self.comments;
        Ok(self.catalog)
    }
}

fn strip_space(comment: &str) -> &str {
    comment.strip_prefix(' ').unwrap_or(comment)
}

/// Consume up to `max` digits in `radix` from `chars`.
fn take_digits(chars: &mut Chars<'_>, radix: u32, max: usize) -> Option<u32> {
    let mut value = None;
    for _ in 0..max {
        let Some(digit) = chars.clone().next().and_then(|c| c.to_digit(radix)) else {
            break;
        };
        chars.next();
        value = Some(value.unwrap_or(0) * radix + digit);
    }
    value
}

fn unescape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'a' => Some('\x07'),
        'b' => Some('\x08'),
        'f' => Some('\x0C'),
        'v' => Some('\x0B'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Previous;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header_and_entries() {
        let catalog = parse_str(
            "# Game translation.\n\
             msgid \"\"\n\
             msgstr \"\"\n\
             \"Project-Id-Version: Game\\n\"\n\
             \"Language: de\\n\"\n\
             \n\
             #. Key: Menu_Title\n\
             #: /Game/UI/Menu.cpp:12\n\
             msgctxt \"Menu,Title\"\n\
             msgid \"Start\"\n\
             msgstr \"Starten\"\n",
        )
        .unwrap();

        let header = catalog.header.unwrap();
        assert_eq!(header.translator_comments, &["Game translation."]);
        assert_eq!(
            header.msgstr,
            Msgstr::Singular(String::from(
                "Project-Id-Version: Game\nLanguage: de\n"
            ))
        );
        assert_eq!(
            catalog.entries,
            vec![Entry {
                extracted_comments: vec![String::from("Key: Menu_Title")],
                references: vec![Reference::new("/Game/UI/Menu.cpp:12")],
                msgctxt: Some(String::from("Menu,Title")),
                msgid: String::from("Start"),
                msgstr: Msgstr::Singular(String::from("Starten")),
                ..Entry::default()
            }]
        );
        assert_eq!(catalog.line_ending, LineEnding::Lf);
    }

    #[test]
    fn test_parse_comments_and_flags() {
        let catalog = parse_str(
            "#  indented\n\
             #\n\
             #, fuzzy, c-format\n\
             #| msgid \"Old\"\n\
             #: a.cpp:1 b.cpp:2\n\
             #: c.cpp:3\n\
             msgid \"New\"\n\
             msgstr \"Neu\"\n",
        )
        .unwrap();

        assert_eq!(catalog.header, None);
        let entry = &catalog.entries[0];
        assert_eq!(entry.translator_comments, &[" indented", ""]);
        assert_eq!(entry.flags, &["fuzzy", "c-format"]);
        assert!(entry.is_fuzzy());
        assert_eq!(
            entry.previous,
            Previous {
                msgid: Some(String::from("Old")),
                ..Previous::default()
            }
        );
        assert_eq!(
            entry.references,
            vec![
                Reference::new("a.cpp:1"),
                Reference::new("b.cpp:2"),
                Reference::new("c.cpp:3"),
            ]
        );
    }

    #[test]
    fn test_parse_plural() {
        let catalog = parse_str(
            "msgid \"One file\"\n\
             msgid_plural \"%d files\"\n\
             msgstr[0] \"Eine Datei\"\n\
             msgstr[1] \"%d \"\n\
             \"Dateien\"\n",
        )
        .unwrap();

        let entry = &catalog.entries[0];
        assert_eq!(entry.msgid_plural.as_deref(), Some("%d files"));
        assert_eq!(
            entry.msgstr,
            Msgstr::Plural(vec![
                (0, String::from("Eine Datei")),
                (1, String::from("%d Dateien")),
            ])
        );
    }

    #[test]
    fn test_parse_escapes() {
        let catalog =
            parse_str("msgid \"a\\\"b\\\\c\\td\\n\"\nmsgstr \"\\x41\"\n").unwrap();
        let entry = &catalog.entries[0];
        assert_eq!(entry.msgid, "a\"b\\c\td\n");
        assert_eq!(entry.msgstr, Msgstr::Singular(String::from("A")));
    }

    #[test]
    fn test_parse_numeric_escapes() {
        let catalog = parse_str(
            "msgid \"\\101\\x41\\0\"\n\
             msgstr \"caf\\303\\251 \\xc3\\xa9\\1012\"\n",
        )
        .unwrap();
        let entry = &catalog.entries[0];
        assert_eq!(entry.msgid, "AA\0");
        // At most three octal digits belong to an escape.
        assert_eq!(entry.msgstr, Msgstr::Singular(String::from("café éA2")));
    }

    #[test]
    fn test_parse_comment_markers() {
        let catalog = parse_str(
            "#@ domain\n\
             #= note\n\
             #\tindented\n\
             # translator\n\
             msgid \"a\"\n\
             msgstr \"A\"\n",
        )
        .unwrap();
        let entry = &catalog.entries[0];
        assert_eq!(entry.translator_comments, &["translator"]);
        assert_eq!(entry.other_comments, &["@ domain", "= note", "\tindented"]);
    }

    #[test]
    fn test_parse_obsolete() {
        let catalog = parse_str(
            "msgid \"live\"\n\
             msgstr \"\"\n\
             \n\
             #~ msgctxt \"ctx\"\n\
             #~ msgid \"old\"\n\
             #~ msgstr \"\"\n\
             #~ \"alt\"\n\
             #~ msgid \"older\"\n\
             #~ msgstr \"x\"\n",
        )
        .unwrap();

        assert_eq!(catalog.count(), 3);
        assert!(!catalog.entries[0].obsolete);
        assert!(catalog.entries[1].obsolete);
        assert_eq!(catalog.entries[1].msgctxt.as_deref(), Some("ctx"));
        assert_eq!(
            catalog.entries[1].msgstr,
            Msgstr::Singular(String::from("alt"))
        );
        assert!(catalog.entries[2].obsolete);
        assert_eq!(catalog.entries[2].msgid, "older");
    }

    #[test]
    fn test_parse_without_blank_lines() {
        let catalog = parse_str(
            "msgid \"a\"\n\
             msgstr \"A\"\n\
             #: b.cpp:1\n\
             msgid \"b\"\n\
             msgstr \"B\"\n\
             msgid \"c\"\n\
             msgstr \"C\"\n",
        )
        .unwrap();
        assert_eq!(
            catalog
                .entries
                .iter()
                .map(|entry| entry.msgid.as_str())
                .collect::<Vec<_>>(),
            &["a", "b", "c"]
        );
        assert_eq!(catalog.entries[1].references, vec![Reference::new("b.cpp:1")]);
    }

    #[test]
    fn test_parse_crlf() {
        let catalog = parse_str("#: a.cpp:1\r\nmsgid \"a\"\r\nmsgstr \"A\"\r\n").unwrap();
        assert_eq!(catalog.line_ending, LineEnding::CrLf);
        assert_eq!(catalog.entries[0].msgstr, Msgstr::Singular(String::from("A")));
    }

    #[test]
    fn test_parse_trailing_comments() {
        let catalog = parse_str("msgid \"a\"\nmsgstr \"A\"\n\n# end of file\n").unwrap();
        assert_eq!(catalog.count(), 1);
        assert_eq!(catalog.trailing_comments, &["# end of file"]);
    }

    #[test]
    fn test_parse_empty() {
        let catalog = parse_str("").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.header, None);
    }

    #[track_caller]
    fn assert_syntax_error(text: &str, expected_line: usize) {
        match parse_str(text) {
            Err(ParseError::Syntax { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("Expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_syntax_error("msgid \"a\"\n\nmsgstr \"A\"\n", 2);
        assert_syntax_error("msgid \"a\nmsgstr \"A\"\n", 1);
        assert_syntax_error("msgid a\n", 1);
        assert_syntax_error("msgid \"a\"\nmsgstr[x] \"A\"\n", 2);
        assert_syntax_error("msgstr \"A\"\n", 1);
        assert_syntax_error("\"A\"\n", 1);
        assert_syntax_error("msgid \"a\"\nmsgstr \"A\"\nmsgstr \"B\"\n", 3);
        assert_syntax_error("msgid \"a\"\nmsgid \"b\"\n", 2);
        assert_syntax_error("hello\n", 1);
        assert_syntax_error("msgid \"a\" junk\n", 1);
        assert_syntax_error("msgid \"a\"\nmsgstr \"\\q\"\n", 2);
        assert_syntax_error("msgid \"\\xzz\"\n", 1);
        assert_syntax_error("msgid \"\\777\"\n", 1);
        assert_syntax_error("msgid \"\\377\"\n", 1);
    }
}
