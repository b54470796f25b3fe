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

//! In-memory representation of a PO catalog.

use crate::sort;

/// Line ending used when writing a catalog back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect the line ending from the first line break in `text`.
    pub fn detect(text: &str) -> LineEnding {
        match text.find('\n') {
            Some(idx) if text[..idx].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A source reference such as `Source/Game/Menu.cpp:42`.
///
/// The token is kept verbatim so that it is written back exactly as
/// it was read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference(String);

impl Reference {
    pub fn new(token: impl Into<String>) -> Reference {
        Reference(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path part of the reference.
    pub fn path(&self) -> &str {
        self.split().0
    }

    /// The line number, if the reference has one.
    pub fn line(&self) -> Option<u64> {
        self.split().1
    }

    // Only split on the last colon if a number follows it, so that
    // paths like `C:\Game\Menu.cpp` stay intact.
    fn split(&self) -> (&str, Option<u64>) {
        match self.0.rsplit_once(':') {
            Some((path, lineno))
                if !lineno.is_empty() && lineno.bytes().all(|b| b.is_ascii_digit()) =>
            {
                (path, lineno.parse().ok())
            }
            _ => (&self.0, None),
        }
    }
}

/// The translation of an entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Msgstr {
    /// A plain `msgstr`.
    Singular(String),
    /// The `msgstr[N]` forms, in file order.
    Plural(Vec<(usize, String)>),
}

impl Default for Msgstr {
    fn default() -> Self {
        Msgstr::Singular(String::new())
    }
}

/// The `#|` fields recording the previous untranslated string of a
/// fuzzy entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Previous {
    pub msgctxt: Option<String>,
    pub msgid: Option<String>,
    pub msgid_plural: Option<String>,
}

impl Previous {
    pub fn is_empty(&self) -> bool {
        self.msgctxt.is_none() && self.msgid.is_none() && self.msgid_plural.is_none()
    }
}

/// One translatable unit of a catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Entry {
    pub translator_comments: Vec<String>,
    /// Comments with another marker, such as `#@` or `#=`, without
    /// the leading `#`.
    pub other_comments: Vec<String>,
    pub extracted_comments: Vec<String>,
    pub references: Vec<Reference>,
    pub flags: Vec<String>,
    pub previous: Previous,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: Msgstr,
    pub obsolete: bool,
}

impl Entry {
    /// The first source reference, which determines the sort order.
    pub fn first_reference(&self) -> Option<&Reference> {
        self.references.first()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|flag| flag == "fuzzy")
    }

    /// Is this the metadata entry with an empty `msgid`?
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none() && !self.obsolete
    }
}

/// A parsed PO file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    /// The metadata entry, which always stays in front.
    pub header: Option<Entry>,
    pub entries: Vec<Entry>,
    /// Comment lines after the last entry, kept verbatim.
    pub trailing_comments: Vec<String>,
    pub line_ending: LineEnding,
}

impl Catalog {
    /// Number of entries, not counting the header.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sort the entries by source reference.
    ///
    /// The header stays in front and entries with equal keys keep
    /// their relative order.
    pub fn sort(&mut self) {
        sort::sort_entries(&mut self.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_split() {
        let reference = Reference::new("Source/Game/Menu.cpp:42");
        assert_eq!(reference.path(), "Source/Game/Menu.cpp");
        assert_eq!(reference.line(), Some(42));
    }

    #[test]
    fn test_reference_without_line() {
        let reference = Reference::new("Menu.cpp");
        assert_eq!(reference.path(), "Menu.cpp");
        assert_eq!(reference.line(), None);

        let reference = Reference::new(r"C:\Game\Menu.cpp");
        assert_eq!(reference.path(), r"C:\Game\Menu.cpp");
        assert_eq!(reference.line(), None);

        let reference = Reference::new("Menu.cpp:");
        assert_eq!(reference.path(), "Menu.cpp:");
        assert_eq!(reference.line(), None);
    }

    #[test]
    fn test_reference_asset_path() {
        let reference = Reference::new("/Game/Maps/Main.Main:12");
        assert_eq!(reference.path(), "/Game/Maps/Main.Main");
        assert_eq!(reference.line(), Some(12));

        let reference = Reference::new("/Game/UI/Menu.Menu_C:Title.Text");
        assert_eq!(reference.path(), "/Game/UI/Menu.Menu_C:Title.Text");
        assert_eq!(reference.line(), None);
    }

    #[test]
    fn test_line_ending_detect() {
        assert_eq!(LineEnding::detect("msgid \"\"\r\nmsgstr \"\""), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("msgid \"\"\nmsgstr \"\""), LineEnding::Lf);
        assert_eq!(LineEnding::detect("msgid \"\""), LineEnding::Lf);
    }

    #[test]
    fn test_entry_flags() {
        let entry = Entry {
            flags: vec![String::from("c-format"), String::from("fuzzy")],
            ..Entry::default()
        };
        assert!(entry.is_fuzzy());
        assert!(entry.is_header());
    }
}
