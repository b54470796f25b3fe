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

//! Reading and writing PO files.
//!
//! The format is the one produced by GNU Gettext: comments (`#`,
//! `#.`, `#:`, `#,`, `#|`) followed by `msgctxt`, `msgid`,
//! `msgid_plural` and `msgstr` fields. Obsolete entries are prefixed
//! with `#~`.

mod parse;
mod write;

use std::fs;
use std::io::Write as _;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::catalog::Catalog;
use crate::encoding::TextEncoding;
use crate::error::{ParseError, WriteError};

pub use parse::parse_str;
pub use write::write_string;

/// Conversion between the bytes of a file and a [`Catalog`].
pub trait CatalogCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Catalog, ParseError>;

    fn serialize(&self, catalog: &Catalog) -> Result<Vec<u8>, WriteError>;
}

/// The PO text format in a given encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoCodec {
    pub encoding: TextEncoding,
    /// Maximum line width, `0` disables wrapping.
    pub wrap_width: usize,
}

impl CatalogCodec for PoCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Catalog, ParseError> {
        let text = self.encoding.decode(bytes)?;
        parse_str(&text)
    }

    fn serialize(&self, catalog: &Catalog) -> Result<Vec<u8>, WriteError> {
        self.encoding.encode(&write_string(catalog, self.wrap_width))
    }
}

/// Parse the catalog at `path`.
///
/// A catalog with nothing but a header is reported as
/// [`ParseError::Empty`].
pub fn parse<C: CatalogCodec + ?Sized>(codec: &C, path: &Path) -> Result<Catalog, ParseError> {
    let bytes = fs::read(path)?;
    let catalog = codec.parse(&bytes)?;
    if catalog.is_empty() {
        return Err(ParseError::Empty);
    }
    let fuzzy = catalog.entries.iter().filter(|entry| entry.is_fuzzy()).count();
    debug!(
        "Read {} entries ({fuzzy} fuzzy) from {}",
        catalog.count(),
        path.display()
    );
    Ok(catalog)
}

/// Write `catalog` to `path`.
///
/// The data is first written to a temporary file next to `path`,
/// which then replaces `path`. An existing file keeps its
/// permissions.
pub fn write<C: CatalogCodec + ?Sized>(
    codec: &C,
    catalog: &Catalog,
    path: &Path,
) -> Result<(), WriteError> {
    let bytes = codec.serialize(catalog)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    if let Ok(metadata) = fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| WriteError::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CATALOG: &str = "\
msgid \"\"
msgstr \"Content-Type: text/plain; charset=UTF-8\\n\"

#: b.cpp:10
msgid \"b\"
msgstr \"B\"

#: a.cpp:5
msgid \"a\"
msgstr \"A\"
";

    #[test]
    fn test_parse_and_write_file() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("Game.po");
        fs::write(&path, CATALOG)?;

        let codec = PoCodec {
            encoding: TextEncoding::utf8(),
            wrap_width: 0,
        };
        let mut catalog = parse(&codec, &path)?;
        assert_eq!(catalog.count(), 2);

        catalog.sort();
        write(&codec, &catalog, &path)?;
        assert_eq!(
            fs::read_to_string(&path)?,
            "\
msgid \"\"
msgstr \"Content-Type: text/plain; charset=UTF-8\\n\"

#: a.cpp:5
msgid \"a\"
msgstr \"A\"

#: b.cpp:10
msgid \"b\"
msgstr \"B\"
"
        );
        Ok(())
    }

    #[test]
    fn test_write_bom() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("Game.po");
        let codec = PoCodec::default();
        let catalog = codec.parse(CATALOG.as_bytes())?;

        write(&codec, &catalog, &path)?;
        let bytes = fs::read(&path)?;
        assert!(bytes.starts_with(b"\xEF\xBB\xBFmsgid \"\""));
        assert_eq!(parse(&codec, &path)?, catalog);
        Ok(())
    }

    #[test]
    fn test_parse_header_only() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("Game.po");
        fs::write(&path, "msgid \"\"\nmsgstr \"\"\n")?;

        let result = parse(&PoCodec::default(), &path);
        assert!(matches!(result, Err(ParseError::Empty)));
        Ok(())
    }

    #[test]
    fn test_parse_missing_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let result = parse(&PoCodec::default(), &tmpdir.path().join("missing.po"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let tmpdir = tempfile::tempdir().unwrap();
        let codec = PoCodec::default();
        let catalog = codec.parse(CATALOG.as_bytes()).unwrap();
        let result = write(&codec, &catalog, &tmpdir.path().join("missing/Game.po"));
        assert!(matches!(result, Err(WriteError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("Game.po");
        fs::write(&path, CATALOG)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

        let codec = PoCodec::default();
        let catalog = parse(&codec, &path)?;
        write(&codec, &catalog, &path)?;
        assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o644);
        Ok(())
    }
}
