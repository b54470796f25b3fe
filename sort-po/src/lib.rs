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

//! Sort the entries of Gettext PO files by source reference.
//!
//! Some tools, most notably the Unreal Engine localization
//! dashboard, export PO files with their entries in a random order.
//! Every export then shows up as a large diff in version control.
//! Sorting the entries by their first `#:` reference gives a stable
//! order.
//!
//! Each file is backed up to a `backup-sort-po/` directory next to it
//! before it is sorted and replaced.

use std::path::PathBuf;

pub mod catalog;
pub mod encoding;
pub mod error;
pub mod po_file;
pub mod sort;
pub mod sorter;

use encoding::TextEncoding;
use po_file::PoCodec;

/// File sorted when no file names are given.
pub const DEFAULT_FILENAME: &str = "Game.po";

/// Encoding label used when none is given.
pub const DEFAULT_ENCODING: &str = "utf-8-sig";

/// Name of the backup directory created next to each sorted file.
pub const BACKUP_DIRECTORY: &str = "backup-sort-po";

/// Settings for a sorting run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// File to sort when no files are given, if any.
    pub default_filename: Option<PathBuf>,
    /// Encoding for both reading and writing.
    pub encoding: TextEncoding,
    /// Directory name for backups, relative to each sorted file.
    pub backup_directory: String,
    /// Line width for written files, `0` disables wrapping.
    pub wrap_width: usize,
}

impl Config {
    pub fn codec(&self) -> PoCodec {
        PoCodec {
            encoding: self.encoding,
            wrap_width: self.wrap_width,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_filename: Some(PathBuf::from(DEFAULT_FILENAME)),
            encoding: TextEncoding::utf8_sig(),
            backup_directory: String::from(BACKUP_DIRECTORY),
            wrap_width: 0,
        }
    }
}
