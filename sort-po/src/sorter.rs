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

//! Sorting files one by one: backup, sort, replace.

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{error, info};

use crate::catalog::Catalog;
use crate::error::{self, FileError, WriteError};
use crate::po_file::{self, CatalogCodec, PoCodec};
use crate::Config;

/// Overall outcome of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every file was sorted.
    Success,
    /// There was no file to sort.
    NoInput,
    /// No file could be sorted.
    AllFailed,
    /// Some files were sorted, others failed.
    Partial,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::NoInput => 1,
            ExitStatus::AllFailed => 2,
            ExitStatus::Partial => 3,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// A file which could not be sorted.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: FileError,
}

/// Per-file outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct Report {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<Failure>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.total() == 0 {
            ExitStatus::NoInput
        } else if self.failed.is_empty() {
            ExitStatus::Success
        } else if self.succeeded.is_empty() {
            ExitStatus::AllFailed
        } else {
            ExitStatus::Partial
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.exit_status() {
            ExitStatus::NoInput => return writeln!(f, "No files to sort."),
            ExitStatus::Success => {
                writeln!(f, "Processed all files ({}):", self.succeeded.len())?;
            }
            ExitStatus::AllFailed => {
                writeln!(f, "No files have been sorted. Check input parameters.")?;
            }
            ExitStatus::Partial => {
                writeln!(f, "Sorted files ({}/{}):", self.succeeded.len(), self.total())?;
            }
        }
        for path in &self.succeeded {
            writeln!(f, " - {}", path.display())?;
        }
        if !self.failed.is_empty() {
            writeln!(f, "Failed to sort ({}):", self.failed.len())?;
            for failure in &self.failed {
                writeln!(f, " - {}", failure.path.display())?;
            }
        }
        Ok(())
    }
}

/// Sorts files according to a [`Config`].
pub struct Sorter<C = PoCodec> {
    config: Config,
    codec: C,
}

impl Sorter<PoCodec> {
    pub fn new(config: Config) -> Sorter<PoCodec> {
        let codec = config.codec();
        Sorter { config, codec }
    }
}

impl<C: CatalogCodec> Sorter<C> {
    pub fn with_codec(config: Config, codec: C) -> Sorter<C> {
        Sorter { config, codec }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sort each of `files` in turn.
    ///
    /// When `files` is empty, the configured default file is sorted.
    /// A failure is logged and recorded, and processing continues
    /// with the next file.
    pub fn run<P: AsRef<Path>>(&self, files: &[P]) -> Report {
        let files: Vec<PathBuf> = if files.is_empty() {
            self.config.default_filename.iter().cloned().collect()
        } else {
            files
                .iter()
                .map(|path| path.as_ref().to_path_buf())
                .collect()
        };

        let mut report = Report::default();
        for file in files {
            let path = resolve(&file);
            info!("Sorting {}", path.display());
            match self.sort_file(&path) {
                Ok(()) => {
                    info!(" - Sorted and saved {}", path.display());
                    report.succeeded.push(path);
                }
                Err(err) => {
                    error!(" - Error: {err}");
                    report.failed.push(Failure { path, error: err });
                }
            }
        }
        report
    }

    /// Back up, sort and replace the catalog at `path`.
    ///
    /// The original file is not touched unless the backup was
    /// written. An empty backup directory name disables the backup.
    pub fn sort_file(&self, path: &Path) -> error::Result<()> {
        if !path.is_file() {
            return Err(FileError::Path(path.to_path_buf()));
        }

        let mut catalog = po_file::parse(&self.codec, path).map_err(|source| FileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match self.backup_path(path)? {
            Some(backup_path) => {
                info!(" - Saving backup {}", backup_path.display());
                self.write_backup(&catalog, &backup_path)
                    .map_err(|source| FileError::Backup {
                        path: backup_path.clone(),
                        source,
                    })?;
            }
            None => info!(" - Backup disabled"),
        }

        catalog.sort();

        po_file::write(&self.codec, &catalog, path).map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where the backup of `path` is stored, if backups are enabled.
    pub fn backup_path(&self, path: &Path) -> error::Result<Option<PathBuf>> {
        if self.config.backup_directory.is_empty() {
            return Ok(None);
        }
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => Ok(Some(
                parent.join(&self.config.backup_directory).join(name),
            )),
            _ => Err(FileError::Path(path.to_path_buf())),
        }
    }

    fn write_backup(
        &self,
        catalog: &Catalog,
        backup_path: &Path,
    ) -> Result<(), WriteError> {
        if let Some(dir) = backup_path.parent() {
            fs::create_dir_all(dir)?;
        }
        po_file::write(&self.codec, catalog, backup_path)
    }
}

/// Make `path` absolute, resolving symlinks if it exists.
fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
