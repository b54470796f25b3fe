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

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a catalog.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not decode catalog as {0}")]
    Decode(&'static str),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("No entries found")]
    Empty,
}

/// Errors raised while writing a catalog.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not encode catalog as {0}")]
    Encode(&'static str),
    #[error("Could not replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single file could not be sorted.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("{0} not found or is not a file")]
    Path(PathBuf),
    #[error("Could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("Could not save backup {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
    #[error("Could not save sorted {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

pub type Result<T> = std::result::Result<T, FileError>;
