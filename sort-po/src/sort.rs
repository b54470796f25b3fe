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

//! Ordering of catalog entries by source reference.

use std::cmp::Ordering;

use crate::catalog::Entry;

/// The key an entry is sorted by.
///
/// Fields compare in declaration order: live entries come before
/// obsolete ones, then the path of the first reference is compared
/// bytewise and finally the line number numerically. An entry
/// without references gets an empty path and no line, which puts it
/// in front of all other live entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey<'a> {
    pub obsolete: bool,
    pub path: &'a str,
    pub line: Option<u64>,
}

impl<'a> SortKey<'a> {
    pub fn for_entry(entry: &'a Entry) -> SortKey<'a> {
        let (path, line) = match entry.first_reference() {
            Some(reference) => (reference.path(), reference.line()),
            None => ("", None),
        };
        SortKey {
            obsolete: entry.obsolete,
            path,
            line,
        }
    }
}

pub fn compare(a: &Entry, b: &Entry) -> Ordering {
    SortKey::for_entry(a).cmp(&SortKey::for_entry(b))
}

/// Stable sort, so that entries with equal keys keep their order.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare);
}
