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

//! Text encodings for reading and writing catalogs.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

use anyhow::bail;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{ParseError, WriteError};

const UTF_8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The encoding of a catalog file.
///
/// This wraps an [`Encoding`] and remembers whether a byte order
/// mark should be written, which is what the `utf-8-sig` and `utf-16`
/// labels ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
    bom: bool,
}

impl TextEncoding {
    /// Look up an encoding by label.
    ///
    /// Besides the labels of the Encoding Standard, `utf-8-sig` (and
    /// `utf8-sig`) select UTF-8 with a leading byte order mark, and
    /// `utf-16-le` and `utf-16-be` select UTF-16 without one. A plain
    /// `utf-16` reads either byte order and writes little endian with
    /// a byte order mark. Encodings which cannot be written back,
    /// such as ISO-2022-KR, are rejected.
    pub fn for_label(label: &str) -> anyhow::Result<TextEncoding> {
        let label = label.trim().to_ascii_lowercase();
        let (label, sig) = match label.strip_suffix("-sig") {
            Some(base) => (base, true),
            None => (label.as_str(), false),
        };
        let label = match label {
            "utf-16-le" => "utf-16le",
            "utf-16-be" => "utf-16be",
            label => label,
        };
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            bail!("Unknown encoding {label:?}");
        };
        if sig && encoding != UTF_8 {
            bail!("A byte order mark is only supported for UTF-8, not {label:?}");
        }
        if !is_utf16(encoding) && encoding.output_encoding() != encoding {
            bail!("Cannot write catalogs as {}", encoding.name());
        }
        let bom = sig || label == "utf-16";
        Ok(TextEncoding { encoding, bom })
    }

    pub fn utf8() -> TextEncoding {
        TextEncoding {
            encoding: UTF_8,
            bom: false,
        }
    }

    pub fn utf8_sig() -> TextEncoding {
        TextEncoding {
            encoding: UTF_8,
            bom: true,
        }
    }

    /// Decode `bytes`, stripping a leading byte order mark.
    ///
    /// For UTF-16 the byte order mark decides the byte order. Malformed
    /// input is an error rather than being replaced, since we would
    /// otherwise write the replacement characters back.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, ParseError> {
        let (encoding, bytes) = match Encoding::for_bom(bytes) {
            Some((found, len))
                if found == self.encoding || (is_utf16(self.encoding) && is_utf16(found)) =>
            {
                (found, &bytes[len..])
            }
            _ => (self.encoding, bytes),
        };
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or(ParseError::Decode(encoding.name()))
    }

    /// Encode `text`, prepending the byte order mark if requested.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, WriteError> {
        if is_utf16(self.encoding) {
            return Ok(self.encode_utf16(text));
        }
        let (encoded, _, had_unmappable) = self.encoding.encode(text);
        if had_unmappable {
            return Err(WriteError::Encode(self.encoding.name()));
        }
        let mut bytes = Vec::with_capacity(encoded.len() + UTF_8_BOM.len());
        if self.bom {
            bytes.extend_from_slice(UTF_8_BOM);
        }
        bytes.extend_from_slice(&encoded);
        Ok(bytes)
    }

    // encoding_rs only decodes UTF-16.
    fn encode_utf16(&self, text: &str) -> Vec<u8> {
        let big_endian = self.encoding == UTF_16BE;
        let units = self.bom.then_some(0xFEFF).into_iter().chain(text.encode_utf16());
        let mut bytes = Vec::with_capacity(2 * (text.len() + 1));
        for unit in units {
            let pair = if big_endian {
                unit.to_be_bytes()
            } else {
                unit.to_le_bytes()
            };
            bytes.extend_from_slice(&pair);
        }
        bytes
    }
}

fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == UTF_16LE || encoding == UTF_16BE
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::utf8_sig()
    }
}

impl Display for TextEncoding {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.encoding.name())?;
        if self.bom {
            write!(f, " (with BOM)")?;
        }
        Ok(())
    }
}
