//! Wire encoding for signed request bodies
//!
//! The gateway verifies `content-md5` against the exact bytes it receives,
//! and its established clients emit JSON with `", "` / `": "` separators and
//! every non-ASCII character escaped as `\uXXXX`. Bodies produced here are
//! byte-for-byte compatible with that encoding so digests line up with
//! signatures computed anywhere else.

use std::io::{self, Write};

use serde::{ser::Error as _, Serialize};
use serde_json::ser::{Formatter, Serializer};

/// `serde_json` formatter emitting the gateway's spaced, ASCII-only JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayFormatter;

impl Formatter for GatewayFormatter {
    #[inline]
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    #[inline]
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    #[inline]
    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        // Quotes, backslashes and C0 controls never reach this method;
        // serde_json escapes them before handing over the fragment.
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if is_printable_ascii(ch) {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

fn is_printable_ascii(ch: char) -> bool {
    (' '..='~').contains(&ch)
}

/// Serialize `value` into the gateway wire encoding
pub fn to_canonical_string<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(256);
    let mut serializer = Serializer::with_formatter(&mut buf, GatewayFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(serde_json::Error::custom)
}
