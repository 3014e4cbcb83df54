//! JSON string-literal escaping with pooled scratch buffers.
//!
//! [`escape`] turns text into a quoted JSON string value that is also safe
//! inside HTML `<script>` blocks: U+2028 and U+2029 are escaped along with
//! the control characters, quote and backslash. [`escape_bytes`] accepts
//! arbitrary bytes and substitutes `\ufffd` for anything that does not
//! decode as UTF-8, so neither entry point can fail.
//!
//! ```
//! assert_eq!(json_quote::escape("a\"b\nc"), r#""a\"b\nc""#);
//! ```

use bstr::decode_utf8;

mod pool;

use pool::BufferPool;

const NN: u8 = b'n'; // \x0A
const RR: u8 = b'r'; // \x0D
const TT: u8 = b't'; // \x09
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const UU: u8 = b'u'; // \x00...\x1F except the ones above
const __: u8 = 0;

// Lookup table of escape sequences for the ASCII range. A value of b'x' at
// index i means that byte i is escaped as "\x" in JSON, b'u' selects the
// \u00XX form, and 0 means the byte is emitted verbatim. Bytes >= 0x80 never
// index this table; they go through the UTF-8 decode path instead.
static ESCAPE: [u8; 128] = [
    //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    UU, UU, UU, UU, UU, UU, UU, UU, UU, TT, NN, UU, UU, RR, UU, UU, // 0
    UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, // 1
    __, __, QU, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 3
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
    __, __, __, __, __, __, __, __, __, __, __, __, BS, __, __, __, // 5
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
];

static HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";

static ESCAPER: Escaper = Escaper::new();

/// Escapes `input` into a quoted JSON string value using the process-wide
/// escaper.
pub fn escape<S: AsRef<str>>(input: S) -> String {
    ESCAPER.escape(input)
}

/// Escapes arbitrary bytes into a quoted JSON string value using the
/// process-wide escaper. Bytes that do not decode as UTF-8 come out as the
/// `\ufffd` escape, one per undecodable byte.
pub fn escape_bytes<B: AsRef<[u8]>>(input: B) -> String {
    ESCAPER.escape_bytes(input)
}

/// A JSON string escaper with its own buffer pool.
///
/// The free functions share one process-wide instance; a separate instance
/// only matters when pool isolation does, e.g. in tests or when embedding
/// the escaper behind another allocation strategy.
pub struct Escaper {
    pool: BufferPool,
}

impl Escaper {
    pub const fn new() -> Escaper {
        Escaper {
            pool: BufferPool::new(),
        }
    }

    /// See [`escape`].
    pub fn escape<S: AsRef<str>>(&self, input: S) -> String {
        self.escape_bytes(input.as_ref().as_bytes())
    }

    /// See [`escape_bytes`].
    pub fn escape_bytes<B: AsRef<[u8]>>(&self, input: B) -> String {
        let bytes = input.as_ref();
        if bytes.is_empty() {
            return String::from("\"\"");
        }
        let mut buf = self.pool.acquire(bytes.len() + 2);
        // Safety: everything written below is either a whole well-formed
        // code point copied from the input or an ASCII escape sequence.
        let writer = unsafe { buf.as_mut_vec() };
        writer.push(b'"');
        escape_inner(bytes, writer);
        writer.push(b'"');
        // The lease returns the buffer to the pool on drop; the result is an
        // independent copy, never a view into pooled storage.
        buf.as_str().to_owned()
    }
}

impl Default for Escaper {
    fn default() -> Escaper {
        Escaper::new()
    }
}

fn escape_inner(bytes: &[u8], writer: &mut Vec<u8>) {
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            let escape = ESCAPE[b as usize];
            if escape == 0 {
                i += 1;
                continue;
            }

            if start < i {
                writer.extend_from_slice(&bytes[start..i]);
            }
            writer.push(b'\\');
            if escape == UU {
                writer.extend_from_slice(b"u00");
                writer.push(HEX_DIGITS[(b >> 4) as usize]);
                writer.push(HEX_DIGITS[(b & 0xF) as usize]);
            } else {
                writer.push(escape);
            }
            i += 1;
            start = i;
            continue;
        }

        let (decoded, size) = decode_utf8(&bytes[i..]);
        match decoded {
            None => {
                if start < i {
                    writer.extend_from_slice(&bytes[start..i]);
                }
                writer.extend_from_slice(b"\\ufffd");
                // Advance a single byte regardless of how much the decoder
                // consumed, so each undecodable byte gets its own
                // replacement and trailing continuation bytes re-enter the
                // loop on their own.
                i += 1;
                start = i;
            }
            Some(c) if c == '\u{2028}' || c == '\u{2029}' => {
                if start < i {
                    writer.extend_from_slice(&bytes[start..i]);
                }
                writer.extend_from_slice(b"\\u202");
                writer.push(HEX_DIGITS[c as usize & 0xF]);
                i += size;
                start = i;
            }
            // Every other code point, multi-byte included, stays part of the
            // pending verbatim run.
            Some(_) => i += size,
        }
    }

    if start < bytes.len() {
        writer.extend_from_slice(&bytes[start..]);
    }
}

#[test]
fn test_empty_string() {
    assert_eq!(escape(""), r#""""#);
}

#[test]
fn test_plain_ascii_passthrough() {
    let fixture = r#"abcdefghijklmnopqrstuvwxyz .*? hello world escape json string"#;
    assert_eq!(escape(fixture), format!("\"{fixture}\""));
    assert_eq!(escape(fixture), serde_json::to_string(fixture).unwrap());
}

#[test]
fn test_quote_and_backslash() {
    assert_eq!(escape("a\"b"), r#""a\"b""#);
    assert_eq!(escape("a\\b"), r#""a\\b""#);
}

#[test]
fn test_newline_stays_two_characters() {
    assert_eq!(escape("line1\nline2"), r#""line1\nline2""#);
}

#[test]
fn test_control_characters_use_lowercase_hex() {
    assert_eq!(escape("\u{1}"), r#""\u0001""#);
    assert_eq!(escape("\u{8}"), r#""\u0008""#);
    assert_eq!(escape("\u{c}"), r#""\u000c""#);
    assert_eq!(escape("\u{1f}"), r#""\u001f""#);
    assert_eq!(escape("\r\t"), r#""\r\t""#);
}

#[test]
fn test_delete_is_not_escaped() {
    assert_eq!(escape("\u{7f}"), "\"\u{7f}\"");
}

#[test]
fn test_line_and_paragraph_separators() {
    assert_eq!(escape("a\u{2028}b"), r#""a\u2028b""#);
    assert_eq!(escape("a\u{2029}b"), r#""a\u2029b""#);
    assert!(!escape("\u{2028}\u{2029}").contains('\u{2028}'));
}

#[test]
fn test_multibyte_passthrough() {
    let fixture = "中文 English 🚀 ❓ \n \"quoted\" back\\slash\ttab";
    assert_eq!(escape(fixture), serde_json::to_string(fixture).unwrap());
}

#[test]
fn test_invalid_utf8_replacement() {
    assert_eq!(escape_bytes(b"\x80"), r#""\ufffd""#);
    assert_eq!(escape_bytes(b"a\x80b"), r#""a\ufffdb""#);
    // A truncated three-byte sequence yields one replacement per byte.
    assert_eq!(escape_bytes(b"\xe2\x80t"), r#""\ufffd\ufffdt""#);
    // The valid sequence right after an invalid byte is kept intact.
    assert_eq!(escape_bytes(b"\x80\xc3\xa9"), "\"\\ufffd\u{e9}\"");
}

#[test]
fn test_double_escape_is_not_idempotent() {
    let once = escape("a");
    assert_ne!(escape(once.as_str()), once);
    assert_eq!(escape(once.as_str()), r#""\"a\"""#);
}

#[test]
fn test_str_and_byte_paths_agree() {
    let fixture = "mixed \u{2028} content\twith 🚀 and \u{0}";
    assert_eq!(escape(fixture), escape_bytes(fixture.as_bytes()));
}

#[test]
fn test_round_trips_through_a_json_parser() {
    let fixture = "line\u{2028}sep \u{1b}[0m \"quotes\" \\ 中文";
    let decoded: String = serde_json::from_str(&escape(fixture)).unwrap();
    assert_eq!(decoded, fixture);
}

#[test]
fn test_separate_escapers_agree() {
    let escaper = Escaper::new();
    assert_eq!(escaper.escape("x\ny"), escape("x\ny"));
}
