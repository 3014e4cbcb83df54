use std::thread;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

use json_quote::{escape, escape_bytes, Escaper};

#[quickcheck]
fn output_is_always_quoted(s: String) -> bool {
    let out = escape(s.as_str());
    out.len() >= 2 && out.starts_with('"') && out.ends_with('"')
}

#[quickcheck]
fn arbitrary_bytes_are_always_quoted(bytes: Vec<u8>) -> bool {
    let out = escape_bytes(&bytes);
    out.len() >= 2 && out.starts_with('"') && out.ends_with('"')
}

#[quickcheck]
fn output_round_trips_through_a_json_parser(s: String) -> bool {
    serde_json::from_str::<String>(&escape(s.as_str())).ok() == Some(s)
}

#[quickcheck]
fn no_raw_control_or_separator_chars_survive(s: String) -> bool {
    let out = escape(s.as_str());
    !out.contains(|c: char| c < '\u{20}' || c == '\u{2028}' || c == '\u{2029}')
}

// serde_json writes 0x08/0x0C as \b/\f and leaves U+2028/U+2029 raw; on
// every other input the two encoders agree byte for byte.
#[quickcheck]
fn matches_serde_json_outside_dialect_gaps(s: String) -> TestResult {
    if s.contains(|c: char| matches!(c, '\u{8}' | '\u{c}' | '\u{2028}' | '\u{2029}')) {
        return TestResult::discard();
    }
    TestResult::from_bool(escape(s.as_str()) == serde_json::to_string(&s).unwrap())
}

#[quickcheck]
fn byte_path_agrees_with_str_path_on_valid_utf8(s: String) -> bool {
    escape_bytes(s.as_bytes()) == escape(s.as_str())
}

#[test]
fn concurrent_calls_do_not_cross_contaminate() {
    let threads: Vec<_> = (0..16)
        .map(|t| {
            thread::spawn(move || {
                for round in 0..200 {
                    let payload = format!("thread-{t}-round-{round}\n\u{2028}\"{t}\"");
                    let expected = format!("\"thread-{t}-round-{round}\\n\\u2028\\\"{t}\\\"\"");
                    assert_eq!(escape(payload.as_str()), expected);
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }
}

#[test]
fn shared_escaper_instance_is_thread_safe() {
    let escaper = Escaper::new();
    thread::scope(|scope| {
        for t in 0..8 {
            let escaper = &escaper;
            scope.spawn(move || {
                for round in 0..100 {
                    let payload = format!("{t}:{round}");
                    assert_eq!(escaper.escape(payload.as_str()), format!("\"{t}:{round}\""));
                }
            });
        }
    });
}
