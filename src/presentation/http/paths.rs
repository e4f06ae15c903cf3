//! URLs of the forum pages, used as default redirect targets.

/// Percent-encode a value for use as a single path segment.
pub fn encode_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

pub fn index() -> String {
    "/index".to_string()
}

pub fn chat(name: &str) -> String {
    format!("/chat/{}", encode_segment(name))
}

pub fn post(id: i64) -> String {
    format!("/post/{}", id)
}

pub fn user(username: &str) -> String {
    format!("/user/{}", encode_segment(username))
}
