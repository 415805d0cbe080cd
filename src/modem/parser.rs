//! SIM800 response line grammar.
//!
//! Only three unsolicited/final responses matter:
//!
//! ```text
//! OK\r\n
//! +CREG: <stat>\r\n
//! +CLIP: "<number>",<type>,"<subaddr>",<satype>,"<alpha>",<validity>\r\n
//! ```
//!
//! Everything else (echoed commands, `RING`, diagnostic noise, partial
//! reads cut off by a timeout) parses to `None`.  Parsing never fails.

/// A recognised modem line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok,
    Registration(u32),
    CallerId(Vec<u8>),
}

const TERMINATOR: &[u8] = b"\r\n";

pub fn parse_line(line: &[u8]) -> Option<Response> {
    let body = line.strip_suffix(TERMINATOR)?;
    if body == b"OK" {
        return Some(Response::Ok);
    }
    if let Some(rest) = body.strip_prefix(b"+CREG:") {
        return parse_creg(rest).map(Response::Registration);
    }
    if let Some(rest) = body.strip_prefix(b"+CLIP:") {
        return parse_clip(rest).map(Response::CallerId);
    }
    None
}

fn skip_spaces(mut s: &[u8]) -> &[u8] {
    while let [b' ', rest @ ..] = s {
        s = rest;
    }
    s
}

/// `+CREG: 1` only; the solicited `+CREG: 0,1` form is not a status change.
fn parse_creg(rest: &[u8]) -> Option<u32> {
    let digits = skip_spaces(rest);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// First field must be a quoted string followed by a comma.
fn parse_clip(rest: &[u8]) -> Option<Vec<u8>> {
    let fields = skip_spaces(rest);
    if fields.is_empty() {
        return None;
    }
    let quoted = fields.strip_prefix(b"\"")?;
    let close = quoted.iter().position(|b| *b == b'"')?;
    let (number, after) = quoted.split_at(close);
    after[1..].starts_with(b",").then(|| number.to_vec())
}
