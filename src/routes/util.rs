//! Request parsing and response helpers shared by the route modules.

use crate::activities::ActivityError;
use crate::activities::map::Vector2;
use serde::Serialize;
use std::str::FromStr;

/// Decode `key=value&key2=value2` (form bodies and query strings alike).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, val) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            Some((percent_decode(key), percent_decode(val)))
        })
        .collect()
}

/// Percent-decode into bytes first so multi-byte UTF-8 survives
/// (region names carry accents). `+` means space.
pub fn percent_decode(input: &str) -> String {
    let raw = input.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'%' => {
                match (hex_val(raw.get(i + 1)), hex_val(raw.get(i + 2))) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: Option<&u8>) -> Option<u8> {
    match *b? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

pub fn parse_query(query: &str) -> Vec<(String, String)> {
    parse_form_body(query.strip_prefix('?').unwrap_or(query))
}

pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Parse a param into `T`; `None` when missing or malformed.
pub fn parse_param<T: FromStr>(params: &[(String, String)], key: &str) -> Option<T> {
    get_param(params, key).and_then(|s| s.trim().parse().ok())
}

/// `x=` and `y=` as a pointer position, if both parse as finite numbers.
pub fn parse_pointer(params: &[(String, String)]) -> Option<Vector2> {
    let x: f64 = parse_param(params, "x")?;
    let y: f64 = parse_param(params, "y")?;
    (x.is_finite() && y.is_finite()).then_some(Vector2 { x, y })
}

/// Minimal HTML escaping for text interpolated into fragments.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn error_html(msg: &str) -> String {
    format!(
        r#"<span class="text-red-600 font-semibold">{}</span>"#,
        escape_html(msg)
    )
}

pub fn activity_error_html(err: &ActivityError) -> String {
    error_html(&err.to_string())
}

/// Serialize a polling response; failures degrade to an error object.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(&e.to_string()))
}

pub fn error_json(msg: &str) -> String {
    serde_json::json!({ "error": msg }).to_string()
}
