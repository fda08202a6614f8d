// LogSift - GPL-3.0-or-later
// This file is part of LogSift.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogSift is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogSift is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogSift.  If not, see <https://www.gnu.org/licenses/>.

//! Key/value tail parsing shared by the Meraki and CEF decoders.

use super::record_types::CefEvent;
use indexmap::IndexMap;

/// Number of `|` separators in a CEF header (8 parts including the extension)
const CEF_HEADER_SEPARATORS: usize = 7;

fn is_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Split on whitespace, keeping quoted runs (`name='a b'`) inside one token
fn tokenize(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut quote = None;

    for (i, c) in text.char_indices() {
        match (quote, start) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, _) if c == '\'' || c == '"' => {
                quote = Some(c);
                start.get_or_insert(i);
            }
            (None, Some(s)) if c.is_whitespace() => {
                tokens.push((s, &text[s..i]));
                start = None;
            }
            (None, None) if c.is_whitespace() => {}
            (None, _) => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        tokens.push((s, &text[s..]));
    }
    tokens
}

fn unquote(value: &str) -> &str {
    for q in ['\'', '"'] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    value
}

/// Parse `key=value` tokens from a space-separated message tail.
///
/// A bare `key:` token (Meraki's `pattern:` and `request:`) takes the rest of
/// the line as its value and ends parsing. Later duplicates overwrite earlier
/// values but keep the original position.
#[must_use]
pub fn parse_key_values(text: &str) -> IndexMap<String, String> {
    let mut fields = IndexMap::new();

    for (offset, token) in tokenize(text) {
        if let Some((key, value)) = token.split_once('=') {
            if is_key(key) {
                fields.insert(key.to_string(), unquote(value).to_string());
            }
        } else if let Some(key) = token.strip_suffix(':').filter(|k| is_key(k)) {
            let rest = text[offset + token.len()..].trim();
            if !rest.is_empty() {
                fields.insert(key.to_string(), rest.to_string());
            }
            break;
        }
    }

    fields
}

/// Byte offsets of `target` characters not preceded by an escaping backslash
fn unescaped_positions(text: &str, target: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == target {
            positions.push(i);
        }
    }
    positions
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(escaped @ ('\\' | '=' | '|')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse a CEF extension block (`src=10.0.0.1 msg=two words dpt=443`).
///
/// Values run until the key of the next pair, so they may contain spaces.
/// `\=` and `\\` inside values are unescaped.
#[must_use]
pub fn parse_cef_extension(extension: &str) -> IndexMap<String, String> {
    let keys: Vec<(usize, usize)> = unescaped_positions(extension, '=')
        .into_iter()
        .filter_map(|eq| {
            // Whitespace before a key may be multi-byte (U+00A0)
            let start = extension[..eq]
                .char_indices()
                .rev()
                .find(|(_, c)| c.is_whitespace())
                .map_or(0, |(p, c)| p + c.len_utf8());
            is_key(&extension[start..eq]).then_some((start, eq))
        })
        .collect();

    keys.iter()
        .enumerate()
        .map(|(idx, &(start, eq))| {
            let end = keys
                .get(idx + 1)
                .map_or(extension.len(), |&(next_start, _)| next_start);
            let value = extension[eq + 1..end].trim_end();
            (extension[start..eq].to_string(), unescape(value))
        })
        .collect()
}

/// Parse a full `CEF:<version>|vendor|product|version|class|name|severity|extension`
/// string. Returns `None` unless all eight parts are present.
#[must_use]
pub fn parse_cef(text: &str) -> Option<CefEvent> {
    let body = text.strip_prefix("CEF:")?;
    let pipes = unescaped_positions(body, '|');
    if pipes.len() < CEF_HEADER_SEPARATORS {
        return None;
    }

    let mut header = Vec::with_capacity(CEF_HEADER_SEPARATORS);
    let mut start = 0;
    for &pipe in &pipes[..CEF_HEADER_SEPARATORS] {
        header.push(unescape(&body[start..pipe]));
        start = pipe + 1;
    }
    let extension = &body[start..];

    let version = header[0].trim().to_string();
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut header = header.into_iter().skip(1);
    let mut next = || header.next().unwrap_or_default();
    Some(CefEvent {
        version,
        device_vendor: next(),
        device_product: next(),
        device_version: next(),
        event_class: next(),
        name: next(),
        severity: next(),
        extensions: parse_cef_extension(extension),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meraki_flow_tail() {
        let fields =
            parse_key_values("src=10.10.0.102 dst=35.153.85.208 protocol=tcp sport=52044 dport=443");
        assert_eq!(fields.get("src").map(String::as_str), Some("10.10.0.102"));
        assert_eq!(fields.get("dport").map(String::as_str), Some("443"));
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["src", "dst", "protocol", "sport", "dport"]);
    }

    #[test]
    fn test_trailing_descriptor_takes_rest_of_line() {
        let fields = parse_key_values(
            "src=192.168.1.186:63735 dst=69.58.188.40:80 mac=58:1F:AA:CE:61:F2 request: GET https://example.com/a b",
        );
        assert_eq!(fields.get("mac").map(String::as_str), Some("58:1F:AA:CE:61:F2"));
        assert_eq!(
            fields.get("request").map(String::as_str),
            Some("GET https://example.com/a b")
        );
    }

    #[test]
    fn test_quoted_values() {
        let fields = parse_key_values("type=vpn_connectivity_change vpn_type='site-to-site' peer_contact='1.2.3.4 x'");
        assert_eq!(fields.get("vpn_type").map(String::as_str), Some("site-to-site"));
        assert_eq!(fields.get("peer_contact").map(String::as_str), Some("1.2.3.4 x"));
    }

    #[test]
    fn test_free_text_is_ignored() {
        let fields = parse_key_values("dhcp lease of ip 10.0.0.5 from server");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_cef_extension_values_with_spaces_and_escapes() {
        let ext = parse_cef_extension(r"src=10.0.0.1 msg=Blocked a b\=c path=C:\\tmp dpt=443");
        assert_eq!(ext.get("src").map(String::as_str), Some("10.0.0.1"));
        assert_eq!(ext.get("msg").map(String::as_str), Some("Blocked a b=c"));
        assert_eq!(ext.get("path").map(String::as_str), Some(r"C:\tmp"));
        assert_eq!(ext.get("dpt").map(String::as_str), Some("443"));
    }

    #[test]
    fn test_cef_extension_with_multibyte_whitespace() {
        let ext = parse_cef_extension("msg=a\u{a0}src=10.0.0.1\u{3000}dst=Zürich host=日本");
        assert_eq!(ext.get("msg").map(String::as_str), Some("a"));
        assert_eq!(ext.get("src").map(String::as_str), Some("10.0.0.1"));
        assert_eq!(ext.get("dst").map(String::as_str), Some("Zürich"));
        assert_eq!(ext.get("host").map(String::as_str), Some("日本"));
    }

    #[test]
    fn test_parse_cef_header() {
        let cef = parse_cef(
            r"CEF:0|Ubiquiti|UniFi Network|9.0.114|201|Threat \| Detected|7|src=10.0.0.5 UNIFIcategory=Security",
        )
        .expect("valid CEF");
        assert_eq!(cef.version, "0");
        assert_eq!(cef.device_vendor, "Ubiquiti");
        assert_eq!(cef.device_product, "UniFi Network");
        assert_eq!(cef.event_class, "201");
        assert_eq!(cef.name, "Threat | Detected");
        assert_eq!(cef.severity, "7");
        assert_eq!(
            cef.extensions.get("UNIFIcategory").map(String::as_str),
            Some("Security")
        );
    }

    #[test]
    fn test_parse_cef_rejects_short_header() {
        assert!(parse_cef("CEF:0|Ubiquiti|UniFi Network|9.0").is_none());
        assert!(parse_cef("CEF:x|a|b|c|d|e|f|").is_none());
        assert!(parse_cef("LEEF:1.0|a|b|c|d|").is_none());
    }
}
