//! Filename extraction from `Content-Disposition` headers.
//!
//! Handles `filename="a.png"`, `filename=a.png` and the RFC 5987
//! `filename*=UTF-8''a%20b.png` form, which wins when both are present.

/// Extract the declared filename from a `Content-Disposition` header value.
///
/// Any directory component in the declared name is dropped.
pub fn declared_filename(header: &str) -> Option<String> {
    let mut params = split_params(header).into_iter();
    // The disposition type itself ("attachment", "inline") carries no name.
    params.next()?;

    let mut plain = None;
    let mut extended = None;
    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(unquote(value.trim()).to_string()),
            "filename*" => {
                extended = value.trim().splitn(3, '\'').nth(2).map(percent_decode);
            }
            _ => {}
        }
    }

    extended
        .or(plain)
        .and_then(|name| crate::detection::basename(&name))
}

/// Split on `;` outside double quotes, so `filename="a;b.png"` stays whole.
fn split_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&header[start..]);
    params
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(byte) = bytes.get(i + 1..i + 3).and_then(hex_byte) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    let digit = |b: u8| (b as char).to_digit(16);
    Some((digit(pair[0])? * 16 + digit(pair[1])?) as u8)
}
