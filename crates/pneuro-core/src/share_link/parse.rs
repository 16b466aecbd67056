//! Parse the share-link response body into a share token.

use url::Url;

use crate::source_url::unquote_plus;

/// Extracts the share token from a 200 response body.
///
/// The body is a backslash-escaped URL string, sometimes wrapped in quotes
/// (e.g. `"https:\/\/host\/share\/abc123"`). The token is the last path
/// segment of the unescaped URL, percent-decoded.
pub fn parse_share_token(body: &str) -> Option<String> {
    let unescaped = unescape(body.trim());
    let cleaned = unescaped.trim().trim_matches('"');
    let share_url = Url::parse(cleaned).ok()?;
    let token = share_url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Some(unquote_plus(token))
}

/// Resolves backslash escapes (`\/`, `\\`, `\"`, `\n`, `\t`, `\r`,
/// `\uXXXX`). Unknown escapes are kept verbatim.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('/') => out.push('/'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
