use itertools::Itertools;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// Characters left alone when encoding a path segment; everything else is
/// percent-encoded, matching what browsers do for a URI component.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const DEFAULT_EXTENSION: &str = "markdown";

/// Extensions hidden from file listings.
pub const HIDDEN_EXTENSIONS: &[&str] = &[".profile"];

#[derive(Debug, Error, PartialEq)]
pub enum LinkError {
    #[error("malformed percent-encoding in path segment {segment:?}")]
    MalformedEncoding { segment: String },
}

/// Percent-encode each `/`-separated segment of a page path.
pub fn encode_path(page_id: &str) -> String {
    page_id
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .join("/")
}

/// Inverse of [`encode_path`]; fails on a stray `%` or undecodable UTF-8.
pub fn decode_path(page_id: &str) -> Result<String, LinkError> {
    page_id
        .split('/')
        .map(decode_segment)
        .collect::<Result<Vec<_>, _>>()
        .map(|segments| segments.join("/"))
}

fn decode_segment(segment: &str) -> Result<String, LinkError> {
    let malformed = || LinkError::MalformedEncoding {
        segment: segment.to_string(),
    };

    let bytes = segment.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .map(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .unwrap_or(false);
            if !valid {
                return Err(malformed());
            }
        }
    }

    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| malformed())
}

/// Index pages render in the book view. Only the last path component is
/// compared, so `notindex.md` is an ordinary page.
pub fn is_index_page(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    matches!(name, "index.md" | "index.html" | "index")
}

/// Lower-cased extension of a file name, ignoring a trailing `#fragment`.
/// Names without an extension are treated as markdown.
pub fn file_extension(name: &str) -> String {
    let name = match name.find('#') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => base[idx + 1..].to_lowercase(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// Last path component.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 0 => &path[idx + 1..],
        _ => path,
    }
}

/// Everything before the last path component; empty for the root.
pub fn file_parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 0 => &path[..idx],
        _ => "",
    }
}

pub fn hide_file_name_extensions(name: &str) -> &str {
    HIDDEN_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
}

pub fn trim_leading<'a>(text: &'a str, prefix: &str) -> &'a str {
    text.strip_prefix(prefix).unwrap_or(text)
}

/// Join URL parts with exactly one `/` between them.
///
/// A leading slash on the first part and a trailing slash on the last part
/// are kept; slashes inside a part (such as `https://`) are untouched.
pub fn join_url(parts: &[&str]) -> String {
    let parts: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        return String::new();
    };

    let leading = first.starts_with('/');
    let trailing = last.ends_with('/');
    let body = parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .join("/");

    let mut joined = String::with_capacity(body.len() + 2);
    if leading {
        joined.push('/');
    }
    joined.push_str(&body);
    if trailing && !body.is_empty() {
        joined.push('/');
    }
    joined
}
