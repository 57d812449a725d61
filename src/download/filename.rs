//! Output filename resolution.

use super::{DownloadFormat, DownloadRequest};

/// Extract the filename from a `Content-Disposition` header value.
///
/// The RFC 5987 `filename*=` parameter wins over `filename=`.
pub fn parse_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for part in header.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        match key.as_str() {
            "filename*" => extended = decode_extended(value),
            "filename" => plain = Some(unquote(value).to_string()),
            _ => {}
        }
    }

    let usable = |name: String| Some(sanitize(&name)).filter(|n| !n.is_empty());
    extended.and_then(usable).or_else(|| plain.and_then(usable))
}

/// Name to save a download under.
///
/// The server name is kept for direct downloads. Converted downloads keep
/// the server stem with a `.docx` extension. Without a usable server name
/// the candidate's name (or id) is used.
pub fn resolve_filename(server_name: Option<&str>, request: &DownloadRequest) -> String {
    let server_name = server_name.map(sanitize).filter(|n| !n.is_empty());
    match server_name {
        Some(name) if request.format == DownloadFormat::Word => replace_extension(&name, "docx"),
        Some(name) => name,
        None => fallback_filename(request),
    }
}

/// `{First_Last}_resume.{ext}`, or `candidate_{id}_resume.{ext}` without a name.
pub fn fallback_filename(request: &DownloadRequest) -> String {
    let ext = request.format.extension();
    let name = request
        .candidate_name
        .as_deref()
        .map(|n| n.split_whitespace().collect::<Vec<_>>().join("_"))
        .map(|n| sanitize(&n))
        .filter(|n| !n.is_empty());

    match name {
        Some(name) => format!("{}_resume.{}", name, ext),
        None => format!("candidate_{}_resume.{}", sanitize(&request.candidate_id), ext),
    }
}

fn decode_extended(value: &str) -> Option<String> {
    // charset'language'percent-encoded
    let encoded = match value.splitn(3, '\'').collect::<Vec<_>>().as_slice() {
        [_, _, encoded] => *encoded,
        _ => value,
    };
    urlencoding::decode(unquote(encoded))
        .ok()
        .map(|s| s.into_owned())
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn replace_extension(name: &str, ext: &str) -> String {
    let stem = match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    };
    format!("{}.{}", stem, ext)
}

/// Drop path separators and control characters.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\') && !c.is_control())
        .collect();
    cleaned.trim().trim_start_matches('.').trim().to_string()
}
