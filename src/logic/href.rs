use crate::logic::links::LinkResolver;
use crate::model::{Location, WikiLinkContext};

/// Links starting with these are external or already in-app and never rewritten.
pub const EXCLUDED_ADJUSTMENT_PREFIXES: &[&str] = &["http://", "https://", "#"];

/// Folder the current location is relative to: a trailing file name (a last
/// segment containing a `.`) is dropped, so links inside `docs/readme.md`
/// resolve against `docs`.
pub fn folder_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 0 && path[idx + 1..].contains('.') => &path[..idx],
        _ => path,
    }
}

/// Rewrite a hyperlink found in rendered content into an in-app `#` link.
///
/// `file_extension` is appended (with its dot) to the resolved target.
/// Returns `None` for links that must be left untouched.
pub fn adjust_href(
    resolver: &LinkResolver,
    ctx: &WikiLinkContext,
    location: &Location,
    href: &str,
    file_extension: Option<&str>,
) -> Option<String> {
    let extension = file_extension
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let folder = folder_path(&location.path);

    if href.starts_with("../") {
        let parts: Vec<&str> = href.split('/').collect();
        let parents = parts.iter().take_while(|p| **p == "..").count();
        let folder_parts: Vec<&str> = folder.split('/').collect();
        let keep = folder_parts.len().saturating_sub(parents);

        return Some(format!(
            "#{}/{}{}{}",
            folder_parts[..keep].join("/"),
            parts[parents..].join("/"),
            extension,
            location.hash_suffix()
        ));
    }

    if href.starts_with('/') {
        let page = format!("{}{}", href, extension);
        return Some(resolver.branch_link(ctx, &page, location, None));
    }

    if EXCLUDED_ADJUSTMENT_PREFIXES
        .iter()
        .any(|prefix| href.starts_with(prefix))
    {
        return None;
    }

    Some(format!(
        "#{}/{}{}{}",
        folder,
        href,
        extension,
        location.hash_suffix()
    ))
}
