use url::Url;

/// Parse `text` as an activatable link.
///
/// A link needs a non-empty scheme and a non-empty host, so `ftp://x`
/// qualifies while `mailto:me@example.com` or `example.com` do not. The
/// returned URL is what gets opened: no scheme is rewritten or forced.
pub fn link_target(text: &str) -> Option<Url> {
    let url = Url::parse(text.trim()).ok()?;
    let has_host = url.host_str().map_or(false, |host| !host.is_empty());
    if url.scheme().is_empty() || !has_host {
        log::trace!("{:?} has no host, not a link", text);
        return None;
    }
    Some(url)
}

pub fn is_valid_link(text: &str) -> bool {
    link_target(text).is_some()
}
