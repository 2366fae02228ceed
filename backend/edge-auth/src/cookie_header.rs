/// Find `name` in a `Cookie` header value (`a=1; b=2`)
///
/// Pairs without `=` are skipped. The first match wins.
pub fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}

/// Join several `Cookie` header values the way a single header would carry them
pub fn join_cookie_headers<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut values = values.into_iter().peekable();
    values.peek()?;
    Some(values.collect::<Vec<_>>().join("; "))
}
