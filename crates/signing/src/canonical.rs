use std::collections::BTreeMap;

/// Build the canonical form of a parameter set: the exact text that gets
/// signed.
///
/// Keys are sorted byte-wise (no locale), entries with an empty key or value
/// are dropped, and the rest are joined as `key=value` pairs separated by
/// `&`. When a key repeats, its last value wins.
pub fn canonicalize<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let sorted: BTreeMap<&str, &str> = params.into_iter().collect();

    let mut out = String::new();
    for (key, value) in sorted {
        if key.is_empty() || value.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}
