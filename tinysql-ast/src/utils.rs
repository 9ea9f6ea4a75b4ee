use std::fmt;

/// Formats an iterator of `Display`-able items separated by `sep`, the way
/// the teacher's `display_separated`/`display_comma_separated` helpers do.
pub(crate) fn display_separated<'a, T: fmt::Display + 'a>(
    items: impl IntoIterator<Item = &'a T>,
    sep: &str,
) -> String {
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(&item.to_string());
    }
    out
}

pub(crate) fn display_comma_separated<'a, T: fmt::Display + 'a>(
    items: impl IntoIterator<Item = &'a T>,
) -> String {
    display_separated(items, ", ")
}
