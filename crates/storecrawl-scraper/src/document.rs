//! Thin layer over `scraper` so the rest of the crate never touches the
//! parse tree directly.

use scraper::{Html, Selector};

/// Compiles a selector known at build time.
///
/// # Panics
///
/// Panics if `css` is not a valid selector; callers only pass literals.
pub(crate) fn css(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

pub(crate) fn parse(body: &str) -> Html {
    Html::parse_document(body)
}

/// Values of `attr` on every element matching `selector`, in document order.
/// Elements without the attribute are skipped.
pub(crate) fn select_attr<'a>(
    doc: &'a Html,
    selector: &'a Selector,
    attr: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    doc.select(selector).filter_map(move |el| el.value().attr(attr))
}
