use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

use super::element_text;

static BG_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"background-image\s*:\s*url\(([^)]*)\)").expect("Invalid background-image regex")
});

static LI_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("li").expect("Invalid li selector"));

/// Raw class attribute of an element, empty when absent.
pub fn class_attr<'a>(el: ElementRef<'a>) -> &'a str {
    el.value().attr("class").unwrap_or("")
}

pub fn has_class_substr(el: ElementRef, needle: &str) -> bool {
    class_attr(el).contains(needle)
}

/// Nearest ancestor with the given tag whose class attribute contains
/// `needle`. Used to walk from a name heading up to its card container.
pub fn ancestor_with_class<'a>(
    el: ElementRef<'a>,
    tag: &str,
    needle: &str,
) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == tag && has_class_substr(*a, needle))
}

/// Nearest ancestor with the given tag, regardless of class.
pub fn ancestor_tag<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == tag)
}

/// First descendant of `scope` (excluding `scope` itself) with the given
/// tag whose class attribute contains every needle. First in document
/// order wins.
pub fn descendant_with_classes<'a>(
    scope: ElementRef<'a>,
    tag: &str,
    needles: &[&str],
) -> Option<ElementRef<'a>> {
    let scope_id = scope.id();
    for node in scope.descendants() {
        if node.id() == scope_id {
            continue;
        }
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() == tag && needles.iter().all(|n| has_class_substr(el, n)) {
                return Some(el);
            }
        }
    }
    None
}

/// All elements of `scope` that come after `after`'s subtree in document
/// order. This is the "nearest following node" search space for
/// heading-anchored fields.
pub fn following_elements<'a>(
    scope: ElementRef<'a>,
    after: ElementRef<'a>,
) -> Vec<ElementRef<'a>> {
    let after_id = after.id();
    let mut out = Vec::new();
    let mut seen = false;
    for node in scope.descendants() {
        if node.id() == after_id {
            seen = true;
            continue;
        }
        if !seen || node.ancestors().any(|a| a.id() == after_id) {
            continue;
        }
        if let Some(el) = ElementRef::wrap(node) {
            out.push(el);
        }
    }
    out
}

/// Nearest element of the given tag following `after` within `scope`.
pub fn next_of_tag<'a>(
    scope: ElementRef<'a>,
    after: ElementRef<'a>,
    tag: &str,
) -> Option<ElementRef<'a>> {
    following_elements(scope, after)
        .into_iter()
        .find(|el| el.value().name() == tag)
}

/// First following sibling element with the given tag.
pub fn next_sibling_tag<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|s| s.value().name() == tag)
}

/// First descendant heading of the given tag whose text matches. With
/// `exact` false a substring match suffices.
pub fn find_heading<'a>(
    scope: ElementRef<'a>,
    tag: &str,
    text: &str,
    exact: bool,
) -> Option<ElementRef<'a>> {
    let scope_id = scope.id();
    for node in scope.descendants() {
        if node.id() == scope_id {
            continue;
        }
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() != tag {
                continue;
            }
            let heading = element_text(el);
            if (exact && heading == text) || (!exact && heading.contains(text)) {
                return Some(el);
            }
        }
    }
    None
}

/// Texts of the list items under the nearest `<ul>` following an `<h3>`
/// with the given text. A missing heading or list yields an empty Vec,
/// never an error.
pub fn list_after_heading(scope: ElementRef, heading: &str, exact: bool) -> Vec<String> {
    let mut items = Vec::new();
    if let Some(h) = find_heading(scope, "h3", heading, exact) {
        if let Some(list) = next_of_tag(scope, h, "ul") {
            for li in list.select(&LI_SELECTOR) {
                items.push(element_text(li));
            }
        }
    }
    items
}

/// Text of the nearest `<p>` following an `<h3>` with the given text.
pub fn text_after_heading(scope: ElementRef, heading: &str, exact: bool) -> String {
    if let Some(h) = find_heading(scope, "h3", heading, exact) {
        if let Some(p) = next_of_tag(scope, h, "p") {
            return element_text(p);
        }
    }
    String::new()
}

/// URL inside the first inline `background-image:url(...)` style on a div.
/// The URL is taken verbatim; a single leading slash is rewritten against
/// the site base.
pub fn background_image_url(scope: ElementRef, base_url: &str) -> String {
    for node in scope.descendants() {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() != "div" {
                continue;
            }
            if let Some(style) = el.value().attr("style") {
                if let Some(caps) = BG_IMAGE_RE.captures(style) {
                    return absolutize(base_url, &caps[1]);
                }
            }
        }
    }
    String::new()
}

/// Comma-separated tags following a bold label like "Proficiency:". The
/// label's parent holds the whole line; the label prefix is stripped off.
pub fn labeled_tag_list(scope: ElementRef, label: &str) -> Vec<String> {
    let mut tags = Vec::new();
    if let Some(strong) = find_heading(scope, "strong", label, true) {
        if let Some(parent) = strong.parent().and_then(ElementRef::wrap) {
            let line = element_text(parent).replacen(label, "", 1);
            for part in line.split(',') {
                let part = part.trim();
                if !part.is_empty() {
                    tags.push(part.to_string());
                }
            }
        }
    }
    tags
}

/// Rewrite a root-relative path against the site base; anything else
/// (absolute, protocol-relative, data URI) passes through verbatim.
pub fn absolutize(base_url: &str, path: &str) -> String {
    if path.starts_with('/') && !path.starts_with("//") {
        if let Ok(base) = Url::parse(base_url) {
            if let Ok(joined) = base.join(path) {
                return joined.to_string();
            }
        }
        return format!("{}{}", base_url, path);
    }
    path.to_string()
}
