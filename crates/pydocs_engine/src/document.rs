use std::fmt;

use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

use pydocs_logging::pydocs_error;

use crate::decode::decode_with_label;
use crate::{FailureKind, FetchError, Fetcher, PageError, TagNotFound};

const MAX_ROOT_REPR: usize = 300;
const TRUNCATED_MARKER: &str = "...[truncated]";

/// How an attribute value is compared.
#[derive(Debug, Clone, Copy)]
pub enum AttrMatch<'a> {
    Exact(&'a str),
    Pattern(&'a Regex),
}

/// One attribute constraint for [`find_tag`] and [`find_all`].
#[derive(Debug, Clone, Copy)]
pub struct AttrFilter<'a> {
    pub name: &'a str,
    pub matcher: AttrMatch<'a>,
}

impl<'a> AttrFilter<'a> {
    pub fn exact(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            matcher: AttrMatch::Exact(value),
        }
    }

    pub fn pattern(name: &'a str, pattern: &'a Regex) -> Self {
        Self {
            name,
            matcher: AttrMatch::Pattern(pattern),
        }
    }

    pub fn id(value: &'a str) -> Self {
        Self::exact("id", value)
    }

    /// Every space separated class in `value` must be present on the element.
    pub fn class(value: &'a str) -> Self {
        Self::exact("class", value)
    }

    fn matches(&self, element: ElementRef<'_>) -> bool {
        let el = element.value();
        match (self.name, self.matcher) {
            ("class", AttrMatch::Exact(wanted)) => {
                let mut wanted = wanted.split_whitespace().peekable();
                wanted.peek().is_some() && wanted.all(|class| el.classes().any(|c| c == class))
            }
            (name, AttrMatch::Exact(wanted)) => el.attr(name) == Some(wanted),
            (name, AttrMatch::Pattern(regex)) => el.attr(name).is_some_and(|v| regex.is_match(v)),
        }
    }
}

impl fmt::Display for AttrFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.matcher {
            AttrMatch::Exact(value) => write!(f, "{}={:?}", self.name, value),
            AttrMatch::Pattern(regex) => write!(f, "{}=~/{}/", self.name, regex.as_str()),
        }
    }
}

fn render_filters(attrs: &[AttrFilter<'_>]) -> String {
    let parts: Vec<String> = attrs.iter().map(ToString::to_string).collect();
    format!("{{{}}}", parts.join(", "))
}

fn is_match(element: ElementRef<'_>, tag: &str, attrs: &[AttrFilter<'_>]) -> bool {
    element.value().name().eq_ignore_ascii_case(tag) && attrs.iter().all(|f| f.matches(element))
}

/// Every descendant of `root` (not `root` itself) matching `tag` and `attrs`, in document order.
pub fn find_all<'a>(
    root: ElementRef<'a>,
    tag: &str,
    attrs: &[AttrFilter<'_>],
) -> Vec<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|element| is_match(*element, tag, attrs))
        .collect()
}

/// First descendant of `root` matching `tag` and `attrs`, depth first.
pub fn find_tag<'a>(
    root: ElementRef<'a>,
    tag: &str,
    attrs: &[AttrFilter<'_>],
) -> Result<ElementRef<'a>, TagNotFound> {
    let found = root
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| is_match(*element, tag, attrs));
    match found {
        Some(element) => Ok(element),
        None => {
            let err = TagNotFound {
                tag: tag.to_string(),
                attrs: render_filters(attrs),
                root: truncate_repr(&root.html(), MAX_ROOT_REPR),
            };
            pydocs_error!("{}", err);
            Err(err)
        }
    }
}

/// All text below `element`, concatenated in document order.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn truncate_repr(html: &str, max: usize) -> String {
    if html.len() <= max {
        return html.to_string();
    }
    let mut end = max;
    while end > 0 && !html.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{TRUNCATED_MARKER}", &html[..end])
}

/// Resolve `reference` against `base` the way a browser follows a link.
pub fn join_url(base: &str, reference: &str) -> Result<String, PageError> {
    let invalid = |err: url::ParseError| {
        PageError::Fetch(FetchError::new(
            FailureKind::InvalidUrl,
            reference,
            err.to_string(),
        ))
    };
    let base = Url::parse(base).map_err(invalid)?;
    let joined = base.join(reference.trim()).map_err(invalid)?;
    Ok(joined.into())
}

/// Fetch `url`, decode it with `encoding` and parse it as HTML.
pub async fn load_document(
    fetcher: &dyn Fetcher,
    url: &str,
    encoding: &str,
) -> Result<Html, PageError> {
    let output = fetcher.fetch(url).await?;
    let decoded = decode_with_label(&output.bytes, encoding);
    Ok(Html::parse_document(&decoded.html))
}

#[cfg(test)]
mod tests {
    use super::{join_url, truncate_repr, TRUNCATED_MARKER};

    #[test]
    fn short_repr_kept_as_is() {
        assert_eq!(truncate_repr("<p>x</p>", 300), "<p>x</p>");
    }

    #[test]
    fn long_repr_cut_on_char_boundary() {
        let html = "ж".repeat(10);
        let cut = truncate_repr(&html, 5);
        assert_eq!(cut, format!("жж{TRUNCATED_MARKER}"));
    }

    #[test]
    fn relative_links_join_onto_directory_base() {
        assert_eq!(
            join_url("https://docs.python.org/3/whatsnew/", "3.12.html").unwrap(),
            "https://docs.python.org/3/whatsnew/3.12.html"
        );
        assert_eq!(
            join_url("https://peps.python.org/", "pep-0008/").unwrap(),
            "https://peps.python.org/pep-0008/"
        );
        assert_eq!(
            join_url("https://docs.python.org/3/download.html", "archives/python-docs-pdf-a4.zip")
                .unwrap(),
            "https://docs.python.org/3/archives/python-docs-pdf-a4.zip"
        );
    }
}
