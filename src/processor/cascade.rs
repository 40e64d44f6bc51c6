use scraper::{ElementRef, Selector};
use tracing::warn;

/// An ordered list of CSS selectors, compiled once.
///
/// Patterns that fail to parse stay in the list as permanent non-matches so
/// a single bad selector never breaks the rest of the cascade.
#[derive(Debug, Clone)]
pub struct Locator {
    entries: Vec<(String, Option<Selector>)>,
}

impl Locator {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let entries = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                let compiled = match Selector::parse(pattern) {
                    Ok(selector) => Some(selector),
                    Err(e) => {
                        warn!("❌ Invalid selector '{}' will never match: {:?}", pattern, e);
                        None
                    }
                };
                (pattern.to_string(), compiled)
            })
            .collect();

        Self { entries }
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(pattern, _)| pattern.as_str())
    }

    /// Usable selectors paired with their source pattern, in priority order
    pub fn selectors(&self) -> impl Iterator<Item = (&str, &Selector)> {
        self.entries
            .iter()
            .filter_map(|(pattern, compiled)| compiled.as_ref().map(|s| (pattern.as_str(), s)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Return the first non-empty value the locator yields inside `scope`.
///
/// With `attribute`, the first matching element's attribute is read;
/// otherwise its visible text. Values are trimmed, and an empty value counts
/// as no match so the cascade moves on to the next selector.
pub fn first_match(scope: ElementRef<'_>, locator: &Locator, attribute: Option<&str>) -> Option<String> {
    for (_, selector) in locator.selectors() {
        let Some(element) = scope.select(selector).next() else {
            continue;
        };

        let value = match attribute {
            Some(name) => element.value().attr(name).map(|v| v.trim().to_string()),
            None => Some(visible_text(element)),
        };

        if let Some(value) = value.filter(|v| !v.is_empty()) {
            return Some(value);
        }
    }
    None
}

/// Text nodes trimmed individually and concatenated, blanks dropped
pub fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}
