//! Placeholder filters
//!
//! A filter turns a placeholder's value into text, optionally steered by the
//! raw argument written after `:` in the template. Returning `None` means
//! the filter produced no replacement, which is distinct from producing an
//! empty string.

use crate::Value;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature shared by every filter.
pub type FilterFn = Arc<dyn Fn(&Value, Option<&str>) -> Option<String> + Send + Sync>;

/// Pattern used by `datetime` when the template gives none.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Name-keyed collection of filters.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterFn>,
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.filters.keys().collect();
        names.sort();
        f.debug_struct("FilterRegistry")
            .field("filters", &names)
            .finish()
    }
}

impl FilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.add("pluralize", pluralize);
        registry.add("yesno", yesno);
        registry.add("datetime", datetime);
        registry.add("cut", cut);
        registry.add("empty_if_false", empty_if_false);
        registry.add("empty_if_true", empty_if_true);
        registry.add("default_if_none", default_if_none);
        registry.add("lower", lower);
        registry.add("upper", upper);
        registry.add("title", title);
        registry.add("join", join);
        registry
    }

    /// Register a filter, replacing any filter with the same name.
    pub fn add<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Value, Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    /// Remove a filter. Returns `true` if it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        self.filters.remove(name).is_some()
    }

    /// Check if a filter is registered.
    pub fn exists(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Get a filter by name.
    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).cloned()
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if no filters are registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

// ============================================================================
// Built-in Filters
// ============================================================================

/// `{n|pluralize:item,items}` picks the singular when the count is exactly 1.
///
/// A bare argument is the plural suffix with an empty singular; no argument
/// means `s`.
pub fn pluralize(value: &Value, arg: Option<&str>) -> Option<String> {
    let arg = arg.unwrap_or_default();
    let (singular, plural) = match arg.split_once(',') {
        Some((singular, plural)) => (singular, plural),
        None if arg.is_empty() => ("", "s"),
        None => ("", arg),
    };

    let count = value.as_integer()?;
    Some(if count == 1 { singular } else { plural }.to_string())
}

/// `{flag|yesno:off,on}` picks a label by truthiness.
///
/// Without an argument the labels are `no`/`yes`. An argument without a
/// comma has no labels to choose from and produces nothing.
pub fn yesno(value: &Value, arg: Option<&str>) -> Option<String> {
    let arg = arg.unwrap_or_default();
    if arg.is_empty() {
        return Some(if value.is_truthy() { "yes" } else { "no" }.to_string());
    }
    if !arg.contains(',') {
        return None;
    }

    arg.split(',')
        .nth(usize::from(value.is_truthy()))
        .map(str::to_string)
}

/// `{when|datetime:%d/%m/%Y}` formats dates, date-times and UTC epoch
/// timestamps. Other values, including NaN and infinite floats, pass
/// through as text.
pub fn datetime(value: &Value, arg: Option<&str>) -> Option<String> {
    let pattern = match arg {
        Some(p) if !p.is_empty() => p,
        _ => DEFAULT_DATETIME_FORMAT,
    };

    let moment: NaiveDateTime = match value {
        Value::Temporal(t) => t.to_datetime(),
        Value::Integer(secs) => DateTime::from_timestamp(*secs, 0)?.naive_utc(),
        Value::Float(secs) if secs.is_finite() => {
            DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)?.naive_utc()
        }
        other => return Some(other.to_string()),
    };

    let items = strftime_items(pattern)?;
    Some(moment.format_with_items(items.iter()).to_string())
}

/// Parse a strftime pattern up front; chrono panics when rendering a
/// malformed one.
fn strftime_items(pattern: &str) -> Option<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    Some(items)
}

/// `{text|cut: }` removes every occurrence of the argument.
pub fn cut(value: &Value, arg: Option<&str>) -> Option<String> {
    let text = value.to_string();
    Some(match arg {
        Some(needle) if !needle.is_empty() => text.replace(needle, ""),
        _ => text,
    })
}

/// Empty when the value is falsy, otherwise the argument.
pub fn empty_if_false(value: &Value, arg: Option<&str>) -> Option<String> {
    Some(if value.is_truthy() {
        arg.unwrap_or_default().to_string()
    } else {
        String::new()
    })
}

/// Empty when the value is truthy, otherwise the argument.
pub fn empty_if_true(value: &Value, arg: Option<&str>) -> Option<String> {
    Some(if value.is_truthy() {
        String::new()
    } else {
        arg.unwrap_or_default().to_string()
    })
}

/// The argument when the value is absent, otherwise the value.
pub fn default_if_none(value: &Value, arg: Option<&str>) -> Option<String> {
    Some(if value.is_absent() {
        arg.unwrap_or_default().to_string()
    } else {
        value.to_string()
    })
}

/// Lowercases the value's text.
pub fn lower(value: &Value, _arg: Option<&str>) -> Option<String> {
    Some(value.to_string().to_lowercase())
}

/// Uppercases the value's text.
pub fn upper(value: &Value, _arg: Option<&str>) -> Option<String> {
    Some(value.to_string().to_uppercase())
}

/// Capitalizes each space-separated word and lowercases the rest of it.
pub fn title(value: &Value, _arg: Option<&str>) -> Option<String> {
    let words: Vec<String> = value.to_string().split(' ').map(capitalize).collect();
    Some(words.join(" "))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Joins a sequence with the argument as separator. Text is joined
/// character by character.
pub fn join(value: &Value, arg: Option<&str>) -> Option<String> {
    let separator = arg.unwrap_or_default();
    Some(match value {
        Value::Sequence(items) => items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator),
        Value::Text(text) => text
            .chars()
            .map(String::from)
            .collect::<Vec<_>>()
            .join(separator),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_pluralize() {
        let arg = Some("apple,apples");
        assert_eq!(pluralize(&Value::from(1), arg).as_deref(), Some("apple"));
        assert_eq!(pluralize(&Value::from(2), arg).as_deref(), Some("apples"));
        assert_eq!(pluralize(&Value::from(0), arg).as_deref(), Some("apples"));
    }

    #[test]
    fn test_pluralize_suffix() {
        assert_eq!(pluralize(&Value::from(1), None).as_deref(), Some(""));
        assert_eq!(pluralize(&Value::from(3), None).as_deref(), Some("s"));
        assert_eq!(pluralize(&Value::from(3), Some("es")).as_deref(), Some("es"));
        assert_eq!(pluralize(&Value::from("1"), Some("es")).as_deref(), Some(""));
        assert_eq!(pluralize(&Value::from("many"), None), None);
    }

    #[test]
    fn test_yesno() {
        assert_eq!(yesno(&Value::from(true), None).as_deref(), Some("yes"));
        assert_eq!(yesno(&Value::from(0), None).as_deref(), Some("no"));
        assert_eq!(yesno(&Value::from(1), Some("off,on")).as_deref(), Some("on"));
        assert_eq!(yesno(&Value::from(false), Some("off,on")).as_deref(), Some("off"));
        assert_eq!(yesno(&Value::from(true), Some("on")), None);
    }

    #[test]
    fn test_datetime() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            datetime(&Value::from(date), Some("%d/%m/%Y")).as_deref(),
            Some("09/03/2024")
        );

        let dt = date.and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(datetime(&Value::from(dt), Some("%H:%M")).as_deref(), Some("14:30"));
        assert_eq!(
            datetime(&Value::from(dt), None).as_deref(),
            Some("2024-03-09 14:30:00")
        );
    }

    #[test]
    fn test_datetime_epoch() {
        assert_eq!(
            datetime(&Value::from(0), Some("%Y-%m-%d")).as_deref(),
            Some("1970-01-01")
        );
        assert_eq!(
            datetime(&Value::from(86_400.5), Some("%Y-%m-%d %H:%M:%S")).as_deref(),
            Some("1970-01-02 00:00:00")
        );
    }

    #[test]
    fn test_datetime_passthrough_and_bad_pattern() {
        assert_eq!(
            datetime(&Value::from("soon"), Some("%Y")).as_deref(),
            Some("soon")
        );
        assert_eq!(datetime(&Value::from(0), Some("%Q")), None);
    }

    #[test]
    fn test_datetime_non_finite_float() {
        assert_eq!(
            datetime(&Value::from(f64::NAN), Some("%Y")).as_deref(),
            Some("NaN")
        );
        assert_eq!(
            datetime(&Value::from(f64::INFINITY), Some("%Y")).as_deref(),
            Some("inf")
        );
    }

    #[test]
    fn test_cut() {
        assert_eq!(cut(&Value::from("a b c"), Some(" ")).as_deref(), Some("abc"));
        assert_eq!(cut(&Value::from(1001), Some("0")).as_deref(), Some("11"));
        assert_eq!(cut(&Value::from("abc"), None).as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_if() {
        assert_eq!(empty_if_false(&Value::from(0), Some("x")).as_deref(), Some(""));
        assert_eq!(empty_if_false(&Value::from(1), Some("x")).as_deref(), Some("x"));
        assert_eq!(empty_if_true(&Value::from(1), Some("x")).as_deref(), Some(""));
        assert_eq!(empty_if_true(&Value::from(""), Some("x")).as_deref(), Some("x"));
    }

    #[test]
    fn test_default_if_none() {
        assert_eq!(
            default_if_none(&Value::Absent, Some("n/a")).as_deref(),
            Some("n/a")
        );
        assert_eq!(
            default_if_none(&Value::from(""), Some("n/a")).as_deref(),
            Some("")
        );
        assert_eq!(default_if_none(&Value::from(5), Some("n/a")).as_deref(), Some("5"));
    }

    #[test]
    fn test_case_filters() {
        assert_eq!(upper(&Value::from("ana"), None).as_deref(), Some("ANA"));
        assert_eq!(lower(&Value::from("ANA"), None).as_deref(), Some("ana"));
        assert_eq!(
            title(&Value::from("hELLO  wide world"), None).as_deref(),
            Some("Hello  Wide World")
        );
    }

    #[test]
    fn test_join() {
        let list = Value::from(vec!["red", "green", "blue"]);
        assert_eq!(join(&list, Some(" / ")).as_deref(), Some("red / green / blue"));
        assert_eq!(join(&Value::from("abc"), Some("-")).as_deref(), Some("a-b-c"));
        assert_eq!(join(&Value::from(7), Some("-")).as_deref(), Some("7"));
    }

    #[test]
    fn test_registry_crud() {
        let mut registry = FilterRegistry::with_builtins();
        assert!(registry.exists("pluralize"));
        assert_eq!(registry.len(), 11);

        registry.add("shout", |v: &Value, _: Option<&str>| Some(format!("{}!", v)));
        let shout = registry.get("shout").unwrap();
        assert_eq!(shout(&Value::from("hey"), None).as_deref(), Some("hey!"));

        assert!(registry.remove("shout"));
        assert!(!registry.remove("shout"));
        assert!(!registry.exists("shout"));
    }
}
