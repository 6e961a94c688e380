//! Template Expansion
//!
//! Expands `{variable|filter:argument}` placeholders in a resolved message.
//!
//! # Grammar
//!
//! - `{` opens a placeholder and the next `}` closes it. There is no
//!   nesting and no escaping.
//! - The expression splits once on the first `|` into the variable and the
//!   filter part, and the filter part splits once on the first `:` into the
//!   filter name and its raw argument. Anything after those splits,
//!   including further `|` or `:`, belongs to the argument.
//! - Variables match named arguments case-insensitively.
//!
//! Scanning resumes after each inserted replacement, so braces produced by
//! a filter or carried in an argument's value are never expanded again.

use crate::{Args, FilterFn, FilterRegistry, Result, TranslateError};
use std::fmt;
use tracing::warn;

/// A parsed placeholder expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub variable: &'a str,
    pub filter: Option<&'a str>,
    pub argument: Option<&'a str>,
}

impl<'a> Placeholder<'a> {
    /// Split the text between the braces.
    pub fn parse(expression: &'a str) -> Self {
        match expression.split_once('|') {
            Some((variable, rest)) => match rest.split_once(':') {
                Some((filter, argument)) => Self {
                    variable,
                    filter: Some(filter),
                    argument: Some(argument),
                },
                None => Self {
                    variable,
                    filter: Some(rest),
                    argument: None,
                },
            },
            None => Self {
                variable: expression,
                filter: None,
                argument: None,
            },
        }
    }
}

/// Non-fatal problem found while expanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No named argument matches the placeholder's variable; it expands
    /// to the empty string and its filter is not run.
    MissingVariable { variable: String },
    /// The placeholder names a filter that is not registered; the value is
    /// substituted unfiltered.
    UnknownFilter {
        filter: String,
        argument: Option<String>,
    },
    /// The filter ran but produced no replacement; nothing is substituted.
    EmptyFilterResult { filter: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingVariable { variable } => {
                write!(f, "{} has no associated data to be formatted with", variable)
            }
            Diagnostic::UnknownFilter { filter, .. } => {
                write!(f, "\"{}\" specified but no filter by that name exists", filter)
            }
            Diagnostic::EmptyFilterResult { filter } => {
                write!(f, "filter \"{}\" produced no replacement", filter)
            }
        }
    }
}

/// A fully expanded message and the warnings raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    /// An expansion that needed no substitution.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Check if any warnings were raised.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Expand a template against a filter registry.
pub fn expand(template: &str, args: &Args, filters: &FilterRegistry) -> Result<Expansion> {
    expand_with(template, args, |name| filters.get(name))
}

/// Expand a template, looking filters up through `find_filter`.
///
/// `find_filter` is called once per filtered placeholder and its result is
/// invoked after it returns, so a lookup that takes a lock does not hold it
/// while the filter runs.
pub fn expand_with<F>(template: &str, args: &Args, find_filter: F) -> Result<Expansion>
where
    F: Fn(&str) -> Option<FilterFn>,
{
    let mut text = template.to_string();
    let mut diagnostics = Vec::new();
    let mut cursor = text.find('{');

    while let Some(start) = cursor {
        let Some(offset) = text[start..].find('}') else {
            return Err(TranslateError::UnterminatedPlaceholder {
                column: text[..start].chars().count(),
            });
        };
        let end = start + offset;

        let placeholder = Placeholder::parse(&text[start + 1..end]);
        let replacement = render(placeholder, args, &find_filter, &mut diagnostics);

        text.replace_range(start..=end, &replacement);

        let resume = start + replacement.len();
        cursor = text[resume..].find('{').map(|i| resume + i);
    }

    Ok(Expansion { text, diagnostics })
}

fn render<F>(
    placeholder: Placeholder<'_>,
    args: &Args,
    find_filter: &F,
    diagnostics: &mut Vec<Diagnostic>,
) -> String
where
    F: Fn(&str) -> Option<FilterFn>,
{
    let value = match args.resolve(placeholder.variable) {
        Some(value) => value,
        None => {
            warn!(
                variable = placeholder.variable,
                "Placeholder variable has no associated data"
            );
            diagnostics.push(Diagnostic::MissingVariable {
                variable: placeholder.variable.to_string(),
            });
            return String::new();
        }
    };

    let Some(name) = placeholder.filter else {
        return value.to_string();
    };

    let Some(filter) = find_filter(name) else {
        warn!(filter = name, argument = ?placeholder.argument, "Unknown filter, substituting value as is");
        diagnostics.push(Diagnostic::UnknownFilter {
            filter: name.to_string(),
            argument: placeholder.argument.map(str::to_string),
        });
        return value.to_string();
    };

    match filter(value, placeholder.argument) {
        Some(text) => text,
        None => {
            warn!(filter = name, kind = value.kind(), "Filter produced no replacement");
            diagnostics.push(Diagnostic::EmptyFilterResult {
                filter: name.to_string(),
            });
            String::new()
        }
    }
}
