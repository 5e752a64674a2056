//! Named extraction rules.
//!
//! Each field group keeps an ordered list of rules.  We try them in order,
//! and the first rule whose pattern matches anywhere in the text decides the
//! field.  If that rule's match can't be turned into a value, the field is
//! absent: we don't fall through to later rules, because a later rule
//! picking up a different token would make the result depend on how badly
//! the earlier one was garbled.

use log::trace;
use regex::{Captures, Regex};
use std::fmt;

/// A single named pattern used to pull a field out of normalized overlay
/// text.
pub struct Rule {
    name: &'static str,
    pattern: Regex,
}

impl Rule {
    /// Create a new rule.
    pub fn new(name: &'static str, pattern: Regex) -> Rule {
        Rule { name, pattern }
    }

    /// The name of this rule, for logging and tests.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The regular expression used by this rule.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Find the first rule in `rules` which matches `text`, returning the rule
/// and the leftmost match.
pub fn first_captures<'r, 't>(
    rules: &'r [Rule],
    text: &'t str,
) -> Option<(&'r Rule, Captures<'t>)> {
    rules
        .iter()
        .find_map(|rule| rule.pattern.captures(text).map(|caps| (rule, caps)))
}

/// Run `rules` against `text` and convert the winning match using `parse`.
pub fn first_value<T, F>(rules: &[Rule], text: &str, parse: F) -> Option<T>
where
    F: FnOnce(&Captures) -> Option<T>,
{
    let (rule, caps) = first_captures(rules, text)?;
    let value = parse(&caps);
    match value {
        Some(_) => trace!("rule {} matched {:?}", rule.name, &caps[0]),
        None => trace!("rule {} matched {:?} but it did not parse", rule.name, &caps[0]),
    }
    value
}

#[cfg(test)]
fn test_rules() -> Vec<Rule> {
    vec![
        Rule::new("word", Regex::new(r"\b([A-Z]+)\b").unwrap()),
        Rule::new("number", Regex::new(r"\b([0-9]+)\b").unwrap()),
    ]
}

#[test]
fn earlier_rules_win_even_when_later_rules_match_first() {
    let rules = test_rules();
    let (rule, caps) = first_captures(&rules, "42 ABC").unwrap();
    assert_eq!(rule.name(), "word");
    assert_eq!(&caps[1], "ABC");
}

#[test]
fn later_rules_are_used_when_earlier_rules_miss() {
    let rules = test_rules();
    let (rule, caps) = first_captures(&rules, "42 17").unwrap();
    assert_eq!(rule.name(), "number");
    assert_eq!(&caps[1], "42");
    assert!(first_captures(&rules, "...").is_none());
}

#[test]
fn failed_parse_does_not_fall_through() {
    let rules = test_rules();
    let value: Option<u32> = first_value(&rules, "ABC 42", |caps| caps[1].parse().ok());
    assert_eq!(value, None);
}
