//! Offline response engine
//!
//! Maps user input to one of Susana's canned lines when no remote model is
//! available. Evaluation order is fixed: the action category first, then the
//! catalog categories in priority order (first match wins), then the generic
//! fallback. Every input, including the empty string, gets a non-empty line.

mod catalog;

#[cfg(test)]
mod proptests;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Placeholder in a response template replaced with the user's input
const INPUT_PLACEHOLDER: &str = "{input}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryName {
    Action,
    Greeting,
    Farewell,
    Identity,
    Technology,
    Time,
    Family,
    Farm,
    Food,
    Feelings,
    Place,
    Fallback,
}

/// A set of trigger phrases and the candidate lines they unlock
#[derive(Debug)]
pub struct Category {
    pub name: CategoryName,
    pub triggers: &'static [&'static str],
    pub responses: &'static [&'static str],
}

impl Category {
    fn matches(&self, normalized: &str) -> bool {
        self.triggers
            .iter()
            .any(|trigger| contains_phrase(normalized, trigger))
    }
}

/// Rule engine over a static catalog
#[derive(Debug)]
pub struct RuleEngine {
    action: &'static Category,
    categories: &'static [Category],
    fallback: &'static [&'static str],
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self {
            action: &catalog::ACTION,
            categories: catalog::CATEGORIES,
            fallback: catalog::FALLBACK,
        }
    }
}

impl RuleEngine {
    /// Which category an input falls into
    pub fn category_of(&self, input: &str) -> CategoryName {
        self.matching_category(input)
            .map_or(CategoryName::Fallback, |category| category.name)
    }

    /// Produce Susana's reply. Candidate selection uses `rng`; inject a
    /// seeded generator for reproducible output.
    pub fn classify<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> String {
        let candidates = self
            .matching_category(input)
            .map_or(self.fallback, |category| category.responses);

        let template = candidates
            .choose(rng)
            .or_else(|| self.fallback.choose(rng))
            .unwrap_or(&"¿Eh?");

        template.replace(INPUT_PLACEHOLDER, input.trim())
    }

    /// Every line the engine can produce for a category, before placeholder
    /// substitution
    #[allow(dead_code)] // Used in tests
    pub fn responses(&self, name: CategoryName) -> &'static [&'static str] {
        if name == CategoryName::Fallback {
            return self.fallback;
        }
        std::iter::once(self.action)
            .chain(self.categories)
            .find(|category| category.name == name)
            .map(|category| category.responses)
            .unwrap_or_default()
    }

    fn matching_category(&self, input: &str) -> Option<&'static Category> {
        if has_action_marker(input) {
            return Some(self.action);
        }

        let normalized = normalize(input);
        if self.action.matches(&normalized) {
            return Some(self.action);
        }
        self.categories
            .iter()
            .find(|category| category.matches(&normalized))
    }
}

/// True when the input wraps some text in `*…*`, `[…]` or `(…)`
pub fn has_action_marker(input: &str) -> bool {
    let asterisked = {
        let parts: Vec<&str> = input.split('*').collect();
        parts.len() >= 3
            && parts
                .iter()
                .skip(1)
                .take(parts.len() - 2)
                .any(|inner| !inner.trim().is_empty())
    };

    asterisked || wrapped_in(input, '[', ']') || wrapped_in(input, '(', ')')
}

fn wrapped_in(input: &str, open: char, close: char) -> bool {
    input
        .split_once(open)
        .and_then(|(_, rest)| rest.split_once(close))
        .is_some_and(|(inner, _)| !inner.trim().is_empty())
}

/// Lowercase, strip accents, turn punctuation into spaces and pad with
/// spaces so triggers can be matched as whole words
fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push(' ');
    let mut last_was_space = true;
    for c in input.to_lowercase().chars().map(fold_accent) {
        if c.is_alphanumeric() {
            out.push(c);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    if !last_was_space {
        out.push(' ');
    }
    out
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&format!(" {phrase} "))
}
