//! Query classifier. Maps free text to a template key.
//!
//! Classification is an ordered list of rules; the first rule whose
//! conditions all hold picks the key, and when none holds the default key
//! is used. There is no "no match" outcome.
//!
//! A rule condition is a [`KeywordSet`]: it holds when the lower-cased query
//! contains any of its terms as a substring.

use mockrag_config::RuleConfig;
use mockrag_core::template::{CART_OPERATION, DEFAULT_KEY, MULTI_STEP_QUERY};
use serde::Serialize;

const CART_TERMS: &[&str] = &["cart", "add", "shopping"];
const RESERVATION_TERMS: &[&str] = &["warehouse", "reservation", "reserve"];

fn keywords(terms: &[&str]) -> KeywordSet {
    KeywordSet::new(terms.iter().copied())
}

/// Any-of term list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(|t| t.into().to_lowercase()).collect(),
        }
    }

    /// `normalized` must already be lower-cased.
    pub fn matches(&self, normalized: &str) -> bool {
        self.terms.iter().any(|term| normalized.contains(term.as_str()))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub name: String,
    pub key: String,
    pub conditions: Vec<KeywordSet>,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        conditions: Vec<KeywordSet>,
    ) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            conditions,
        }
    }

    /// True when every condition holds. `normalized` must be lower-cased.
    pub fn matches(&self, normalized: &str) -> bool {
        self.conditions.iter().all(|c| c.matches(normalized))
    }
}

impl From<&RuleConfig> for Rule {
    fn from(cfg: &RuleConfig) -> Self {
        Self::new(
            cfg.name.clone(),
            cfg.key.clone(),
            cfg.all.iter().map(KeywordSet::new).collect(),
        )
    }
}

/// Outcome of classifying one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Selected template key, never empty.
    pub key: String,
    /// Name of the rule that fired, `None` for the default branch.
    pub rule: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QueryClassifier {
    rules: Vec<Rule>,
    default_key: String,
}

impl QueryClassifier {
    pub fn new(rules: Vec<Rule>, default_key: impl Into<String>) -> Self {
        Self {
            rules,
            default_key: default_key.into(),
        }
    }

    /// The production chain:
    /// cart term + reservation term → `multi_step_query`,
    /// cart term → `cart_operation`,
    /// otherwise `product_query`.
    pub fn builtin() -> Self {
        Self::new(
            vec![
                Rule::new(
                    "multi_step",
                    MULTI_STEP_QUERY,
                    vec![keywords(CART_TERMS), keywords(RESERVATION_TERMS)],
                ),
                Rule::new("cart", CART_OPERATION, vec![keywords(CART_TERMS)]),
            ],
            DEFAULT_KEY,
        )
    }

    /// Configured rules when there are any, the built-in chain otherwise.
    pub fn from_config(rules: &[RuleConfig], default_key: &str) -> Self {
        if rules.is_empty() {
            let mut classifier = Self::builtin();
            classifier.default_key = default_key.to_string();
            return classifier;
        }
        Self::new(rules.iter().map(Rule::from).collect(), default_key)
    }

    pub fn classify(&self, query: &str) -> Classification {
        let normalized = query.to_lowercase();
        match self.rules.iter().find(|rule| rule.matches(&normalized)) {
            Some(rule) => Classification {
                key: rule.key.clone(),
                rule: Some(rule.name.clone()),
            },
            None => Classification {
                key: self.default_key.clone(),
                rule: None,
            },
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}
