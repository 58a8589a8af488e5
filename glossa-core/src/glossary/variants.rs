//! Variant generation
//!
//! Expands one glossary term into the textual forms searched for in documents. The
//! rules are tried in order and the first match wins:
//!
//! 1. `ACRONYM (Full Form)`: the acronym (two or more uppercase letters) and the full form
//! 2. `Anything (Alternate)`: the base and the alternate form
//! 3. anything else: the term itself
//!
//! The original term is always the first variant. A form containing hyphens also gets
//! a spaced copy. Nested parentheses are not supported and fall through to rule 3.

use once_cell::sync::Lazy;
use regex::Regex;

static ACRONYM_FORM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{2,})\s*\(([^()]+)\)$").unwrap());

static ALTERNATE_FORM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*\(([^()]+)\)$").unwrap());

static ACRONYM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2,}$").unwrap());

/// Ordered, de-duplicated search forms for one term. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
    variants: Vec<String>,
}

impl VariantSet {
    fn push(&mut self, variant: &str) {
        let variant = variant.trim();
        if !variant.is_empty() && !self.variants.iter().any(|v| v == variant) {
            self.variants.push(variant.to_string());
        }
    }

    fn push_with_spaced(&mut self, variant: &str) {
        self.push(variant);
        if variant.contains('-') {
            self.push(&variant.replace('-', " "));
        }
    }

    pub fn original(&self) -> &str {
        &self.variants[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }

    /// The acronym form, when rule 1 applied or the term itself is an acronym.
    pub fn acronym(&self) -> Option<&str> {
        self.iter().find(|v| is_acronym(v))
    }
}

/// True for two or more uppercase ASCII letters and nothing else.
pub fn is_acronym(text: &str) -> bool {
    ACRONYM_REGEX.is_match(text)
}

/// Expand a term into its variants.
pub fn generate(term: &str) -> VariantSet {
    let mut set = VariantSet {
        variants: vec![term.trim().to_string()],
    };

    if let Some(caps) = ACRONYM_FORM_REGEX.captures(term.trim()) {
        set.push(&caps[1]);
        set.push_with_spaced(&caps[2]);
    } else if let Some(caps) = ALTERNATE_FORM_REGEX.captures(term.trim()) {
        set.push(&caps[1]);
        set.push_with_spaced(&caps[2]);
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn variants(term: &str) -> Vec<String> {
        generate(term).iter().map(String::from).collect()
    }

    #[test]
    fn acronym_with_full_form() {
        assert_eq!(
            variants("POC (Proof of Concept)"),
            vec!["POC (Proof of Concept)", "POC", "Proof of Concept"]
        );
        assert_eq!(generate("POC (Proof of Concept)").acronym(), Some("POC"));
    }

    #[test]
    fn hyphenated_full_form_gets_spaced_copy() {
        assert_eq!(
            variants("CI (Continuous-Integration)"),
            vec![
                "CI (Continuous-Integration)",
                "CI",
                "Continuous-Integration",
                "Continuous Integration"
            ]
        );
    }

    #[test]
    fn general_alternate_form() {
        assert_eq!(
            variants("Verbale (Minutes)"),
            vec!["Verbale (Minutes)", "Verbale", "Minutes"]
        );
        assert_eq!(
            variants("Capitolato d'appalto (Call-for-tender)"),
            vec![
                "Capitolato d'appalto (Call-for-tender)",
                "Capitolato d'appalto",
                "Call-for-tender",
                "Call for tender"
            ]
        );
    }

    #[rstest]
    #[case("Backlog")]
    #[case("Way of Working")]
    #[case("A (b (c))")]
    fn plain_terms_are_kept_alone(#[case] term: &str) {
        assert_eq!(variants(term), vec![term]);
    }

    #[test]
    fn single_capital_is_not_an_acronym() {
        let set = generate("X (Twitter)");
        assert_eq!(set.acronym(), None);
        assert!(set.contains("X"));
        assert!(set.contains("Twitter"));
    }

    #[test]
    fn plain_acronym_is_detected() {
        assert_eq!(generate("API").acronym(), Some("API"));
        assert_eq!(generate("API").len(), 1);
    }
}
