use crate::lemma::{Lemmatizer, RuleBasedLemmatizer};
use crate::tagger::{PartOfSpeech, PosTagger, RuleBasedTagger};
use std::sync::Arc;

/// Interrogative tokens mark a phrase as a sentence, never a collocation.
const INTERROGATIVES: &[&str] = &[
    "what", "where", "when", "why", "how", "who", "which", "whom", "whose",
];

/// POS sequences accepted as fixed collocations, matched anywhere in the
/// tagged phrase: look *at*, look *forward to*, interested *in*, reason
/// *for*, give *up*, very *good*.
const COLLOCATION_PATTERNS: &[&[PartOfSpeech]] = &[
    &[PartOfSpeech::Verb, PartOfSpeech::Adposition],
    &[PartOfSpeech::Verb, PartOfSpeech::Adverb, PartOfSpeech::Adposition],
    &[PartOfSpeech::Adjective, PartOfSpeech::Adposition],
    &[PartOfSpeech::Noun, PartOfSpeech::Adposition],
    &[PartOfSpeech::Verb, PartOfSpeech::Particle],
    &[PartOfSpeech::Adverb, PartOfSpeech::Adjective],
];

/// Canonicalizes a word or short phrase to the stable form used as the
/// storage and ranking key.
///
/// Single words are lemmatized, hyphenated compounds kept intact, short
/// fixed collocations lemmatized word-by-word, and full sentences left
/// unchanged so corrected phrasings stay grammatical.
pub struct Normalizer {
    lemmatizer: Arc<dyn Lemmatizer>,
    tagger: Arc<dyn PosTagger>,
}

impl Normalizer {
    /// Builds a normalizer over injected lemmatizer and tagger capabilities.
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>, tagger: Arc<dyn PosTagger>) -> Self {
        Self { lemmatizer, tagger }
    }

    /// Builds a normalizer over the built-in rule-based capabilities.
    pub fn rule_based() -> Self {
        Self::new(
            Arc::new(RuleBasedLemmatizer::new()),
            Arc::new(RuleBasedTagger::new()),
        )
    }

    /// Canonicalizes `input`. Idempotent: normalizing a canonical form
    /// returns it unchanged.
    pub fn normalize(&self, input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return trimmed.to_string();
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() == 1 {
            let token = tokens[0];
            // Hyphenated compounds are tracked intact, never split.
            if token.contains('-') {
                return token.to_lowercase();
            }
            if token.chars().all(char::is_alphabetic) {
                return self.lemmatizer.lemmatize(token);
            }
            return token.to_lowercase();
        }

        let tags = self.tagger.tag(&tokens);
        if Self::matches_collocation(&tokens, &tags) {
            tokens
                .iter()
                .zip(&tags)
                .map(|(token, tag)| {
                    if tag.is_content() && token.chars().all(char::is_alphabetic) {
                        self.lemmatizer.lemmatize(token)
                    } else {
                        token.to_lowercase()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            // Full sentence: any rewrite could break the grammatical
            // correctness the correction layer produced.
            trimmed.to_string()
        }
    }

    /// Whether `phrase` reads as a fixed collocation rather than a
    /// complete sentence.
    pub fn is_collocation(&self, phrase: &str) -> bool {
        let tokens: Vec<&str> = phrase.split_whitespace().collect();
        let tags = self.tagger.tag(&tokens);
        Self::matches_collocation(&tokens, &tags)
    }

    fn matches_collocation(tokens: &[&str], tags: &[PartOfSpeech]) -> bool {
        if tokens.len() < 2 || tokens.len() > 5 {
            return false;
        }
        if tokens
            .iter()
            .any(|t| INTERROGATIVES.contains(&t.to_lowercase().as_str()))
        {
            return false;
        }

        // A subject plus a verb reads as a clause, not a fixed expression.
        let has_subject = tags.contains(&PartOfSpeech::Pronoun);
        let has_verb = tags.contains(&PartOfSpeech::Verb);
        if has_subject && has_verb {
            return false;
        }

        COLLOCATION_PATTERNS
            .iter()
            .any(|pattern| contains_sequence(tags, pattern))
    }
}

fn contains_sequence(tags: &[PartOfSpeech], pattern: &[PartOfSpeech]) -> bool {
    tags.len() >= pattern.len() && tags.windows(pattern.len()).any(|window| window == pattern)
}
