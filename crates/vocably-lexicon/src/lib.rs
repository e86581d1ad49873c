//! Lexical normalization for the Vocably learning engine.
//!
//! Canonicalizes surface word forms into the stable keys the rest of the
//! engine stores and ranks: lemmatization of single words, collocation
//! detection for short multi-word expressions, inflected-variant matching
//! inside conversation text, and meaningful-word extraction.
//!
//! # Main types
//!
//! - [`Normalizer`] — Canonicalizes a word or short phrase to a lookup key.
//! - [`Lemmatizer`] — Trait for reducing a token to its dictionary base form.
//! - [`PosTagger`] — Trait for part-of-speech tagging a token sequence.
//! - [`RuleBasedLemmatizer`] / [`RuleBasedTagger`] — Dictionary-free default
//!   implementations; deployments may inject real NLP models behind the
//!   same traits.

/// Lemmatizer trait and rule-based default implementation.
pub mod lemma;
/// Surface normalization and collocation classification.
pub mod normalize;
/// Text scanning: variant matching, word extraction, CJK detection.
pub mod scan;
/// Part-of-speech tagging trait and rule-based default implementation.
pub mod tagger;

pub use lemma::{Lemmatizer, RuleBasedLemmatizer};
pub use normalize::Normalizer;
pub use scan::{extract_words, find_variant, has_cjk};
pub use tagger::{PartOfSpeech, PosTagger, RuleBasedTagger};
