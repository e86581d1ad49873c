/// Coarse part-of-speech classes, enough to separate the content words
/// the normalizer lemmatizes from the function words it keeps verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    /// Verbs, including auxiliaries and copulas.
    Verb,
    /// Nouns (the open-class default).
    Noun,
    /// Adjectives.
    Adjective,
    /// Adverbs.
    Adverb,
    /// Prepositions and postpositions.
    Adposition,
    /// Phrasal-verb particles (give *up*, put *on*).
    Particle,
    /// Personal pronouns.
    Pronoun,
    /// Articles and possessive determiners.
    Determiner,
    /// Anything unclassifiable (numbers, symbols).
    Other,
}

impl PartOfSpeech {
    /// Content words get lemmatized; function words are kept verbatim.
    pub fn is_content(self) -> bool {
        matches!(
            self,
            Self::Verb | Self::Noun | Self::Adjective | Self::Adverb
        )
    }
}

/// Trait for part-of-speech tagging a token sequence.
///
/// Injected as a black-box capability, one tag per input token.
pub trait PosTagger: Send + Sync {
    /// Tags each token in `tokens`, preserving order and length.
    fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech>;
}

const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "of", "to", "for", "with", "from", "about", "into", "over", "under",
    "after", "before", "between", "against", "during", "through", "without", "within",
    "toward", "towards", "upon", "across", "behind", "beyond", "among", "along", "around",
    "near",
];

const PARTICLES: &[&str] = &["up", "down", "out", "off", "away", "back"];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "its", "our",
    "their",
];

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "have",
    "has", "had", "will", "would", "can", "could", "shall", "should", "may", "might", "must",
];

const COMMON_VERBS: &[&str] = &[
    "look", "depend", "give", "take", "put", "get", "go", "come", "make", "turn", "bring",
    "carry", "pick", "run", "listen", "wait", "rely", "believe", "belong", "agree", "insist",
    "succeed", "think", "talk", "speak", "work", "live", "move", "keep", "hold", "find",
];

const COMMON_ADJECTIVES: &[&str] = &[
    "interested", "afraid", "good", "nice", "happy", "proud", "famous", "full", "fond",
    "capable", "responsible", "similar", "different", "angry", "worried", "excited", "tired",
    "keen", "aware", "bad", "late", "early", "free",
];

const DEGREE_ADVERBS: &[&str] = &[
    "very", "quite", "too", "so", "really", "rather", "extremely", "fairly", "pretty",
    "forward",
];

/// Closed-class word lists plus suffix heuristics; open class defaults to
/// noun. Replace with a statistical tagger behind the same trait when a
/// deployment needs real syntax.
pub struct RuleBasedTagger;

impl RuleBasedTagger {
    /// Builds the tagger.
    pub fn new() -> Self {
        Self
    }

    fn tag_one(token: &str) -> PartOfSpeech {
        let lower = token.to_lowercase();
        let word = lower.as_str();

        if !word.chars().any(|c| c.is_alphabetic()) {
            return PartOfSpeech::Other;
        }
        if ADPOSITIONS.contains(&word) {
            return PartOfSpeech::Adposition;
        }
        if PARTICLES.contains(&word) {
            return PartOfSpeech::Particle;
        }
        if PRONOUNS.contains(&word) {
            return PartOfSpeech::Pronoun;
        }
        if DETERMINERS.contains(&word) {
            return PartOfSpeech::Determiner;
        }
        if AUXILIARIES.contains(&word) || COMMON_VERBS.contains(&word) {
            return PartOfSpeech::Verb;
        }
        if COMMON_ADJECTIVES.contains(&word) {
            return PartOfSpeech::Adjective;
        }
        if DEGREE_ADVERBS.contains(&word) || word.ends_with("ly") {
            return PartOfSpeech::Adverb;
        }
        if word.ends_with("ing") || word.ends_with("ed") {
            return PartOfSpeech::Verb;
        }
        if word.ends_with("ous")
            || word.ends_with("ful")
            || word.ends_with("ive")
            || word.ends_with("able")
            || word.ends_with("ible")
        {
            return PartOfSpeech::Adjective;
        }
        PartOfSpeech::Noun
    }
}

impl Default for RuleBasedTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl PosTagger for RuleBasedTagger {
    fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech> {
        tokens.iter().map(|t| Self::tag_one(t)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn tags(phrase: &str) -> Vec<PartOfSpeech> {
        let tokens: Vec<&str> = phrase.split_whitespace().collect();
        RuleBasedTagger::new().tag(&tokens)
    }

    #[test]
    fn test_phrasal_verb() {
        assert_eq!(tags("give up"), vec![PartOfSpeech::Verb, PartOfSpeech::Particle]);
    }

    #[test]
    fn test_verb_preposition() {
        assert_eq!(
            tags("depend on"),
            vec![PartOfSpeech::Verb, PartOfSpeech::Adposition]
        );
    }

    #[test]
    fn test_adjective_preposition() {
        assert_eq!(
            tags("interested in"),
            vec![PartOfSpeech::Adjective, PartOfSpeech::Adposition]
        );
    }

    #[test]
    fn test_pronoun_and_auxiliary() {
        assert_eq!(
            tags("I am happy"),
            vec![
                PartOfSpeech::Pronoun,
                PartOfSpeech::Verb,
                PartOfSpeech::Adjective
            ]
        );
    }

    #[test]
    fn test_suffix_heuristics() {
        assert_eq!(tags("quickly")[0], PartOfSpeech::Adverb);
        assert_eq!(tags("looking")[0], PartOfSpeech::Verb);
        assert_eq!(tags("famous")[0], PartOfSpeech::Adjective);
    }

    #[test]
    fn test_open_class_defaults_to_noun() {
        assert_eq!(tags("reason")[0], PartOfSpeech::Noun);
        assert_eq!(tags("solution")[0], PartOfSpeech::Noun);
    }

    #[test]
    fn test_non_alphabetic_is_other() {
        assert_eq!(tags("42")[0], PartOfSpeech::Other);
    }

    #[test]
    fn test_content_classes() {
        assert!(PartOfSpeech::Verb.is_content());
        assert!(PartOfSpeech::Noun.is_content());
        assert!(!PartOfSpeech::Adposition.is_content());
        assert!(!PartOfSpeech::Pronoun.is_content());
    }
}
