use std::collections::HashMap;

/// Trait for reducing a single token to its dictionary base form.
///
/// Injected as a black-box capability; the engine never assumes anything
/// beyond "lower-cased base form out".
pub trait Lemmatizer: Send + Sync {
    /// Returns the lemma of `token`, lower-cased.
    fn lemmatize(&self, token: &str) -> String;
}

/// Dictionary-free lemmatizer: an irregular-form table plus ordered
/// suffix rules. Good enough for conversational English; replace with a
/// real morphological analyzer behind the same trait in production.
pub struct RuleBasedLemmatizer {
    irregulars: HashMap<&'static str, &'static str>,
}

/// Irregular inflections the suffix rules cannot reach, plus participial
/// adjectives that must survive lemmatization unchanged.
const IRREGULARS: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("took", "take"),
    ("taken", "take"),
    ("came", "come"),
    ("saw", "see"),
    ("seen", "see"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("taught", "teach"),
    ("caught", "catch"),
    ("felt", "feel"),
    ("kept", "keep"),
    ("left", "leave"),
    ("made", "make"),
    ("said", "say"),
    ("told", "tell"),
    ("gave", "give"),
    ("got", "get"),
    ("found", "find"),
    ("lost", "lose"),
    ("met", "meet"),
    ("paid", "pay"),
    ("sent", "send"),
    ("stood", "stand"),
    ("understood", "understand"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("people", "person"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    // Participial adjectives: base forms in their own right.
    ("interested", "interested"),
    ("excited", "excited"),
    ("worried", "worried"),
    ("tired", "tired"),
    ("bored", "bored"),
    ("scared", "scared"),
    ("surprised", "surprised"),
    ("pleased", "pleased"),
    ("disappointed", "disappointed"),
];

impl RuleBasedLemmatizer {
    /// Builds the lemmatizer with its irregular-form table.
    pub fn new() -> Self {
        Self {
            irregulars: IRREGULARS.iter().copied().collect(),
        }
    }

    /// Undoes consonant doubling left over after stripping a suffix
    /// ("runn" -> "run"), leaving legitimate doubles (ll, ss, zz) alone.
    fn undo_doubling(stem: &str) -> String {
        let chars: Vec<char> = stem.chars().collect();
        if chars.len() >= 3 {
            let last = chars[chars.len() - 1];
            let prev = chars[chars.len() - 2];
            if last == prev && last.is_ascii_alphabetic() && !matches!(last, 'l' | 's' | 'z') {
                return chars[..chars.len() - 1].iter().collect();
            }
        }
        stem.to_string()
    }

    fn strip_suffixes(word: &str) -> String {
        let len = word.len();

        // -ies / -ied -> -y  (studies -> study, tried -> try)
        if len > 4 {
            if let Some(stem) = word.strip_suffix("ies") {
                return format!("{stem}y");
            }
        }
        if len >= 5 {
            if let Some(stem) = word.strip_suffix("ied") {
                return format!("{stem}y");
            }
        }

        // -ing  (running -> run, playing -> play)
        if len > 5 {
            if let Some(stem) = word.strip_suffix("ing") {
                return Self::undo_doubling(stem);
            }
        }

        // -ed  (stopped -> stop, played -> play)
        if len > 4 {
            if let Some(stem) = word.strip_suffix("ed") {
                return Self::undo_doubling(stem);
            }
        }

        // -es after a sibilant or o  (boxes -> box, watches -> watch, goes -> go)
        if len > 3 {
            if let Some(stem) = word.strip_suffix("es") {
                if stem.ends_with('s')
                    || stem.ends_with('x')
                    || stem.ends_with('z')
                    || stem.ends_with("ch")
                    || stem.ends_with("sh")
                    || stem.ends_with('o')
                {
                    return stem.to_string();
                }
            }
        }

        // plain plural -s  (cats -> cat, friends -> friend)
        if len > 3
            && word.ends_with('s')
            && !word.ends_with("ss")
            && !word.ends_with("us")
            && !word.ends_with("is")
        {
            return word[..len - 1].to_string();
        }

        word.to_string()
    }
}

impl Default for RuleBasedLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer for RuleBasedLemmatizer {
    fn lemmatize(&self, token: &str) -> String {
        let lower = token.trim().to_lowercase();
        if let Some(base) = self.irregulars.get(lower.as_str()) {
            return (*base).to_string();
        }
        if lower.len() < 3 {
            return lower;
        }
        Self::strip_suffixes(&lower)
    }
}
