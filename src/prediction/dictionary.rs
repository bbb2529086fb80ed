//! Offline word list and the anagram-style filter used when the remote
//! predictor is unavailable.

/// Care vocabulary first, then general high-frequency English.
const DEFAULT_WORDS: &[&str] = &[
    // care
    "yes", "no", "help", "pain", "water", "nurse", "doctor", "cold", "hot", "tired", "sleep",
    "bed", "toilet", "hungry", "thirsty", "family", "hurt", "itch", "light", "dark", "turn",
    "move", "stop", "wait", "thanks", "please", "sorry", "okay", "call", "breathe", "medicine",
    "blanket", "pillow", "sick", "head", "back", "leg", "arm", "chest", "hand", "home", "love",
    // common
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now", "old",
    "see", "two", "way", "who", "boy", "did", "let", "put", "say", "she", "too", "use", "that",
    "with", "have", "this", "will", "your", "from", "they", "know", "want", "been", "good",
    "much", "some", "time", "very", "when", "come", "here", "just", "like", "long", "make",
    "many", "over", "such", "take", "than", "them", "well", "were", "about", "could", "other",
    "after", "first", "never", "think", "found", "great", "house", "large", "might", "place",
    "right", "small", "sound", "still", "their", "there", "these", "thing", "three", "where",
    "which", "world", "would", "write", "years", "young", "before", "called", "coming",
    "enough", "little", "looked", "number", "people", "really", "should", "through", "turned",
    "almost", "another", "because", "between", "country", "different", "doesnt", "during",
    "however", "nothing", "question", "something", "together", "without", "american",
    "anything", "around", "beautiful", "believe", "building", "business", "children",
    "company", "continue", "control", "decided", "develop", "education", "everyone",
    "example", "experience", "feeling", "finally", "following", "friends", "government",
    "happened", "himself", "history", "important", "including", "information", "interest",
    "language", "learned", "machine", "material", "medical", "meeting", "million", "morning",
    "movement", "natural", "outside", "perhaps", "personal", "physical", "picture",
    "possible", "present", "private", "problem", "program", "project", "provide", "quickly",
    "reading", "receive", "remember", "require", "science", "several", "special", "started",
    "student", "support", "surface", "system", "technology", "themselves",
    "thought", "tonight", "training", "understand", "usually", "various", "waiting",
    "walking", "whether", "working", "writing",
];

/// Multiset of available letters, one slot per ASCII letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LetterCounts([u8; 26]);

impl LetterCounts {
    /// Non-letters are ignored; case is folded.
    pub fn from_letters<I: IntoIterator<Item = char>>(letters: I) -> Self {
        let mut counts = [0u8; 26];
        for c in letters {
            if let Some(i) = slot(c) {
                counts[i] = counts[i].saturating_add(1);
            }
        }
        Self(counts)
    }

    /// True if every letter of `word` can be drawn from the multiset, each
    /// occurrence consuming one available letter.
    pub fn can_form(&self, word: &str) -> bool {
        let mut remaining = self.0;
        for c in word.chars() {
            let Some(i) = slot(c) else {
                return false;
            };
            if remaining[i] == 0 {
                return false;
            }
            remaining[i] -= 1;
        }
        true
    }
}

fn slot(c: char) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    c.is_ascii_lowercase().then(|| (c as u8 - b'a') as usize)
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    words: Vec<String>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }
}

impl Dictionary {
    /// Words are lowercased and deduplicated, first occurrence wins.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = std::collections::HashSet::new();
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && seen.insert(w.clone()))
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words of length `2..=letters.len()` formable from the letters,
    /// longest first, then alphabetical, at most `limit`.
    pub fn candidates(&self, letters: &[char], limit: usize) -> Vec<String> {
        let max_len = letters.len();
        if max_len < 2 || limit == 0 {
            return Vec::new();
        }

        let available = LetterCounts::from_letters(letters.iter().copied());
        let mut matches: Vec<&String> = self
            .words
            .iter()
            .filter(|w| {
                let len = w.chars().count();
                (2..=max_len).contains(&len)
            })
            .filter(|w| available.can_form(w))
            .collect();

        matches.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        matches.into_iter().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_help_is_found() {
        let dict = Dictionary::default();
        let words = dict.candidates(&chars("help"), 5);
        assert_eq!(words.first().map(String::as_str), Some("help"));
    }

    #[test]
    fn test_no_match_is_empty() {
        let dict = Dictionary::default();
        assert!(dict.candidates(&chars("xzq"), 5).is_empty());
    }

    #[test]
    fn test_letters_are_not_reused() {
        let counts = LetterCounts::from_letters(chars("hel"));
        assert!(counts.can_form("he"));
        assert!(!counts.can_form("hell"));
        let counts = LetterCounts::from_letters(chars("hell"));
        assert!(counts.can_form("hell"));
    }

    #[test]
    fn test_order_is_irrelevant() {
        let dict = Dictionary::default();
        assert_eq!(
            dict.candidates(&chars("pleh"), 5),
            dict.candidates(&chars("help"), 5)
        );
    }

    #[test]
    fn test_ranking_length_then_alpha() {
        let dict = Dictionary::new(["at", "tea", "eat", "ate", "a", "seat"]);
        let words = dict.candidates(&chars("taes"), 10);
        assert_eq!(words, vec!["seat", "ate", "eat", "tea", "at"]);
    }

    #[test]
    fn test_limit_and_min_length() {
        let dict = Dictionary::new(["at", "tea", "eat", "ate", "seat"]);
        assert_eq!(dict.candidates(&chars("taes"), 2), vec!["seat", "ate"]);
        assert!(dict.candidates(&chars("a"), 5).is_empty());
    }

    #[test]
    fn test_non_letters_never_match() {
        let dict = Dictionary::new(["doesn't", "ok"]);
        assert_eq!(dict.candidates(&chars("doesntko"), 5), vec!["ok"]);
    }

    #[test]
    fn test_default_dictionary_is_deduplicated() {
        let dict = Dictionary::default();
        let mut words = dict.words.clone();
        words.sort();
        words.dedup();
        assert_eq!(words.len(), dict.len());
    }
}
