/// Text censoring collaborator applied to opponent names
pub trait Censor: Send + Sync {
    /// Return `text` with offensive words masked
    fn censor(&self, text: &str) -> String;
}

/// Replacement for a censored word
pub const CENSOR_MASK: &str = "****";

const DEFAULT_WORDS: &[&str] = &[
    "arse", "ass", "asshole", "bastard", "bitch", "bollocks", "bullshit", "cock", "crap", "cunt",
    "damn", "dick", "dickhead", "fag", "faggot", "fuck", "fucker", "fucking", "motherfucker",
    "nigga", "nigger", "piss", "prick", "pussy", "retard", "shit", "shitty", "slut", "twat",
    "wanker", "whore",
];

/// Masks whole words found in a word list.
///
/// Matching ignores case and punctuation at either end of a word. Whitespace
/// and non-matching words are kept as they are.
#[derive(Debug, Clone)]
pub struct WordListCensor {
    words: Vec<String>,
}

impl Default for WordListCensor {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }
}

impl WordListCensor {
    /// Create a censor from a custom word list
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    fn is_listed(&self, word: &str) -> bool {
        let bare = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        !bare.is_empty() && self.words.iter().any(|w| *w == bare)
    }

    fn push_word(&self, out: &mut String, word: &str) {
        if self.is_listed(word) {
            out.push_str(CENSOR_MASK);
        } else {
            out.push_str(word);
        }
    }
}

impl Censor for WordListCensor {
    fn censor(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut word = String::new();

        for c in text.chars() {
            if c.is_whitespace() {
                self.push_word(&mut out, &word);
                word.clear();
                out.push(c);
            } else {
                word.push(c);
            }
        }
        self.push_word(&mut out, &word);

        out
    }
}
