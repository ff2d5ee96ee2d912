//! Word lists and text helpers shared by the classifiers.
//!
//! The lists are plain static data so they can be tuned without touching
//! classifier control flow.

use regex::Regex;

/// Words that carry no subject matter on their own.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "to", "in", "on", "at", "by", "for", "with", "from", "as", "is",
    "are", "was", "were", "be", "been", "being", "am", "and", "or", "but", "nor", "if", "then",
    "than", "so", "do", "does", "did", "can", "could", "should", "would", "will", "shall", "may",
    "might", "must", "has", "have", "had", "not", "no", "yes", "you", "your", "yours", "we",
    "our", "us", "i", "me", "my", "he", "she", "his", "her", "him", "its", "their", "there",
    "here", "about", "into", "over", "under", "between", "each", "any", "all", "both", "more",
    "most", "very", "also", "just", "only", "what", "which", "who", "whom", "whose", "when",
    "where", "why", "how", "following", "below", "above", "briefly", "please", "give", "write",
];

/// Verbs that open an instruction ("explain ...", "list ...").
pub const INSTRUCTION_VERBS: &[&str] = &[
    "define", "list", "name", "state", "identify", "recall", "label", "recognize", "explain",
    "describe", "summarize", "summarise", "discuss", "interpret", "classify", "outline",
    "illustrate", "apply", "use", "solve", "calculate", "compute", "demonstrate", "show",
    "implement", "determine", "find", "analyze", "analyse", "compare", "contrast",
    "differentiate", "distinguish", "examine", "investigate", "evaluate", "justify", "critique",
    "assess", "judge", "defend", "argue", "recommend", "design", "create", "formulate",
    "construct", "develop", "propose", "devise", "compose", "plan", "write", "give", "provide",
    "predict", "prove", "derive", "sketch", "draw", "suggest",
];

/// Words that open a question.
pub const INTERROGATIVES: &[&str] = &["what", "which", "who", "whom", "whose", "when", "where", "why", "how"];

/// Auxiliaries that open a yes/no question ("is it ...", "does the ...").
pub const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "do", "does", "did", "can", "could", "should", "would", "will",
    "has", "have", "had",
];

/// Quantifiers that leave the amount to the reader.
pub const VAGUE_QUANTIFIERS: &[&str] = &[
    "some", "many", "few", "several", "various", "numerous", "much", "certain",
];

/// Pronouns that need something earlier in the question to point at.
pub const REFERRING_PRONOUNS: &[&str] = &["it", "this", "that", "they", "them", "these", "those"];

/// Nouns that stand in for an unstated thing.
pub const VAGUE_NOUNS: &[&str] = &["things", "thing", "stuff", "etc", "something", "somehow"];

/// Words that make a stem negative.
pub const NEGATIONS: &[&str] = &["not", "never", "except", "no", "none", "cannot", "isn't", "doesn't", "don't"];

fn contains(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}

pub fn is_stopword(word: &str) -> bool {
    contains(STOPWORDS, word)
}

pub fn is_instruction_verb(word: &str) -> bool {
    contains(INSTRUCTION_VERBS, word)
}

pub fn is_interrogative(word: &str) -> bool {
    contains(INTERROGATIVES, word)
}

pub fn is_auxiliary(word: &str) -> bool {
    contains(AUXILIARIES, word)
}

pub fn is_vague_quantifier(word: &str) -> bool {
    contains(VAGUE_QUANTIFIERS, word)
}

pub fn is_referring_pronoun(word: &str) -> bool {
    contains(REFERRING_PRONOUNS, word)
}

pub fn is_vague_noun(word: &str) -> bool {
    contains(VAGUE_NOUNS, word)
}

pub fn is_negation(word: &str) -> bool {
    contains(NEGATIONS, word)
}

/// A word that can serve as a referent: alphabetic, at least three letters,
/// and not a function word, instruction verb, or vague term.
pub fn is_content_word(word: &str) -> bool {
    word.chars().count() >= 3
        && word.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'')
        && !is_stopword(word)
        && !is_instruction_verb(word)
        && !is_vague_quantifier(word)
        && !is_referring_pronoun(word)
        && !is_vague_noun(word)
}

/// Lowercase words: runs of alphanumerics, keeping inner apostrophes and
/// hyphens (`don't`, `well-known`).
pub fn words(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if (c == '\'' || c == '\u{2019}' || c == '-')
            && !current.is_empty()
            && chars.peek().is_some_and(|n| n.is_alphanumeric())
        {
            current.push(if c == '-' { '-' } else { '\'' });
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Word count as the classifiers see it.
pub fn word_count(text: &str) -> usize {
    words(text).len()
}

/// Determiners and pronouns that can open the subject of a new clause.
pub const SUBJECT_STARTERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "it", "they", "he", "she", "we", "you",
    "i", "there",
];

/// Count clauses chained onto a question with `and`/`or`: either a new
/// instruction or interrogative ("... and justify ...", "... or why ..."),
/// or a new subject with its own verb ("... and the grass is green").
///
/// A conjunction at the start of a `;`-separated part does not count, and
/// neither does a verb pair such as "compare and contrast".
pub fn chained_clause_count(text: &str) -> usize {
    let mut count = 0;
    for part in text.split(';') {
        let w = words(part);
        for i in 1..w.len().saturating_sub(1) {
            if w[i] != "and" && w[i] != "or" {
                continue;
            }
            if is_instruction_verb(&w[i - 1]) {
                continue;
            }
            let mut next = i + 1;
            if w[next] == "then" && next + 1 < w.len() {
                next += 1;
            }
            if is_instruction_verb(&w[next]) || is_interrogative(&w[next]) {
                count += 1;
            } else if SUBJECT_STARTERS.contains(&w[next].as_str())
                && w[next + 1..].iter().take(3).any(|x| is_auxiliary(x))
            {
                count += 1;
            }
        }
    }
    count
}

/// Trailing closers that may follow terminal punctuation (`?"`, `.)`).
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}', '*'];

/// Whether the text ends with `?`, `.` or `!`, ignoring trailing closers.
pub fn ends_with_terminal_punctuation(text: &str) -> bool {
    text.trim_end()
        .trim_end_matches(CLOSERS)
        .ends_with(['?', '.', '!'])
}

/// Compile a case-insensitive, whole-word alternation of cue patterns.
///
/// Each pattern is a regex fragment; multi-word cues should separate words
/// with `\s+`.
pub fn cue_regex(patterns: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = patterns.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
}

/// All distinct cue matches in `text`, lowercased, in order of first
/// appearance.
pub fn distinct_matches(re: &Regex, text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in re.find_iter(text) {
        let cue = m
            .as_str()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if !found.contains(&cue) {
            found.push(cue);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_lowercase_and_split() {
        assert_eq!(
            words("Define photosynthesis, briefly!"),
            vec!["define", "photosynthesis", "briefly"]
        );
    }

    #[test]
    fn words_keep_inner_apostrophes_and_hyphens() {
        assert_eq!(
            words("Why doesn't a well-known 'rule' apply?"),
            vec!["why", "doesn't", "a", "well-known", "rule", "apply"]
        );
        assert_eq!(words("trailing- dash"), vec!["trailing", "dash"]);
    }

    #[test]
    fn word_count_ignores_punctuation() {
        assert_eq!(word_count("  -- ? "), 0);
        assert_eq!(word_count("3.5 kg of salt"), 5);
    }

    #[test]
    fn terminal_punctuation() {
        assert!(ends_with_terminal_punctuation("What is it?"));
        assert!(ends_with_terminal_punctuation("He said \"stop.\""));
        assert!(ends_with_terminal_punctuation("(See figure 2.)  "));
        assert!(!ends_with_terminal_punctuation("List three gases"));
        assert!(!ends_with_terminal_punctuation("Answer the following:"));
    }

    #[test]
    fn chained_clauses() {
        assert_eq!(
            chained_clause_count("Evaluate the policy and justify your conclusion."),
            1
        );
        assert_eq!(
            chained_clause_count("Describe the cycle and then explain why it matters, or how it fails"),
            2
        );
        assert_eq!(chained_clause_count("Compare and contrast mitosis and meiosis."), 0);
        assert_eq!(chained_clause_count("Describe the cycle; and explain its role."), 0);
        assert_eq!(chained_clause_count("Salt and pepper"), 0);
        assert_eq!(chained_clause_count("The sky is blue and the grass is green"), 1);
        assert_eq!(
            chained_clause_count("Compare the reactions of sodium and the reactions of potassium."),
            0
        );
    }

    #[test]
    fn content_words() {
        assert!(is_content_word("photosynthesis"));
        assert!(!is_content_word("explain"));
        assert!(!is_content_word("it"));
        assert!(!is_content_word("the"));
        assert!(!is_content_word("42"));
    }

    #[test]
    fn cue_regex_is_whole_word_and_case_insensitive() {
        let re = cue_regex(&["list", r"what\s+is"]).unwrap();
        assert_eq!(
            distinct_matches(&re, "LIST the parts. What  is a listing? list again"),
            vec!["list", "what is"]
        );
        assert!(distinct_matches(&re, "enlisted").is_empty());
    }

    #[test]
    fn cue_regex_rejects_malformed_patterns() {
        assert!(cue_regex(&["list", "(unclosed"]).is_err());
    }

    #[test]
    fn word_lists_are_lowercase() {
        for list in [
            STOPWORDS,
            INSTRUCTION_VERBS,
            INTERROGATIVES,
            AUXILIARIES,
            VAGUE_QUANTIFIERS,
            REFERRING_PRONOUNS,
            VAGUE_NOUNS,
            NEGATIONS,
        ] {
            for word in list {
                assert_eq!(*word, word.to_lowercase());
            }
        }
    }
}
