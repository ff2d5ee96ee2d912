//! Question segmentation.
//!
//! Splits normalized text into [`Question`]s. Rules:
//!
//! - a line starting with an ordinal marker (`1.`, `2)`, `b)`, `Q3:`,
//!   `(4)`) opens a new question and the marker is stripped;
//! - a line without a marker continues the previous question when that
//!   question has not ended with terminal punctuation;
//! - a blank line closes the current question;
//! - ordinals are assigned by final position, 1-based and contiguous.

use crate::error::AnalysisError;
use crate::lexicon::ends_with_terminal_punctuation;
use crate::model::{Ordinal, Question, SourceSpan};

/// A question being assembled from one or more lines.
struct Pending {
    text: String,
    start_line: usize,
    end_line: usize,
    /// Closed by a blank line; nothing more may be appended.
    closed: bool,
}

impl Pending {
    fn open(text: &str, line: usize) -> Self {
        Self {
            text: text.to_string(),
            start_line: line,
            end_line: line,
            closed: false,
        }
    }

    fn accepts_continuation(&self) -> bool {
        !self.closed && (self.text.is_empty() || !ends_with_terminal_punctuation(&self.text))
    }

    fn append(&mut self, text: &str, line: usize) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
        self.end_line = line;
    }
}

/// Split normalized text into questions.
pub fn segment(text: &str) -> Result<Vec<Question>, AnalysisError> {
    let mut pending: Vec<Pending> = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            if let Some(last) = pending.last_mut() {
                last.closed = true;
            }
            continue;
        }

        match strip_ordinal_marker(line) {
            Some(rest) => pending.push(Pending::open(rest.trim(), line_no)),
            None => match pending.last_mut() {
                Some(last) if last.accepts_continuation() => last.append(line, line_no),
                _ => pending.push(Pending::open(line, line_no)),
            },
        }
    }

    let questions: Vec<Question> = pending
        .into_iter()
        .filter(|p| !p.text.is_empty())
        .enumerate()
        .map(|(i, p)| Question {
            ordinal: (i + 1) as Ordinal,
            text: p.text,
            source_span: Some(SourceSpan {
                start_line: p.start_line,
                end_line: p.end_line,
            }),
        })
        .collect();

    if questions.is_empty() {
        return Err(AnalysisError::NoQuestionsFound);
    }

    tracing::debug!(questions = questions.len(), "segmented document");
    Ok(questions)
}

/// If `line` starts with an ordinal marker, return the text after it.
///
/// Recognized: an optional `(`, an optional `Q`/`Question` prefix before a
/// number, then 1-4 digits or a single ASCII letter, then one of `.`, `)`,
/// `-`, `:`. A numeric marker must not be followed by another digit (`3.5 kg`
/// is text, and so is `10 - 4` after a dash); a letter marker must be followed by whitespace (`U.S. history`
/// is text).
pub fn strip_ordinal_marker(line: &str) -> Option<&str> {
    let mut rest = line.strip_prefix('(').unwrap_or(line).trim_start();

    let mut has_prefix = false;
    for prefix in ["question", "q"] {
        if rest.len() > prefix.len()
            && rest.is_char_boundary(prefix.len())
            && rest[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            let after = rest[prefix.len()..].trim_start();
            if after.starts_with(|c: char| c.is_ascii_digit()) {
                rest = after;
                has_prefix = true;
                break;
            }
        }
    }

    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    let (numeric, after_token) = if (1..=4).contains(&digits) {
        (true, &rest[digits..])
    } else if digits == 0 && !has_prefix {
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => (false, chars.as_str()),
            _ => return None,
        }
    } else {
        return None;
    };

    let after_token = if numeric {
        after_token.trim_start()
    } else {
        after_token
    };
    let mut chars = after_token.chars();
    let separator = match chars.next() {
        Some(c @ ('.' | ')' | '-' | ':')) => c,
        _ => return None,
    };
    let body = chars.as_str();

    if numeric {
        // "10 - 4" is arithmetic, so a dash marker needs a non-numeric body.
        let checked = if separator == '-' { body.trim_start() } else { body };
        if checked.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
    } else if !body.is_empty() && !body.starts_with(char::is_whitespace) {
        return None;
    }

    Some(body.trim_start_matches(')').trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(questions: &[Question]) -> Vec<&str> {
        questions.iter().map(|q| q.text.as_str()).collect()
    }

    #[test]
    fn strips_common_markers() {
        assert_eq!(strip_ordinal_marker("1. Define osmosis."), Some("Define osmosis."));
        assert_eq!(strip_ordinal_marker("12) Explain."), Some("Explain."));
        assert_eq!(strip_ordinal_marker("3 - Name it."), Some("Name it."));
        assert_eq!(strip_ordinal_marker("b) Compare."), Some("Compare."));
        assert_eq!(strip_ordinal_marker("(4) State."), Some("State."));
        assert_eq!(strip_ordinal_marker("(c) List."), Some("List."));
        assert_eq!(strip_ordinal_marker("Q5: Solve."), Some("Solve."));
        assert_eq!(strip_ordinal_marker("Question 6. Design."), Some("Design."));
        assert_eq!(strip_ordinal_marker("7.What is heat?"), Some("What is heat?"));
        assert_eq!(strip_ordinal_marker("8."), Some(""));
    }

    #[test]
    fn leaves_non_markers_alone() {
        assert_eq!(strip_ordinal_marker("3.5 kg of salt is added."), None);
        assert_eq!(strip_ordinal_marker("U.S. history is long."), None);
        assert_eq!(strip_ordinal_marker("Define osmosis."), None);
        assert_eq!(strip_ordinal_marker("A cell is small."), None);
        assert_eq!(strip_ordinal_marker("12345. Too long."), None);
        assert_eq!(strip_ordinal_marker("Quantum effects matter."), None);
        assert_eq!(strip_ordinal_marker("e.g. this one"), None);
        assert_eq!(strip_ordinal_marker("10 - 4 equals how many?"), None);
        assert_eq!(strip_ordinal_marker("7-3 is what?"), None);
    }

    #[test]
    fn arithmetic_line_keeps_its_leading_number() {
        let qs = segment("10 - 4 equals how many?
").unwrap();
        assert_eq!(texts(&qs), vec!["10 - 4 equals how many?"]);

        let qs = segment("1. 25 students sit a test. How many pass?
").unwrap();
        assert_eq!(texts(&qs), vec!["25 students sit a test. How many pass?"]);
    }

    #[test]
    fn numbered_questions() {
        let qs = segment("1. Define photosynthesis.\n2. Explain respiration.\n").unwrap();
        assert_eq!(texts(&qs), vec!["Define photosynthesis.", "Explain respiration."]);
        assert_eq!(qs[0].ordinal, 1);
        assert_eq!(qs[1].ordinal, 2);
    }

    #[test]
    fn wrapped_lines_merge_into_previous_question() {
        let text = "1. Describe the main stages of the\nwater cycle and their order.\n2. Name a gas.";
        let qs = segment(text).unwrap();
        assert_eq!(
            texts(&qs),
            vec![
                "Describe the main stages of the water cycle and their order.",
                "Name a gas."
            ]
        );
        assert_eq!(
            qs[0].source_span,
            Some(SourceSpan {
                start_line: 1,
                end_line: 2
            })
        );
    }

    #[test]
    fn punctuated_lines_without_markers_are_separate() {
        let qs = segment("What is mass?\nWhat is weight?\nExplain the difference.").unwrap();
        assert_eq!(qs.len(), 3);
    }

    #[test]
    fn blank_lines_are_dropped_and_close_questions() {
        let qs = segment("\n\nList three metals\n\n\nName two gases\n\n").unwrap();
        assert_eq!(texts(&qs), vec!["List three metals", "Name two gases"]);
    }

    #[test]
    fn single_unbroken_paragraph_is_one_question() {
        let text = "\n\n   Discuss how the industrial revolution changed\nurban life in Europe\nduring the nineteenth century\n\n";
        let qs = segment(text).unwrap();
        assert_eq!(qs.len(), 1);
        assert_eq!(
            qs[0].text,
            "Discuss how the industrial revolution changed urban life in Europe during the nineteenth century"
        );
    }

    #[test]
    fn marker_only_line_takes_following_text() {
        let qs = segment("1.\nWhat is a prime\nnumber?\n2. Define a factor.").unwrap();
        assert_eq!(texts(&qs), vec!["What is a prime number?", "Define a factor."]);
        assert_eq!(qs[0].source_span.unwrap().start_line, 1);
    }

    #[test]
    fn empty_markers_are_dropped_and_ordinals_stay_contiguous() {
        let qs = segment("1.\n\n2. Define mass.\n3)\n\n4. Define force.").unwrap();
        let ordinals: Vec<Ordinal> = qs.iter().map(|q| q.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2]);
        assert_eq!(texts(&qs), vec!["Define mass.", "Define force."]);
    }

    #[test]
    fn only_markers_is_no_questions() {
        assert_eq!(segment("1.\n2)\n\n"), Err(AnalysisError::NoQuestionsFound));
        assert_eq!(segment("   \n\n"), Err(AnalysisError::NoQuestionsFound));
    }

    #[test]
    fn ordinals_are_contiguous_for_many_questions() {
        let text: String = (1..=250)
            .map(|i| format!("{i}. Question number {i}?\n"))
            .collect();
        let qs = segment(&text).unwrap();
        assert_eq!(qs.len(), 250);
        for (i, q) in qs.iter().enumerate() {
            assert_eq!(q.ordinal as usize, i + 1);
        }
    }
}
