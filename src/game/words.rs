//! Candidate command words and the text clean-up applied before drawing.
//!
//! Dictionaries are plain newline-delimited word lists. Entries may carry
//! punctuation that the game fonts can't draw, so every drawn word goes
//! through [`normalize`] before it is measured against `commandlength`.

#[derive(Debug, Clone, Default)]
pub struct WordBank {
    /// Common action words. Drawn with replacement.
    pub verbs: Vec<String>,
    /// Thematic item/spell names. Each one appears at most once per menu.
    pub nouns: Vec<String>,
}

impl WordBank {
    pub const fn new(verbs: Vec<String>, nouns: Vec<String>) -> Self {
        Self { verbs, nouns }
    }

    pub fn from_text(verbs_text: &str, nouns_text: &str) -> Self {
        Self {
            verbs: parse_dictionary(verbs_text),
            nouns: parse_dictionary(nouns_text),
        }
    }

    pub fn all_words(&self) -> impl Iterator<Item = &str> {
        self.verbs
            .iter()
            .chain(self.nouns.iter())
            .map(String::as_str)
    }
}

/// Split a newline-delimited word list. The blank entry left behind by a
/// trailing newline is dropped; interior blanks are kept and get rejected
/// at draw time.
pub fn parse_dictionary(text: &str) -> Vec<String> {
    let mut words: Vec<String> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    if words.last().is_some_and(String::is_empty) {
        words.pop();
    }
    words
}

/// Strip line breaks and the punctuation the menu fonts don't carry.
/// Underscores and hyphens become spaces; periods and commas vanish.
#[inline(always)]
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '.' | ',' => None,
            '_' | '-' => Some(' '),
            other => Some(other),
        })
        .collect()
}

/// Case a single command. Blanks stay blank.
#[inline(always)]
pub fn apply_case(cmd: &str, uppercase: bool) -> String {
    if uppercase {
        return cmd.to_uppercase();
    }
    let mut chars = cmd.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn apply_casing(commands: &mut [String], uppercase: bool) {
    for cmd in commands.iter_mut().filter(|c| !c.is_empty()) {
        *cmd = apply_case(cmd, uppercase);
    }
}
