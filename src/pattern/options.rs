use regex::escape;

/// Per-component compilation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub delimiter: Option<char>,
    pub prefix: Option<char>,
    pub ignore_case: bool,
}

impl Options {
    pub fn hostname() -> Self {
        Self {
            delimiter: Some('.'),
            ..Default::default()
        }
    }

    pub fn pathname() -> Self {
        Self {
            delimiter: Some('/'),
            prefix: Some('/'),
            ..Default::default()
        }
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn is_prefix(&self, value: &str) -> bool {
        let mut chars = value.chars();
        match (self.prefix, chars.next(), chars.next()) {
            (Some(prefix), Some(ch), None) => prefix == ch,
            _ => false,
        }
    }

    /// Segment wildcard as written in pattern syntax: `[^<delimiter>]+?`,
    /// or `[^]+?` when there is no delimiter.
    pub fn segment_wildcard_pattern(&self) -> String {
        match self.delimiter {
            Some(delimiter) => format!("[^{}]+?", escape(&delimiter.to_string())),
            None => String::from("[^]+?"),
        }
    }

    /// Segment wildcard as handed to the regex engine, which has no empty
    /// negated class.
    pub fn segment_wildcard_regexp(&self) -> String {
        match self.delimiter {
            Some(_) => self.segment_wildcard_pattern(),
            None => String::from(".+?"),
        }
    }
}
