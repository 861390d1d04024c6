use regex::Regex;

use crate::canonicalize::CanonicalizeResult;
use crate::pattern::ast::{Part, PartModifier, PartType};
use crate::pattern::lexer::{Token, TokenType, tokenize};
use crate::pattern::{Options, PatternError, PatternResult};
use crate::types::FULL_WILDCARD_REGEXP;

/// Parses one component pattern into its parts. Fixed text, prefixes and
/// suffixes are passed through `encoding` so that they match canonical input.
#[tracing::instrument(level = "trace", skip(options, encoding), fields(pattern=%input))]
pub fn parse_pattern_string<F>(
    input: &str,
    options: &Options,
    encoding: F,
) -> PatternResult<Vec<Part>>
where
    F: Fn(&str) -> CanonicalizeResult<String>,
{
    let tokens = tokenize(input);
    if let Some(invalid) = tokens.iter().find(|t| t.kind == TokenType::InvalidChar) {
        return Err(PatternError::InvalidToken {
            pattern: input.to_string(),
            value: invalid.value.to_string(),
            index: invalid.index,
        });
    }

    let mut parser = PatternParser {
        pattern: input,
        tokens,
        options,
        encoding,
        segment_wildcard: options.segment_wildcard_pattern(),
        parts: Vec::new(),
        pending_fixed_value: String::new(),
        index: 0,
        next_numeric_name: 0,
    };
    parser.parse()?;
    Ok(parser.parts)
}

struct PatternParser<'a, F> {
    pattern: &'a str,
    tokens: Vec<Token<'a>>,
    options: &'a Options,
    encoding: F,
    segment_wildcard: String,
    parts: Vec<Part>,
    pending_fixed_value: String,
    index: usize,
    next_numeric_name: usize,
}

impl<'a, F> PatternParser<'a, F>
where
    F: Fn(&str) -> CanonicalizeResult<String>,
{
    fn parse(&mut self) -> PatternResult<()> {
        while self.index < self.tokens.len() {
            let char_token = self.try_consume(TokenType::Char);
            let name_token = self.try_consume(TokenType::Name);
            let regexp_or_wildcard = self.try_consume_regexp_or_wildcard(name_token.is_some());

            if name_token.is_some() || regexp_or_wildcard.is_some() {
                let mut prefix = char_token.map(|t| t.value).unwrap_or_default();
                if !prefix.is_empty() && !self.options.is_prefix(prefix) {
                    self.pending_fixed_value.push_str(prefix);
                    prefix = "";
                }
                self.maybe_add_part_from_pending_fixed_value()?;
                let modifier = self.try_consume_modifier();
                self.add_part(prefix, name_token, regexp_or_wildcard, "", modifier)?;
                continue;
            }

            let fixed = match char_token {
                Some(token) => Some(token),
                None => self.try_consume(TokenType::EscapedChar),
            };
            if let Some(fixed) = fixed {
                self.pending_fixed_value.push_str(fixed.value);
                continue;
            }

            if self.try_consume(TokenType::Open).is_some() {
                let prefix = self.consume_text();
                let name_token = self.try_consume(TokenType::Name);
                let regexp_or_wildcard = self.try_consume_regexp_or_wildcard(name_token.is_some());
                let suffix = self.consume_text();
                self.consume_required(TokenType::Close)?;
                let modifier = self.try_consume_modifier();
                self.add_part(&prefix, name_token, regexp_or_wildcard, &suffix, modifier)?;
                continue;
            }

            self.maybe_add_part_from_pending_fixed_value()?;
            self.consume_required(TokenType::End)?;
        }
        Ok(())
    }

    fn current(&self) -> Option<Token<'a>> {
        self.tokens
            .get(self.index)
            .or_else(|| self.tokens.last())
            .copied()
    }

    fn try_consume(&mut self, kind: TokenType) -> Option<Token<'a>> {
        let token = *self.tokens.get(self.index)?;
        if token.kind != kind {
            return None;
        }
        self.index += 1;
        Some(token)
    }

    fn try_consume_modifier(&mut self) -> Option<Token<'a>> {
        self.try_consume(TokenType::OtherModifier)
            .or_else(|| self.try_consume(TokenType::Asterisk))
    }

    fn try_consume_regexp_or_wildcard(&mut self, has_name: bool) -> Option<Token<'a>> {
        let token = self.try_consume(TokenType::Regexp);
        if token.is_none() && !has_name {
            return self.try_consume(TokenType::Asterisk);
        }
        token
    }

    fn consume_required(&mut self, kind: TokenType) -> PatternResult<Token<'a>> {
        if let Some(token) = self.try_consume(kind) {
            return Ok(token);
        }
        let (found, index) = self
            .current()
            .map(|t| (t.kind, t.index))
            .unwrap_or((TokenType::End, self.pattern.len()));
        Err(PatternError::UnexpectedToken {
            pattern: self.pattern.to_string(),
            expected: kind,
            found,
            index,
        })
    }

    fn consume_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(token) = self
            .try_consume(TokenType::Char)
            .or_else(|| self.try_consume(TokenType::EscapedChar))
        {
            text.push_str(token.value);
        }
        text
    }

    fn maybe_add_part_from_pending_fixed_value(&mut self) -> PatternResult<()> {
        if self.pending_fixed_value.is_empty() {
            return Ok(());
        }
        let value = std::mem::take(&mut self.pending_fixed_value);
        let encoded = (self.encoding)(&value)?;
        self.parts.push(Part::fixed_text(encoded, PartModifier::None));
        Ok(())
    }

    fn add_part(
        &mut self,
        prefix: &str,
        name_token: Option<Token<'a>>,
        regexp_or_wildcard: Option<Token<'a>>,
        suffix: &str,
        modifier_token: Option<Token<'a>>,
    ) -> PatternResult<()> {
        let modifier = PartModifier::from_modifier(modifier_token.map(|t| t.value));

        if name_token.is_none() && regexp_or_wildcard.is_none() {
            if modifier == PartModifier::None {
                self.pending_fixed_value.push_str(prefix);
                return Ok(());
            }
            // `{text}?`: the braces hold plain text only
            self.maybe_add_part_from_pending_fixed_value()?;
            if prefix.is_empty() {
                return Ok(());
            }
            let encoded = (self.encoding)(prefix)?;
            self.parts.push(Part::fixed_text(encoded, modifier));
            return Ok(());
        }

        self.maybe_add_part_from_pending_fixed_value()?;

        let regexp_value = match regexp_or_wildcard {
            None => self.segment_wildcard.clone(),
            Some(token) if token.kind == TokenType::Asterisk => FULL_WILDCARD_REGEXP.to_string(),
            Some(token) => token.value.to_string(),
        };

        let (kind, value) = if regexp_value == self.segment_wildcard {
            (PartType::SegmentWildcard, String::new())
        } else if regexp_value == FULL_WILDCARD_REGEXP {
            (PartType::FullWildcard, String::new())
        } else {
            (PartType::Regexp, regexp_value)
        };

        let name = match name_token {
            Some(token) => token.value.to_string(),
            None => {
                let name = self.next_numeric_name.to_string();
                self.next_numeric_name += 1;
                name
            }
        };

        if self.parts.iter().any(|part| part.name == name) {
            return Err(PatternError::DuplicateGroupName {
                pattern: self.pattern.to_string(),
                name,
            });
        }

        if kind == PartType::Regexp {
            self.validate_regexp(&name, &value)?;
        }

        let prefix = (self.encoding)(prefix)?;
        let suffix = (self.encoding)(suffix)?;
        self.parts.push(Part {
            kind,
            value,
            modifier,
            name,
            prefix,
            suffix,
        });
        Ok(())
    }

    fn validate_regexp(&self, name: &str, body: &str) -> PatternResult<()> {
        if declares_capturing_group(body) {
            return Err(PatternError::CapturingGroupInRegexp {
                pattern: self.pattern.to_string(),
                name: name.to_string(),
            });
        }
        let source = format!("^(?:{})$", body);
        if let Err(err) = Regex::new(&source) {
            return Err(PatternError::RegexpInvalid {
                pattern: self.pattern.to_string(),
                name: name.to_string(),
                error: err.to_string(),
            });
        }
        Ok(())
    }
}

/// Detects `(...)`, `(?<name>...)` and `(?P<name>...)` outside of character
/// classes. Lookbehind openers `(?<=` / `(?<!` are not capturing.
fn declares_capturing_group(body: &str) -> bool {
    let bytes = body.as_bytes();
    let mut in_class = false;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'[' => in_class = true,
            b']' => in_class = false,
            b'(' if !in_class => {
                let rest = &bytes[i + 1..];
                if !rest.starts_with(b"?") || rest.starts_with(b"?P<") {
                    return true;
                }
                if rest.starts_with(b"?<") && !matches!(rest.get(2), Some(b'=') | Some(b'!')) {
                    return true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}
