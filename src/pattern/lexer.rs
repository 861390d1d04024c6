use unicode_xid::UnicodeXID;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Open,
    Close,
    Regexp,
    Name,
    Char,
    EscapedChar,
    OtherModifier,
    Asterisk,
    End,
    InvalidChar,
}

/// A lexical unit of a pattern string. `index` is the byte offset where the token starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenType,
    pub index: usize,
    pub value: &'a str,
}

/// Name code points follow identifier rules: XID_Start (plus `$` and `_`)
/// first, then XID_Continue (plus `$`, ZWNJ and ZWJ).
pub fn is_valid_name_code_point(ch: char, first: bool) -> bool {
    if first {
        ch == '$' || ch == '_' || ch.is_xid_start()
    } else {
        ch == '$' || ch == '\u{200C}' || ch == '\u{200D}' || ch.is_xid_continue()
    }
}

/// Splits a pattern string into tokens. Never fails: malformed input yields
/// `InvalidChar` tokens that the consumer decides how to treat.
#[tracing::instrument(level = "trace", fields(pattern_len = input.len() as u64))]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer {
        input,
        index: 0,
        tokens: Vec::with_capacity(input.len() + 1),
    };

    while let Some(ch) = lexer.code_point(lexer.index) {
        let next = lexer.index + ch.len_utf8();
        match ch {
            '*' => lexer.push(TokenType::Asterisk, lexer.index, next, next),
            '+' | '?' => lexer.push(TokenType::OtherModifier, lexer.index, next, next),
            '{' => lexer.push(TokenType::Open, lexer.index, next, next),
            '}' => lexer.push(TokenType::Close, lexer.index, next, next),
            '\\' => match lexer.code_point(next) {
                Some(escaped) => {
                    let after = next + escaped.len_utf8();
                    lexer.push(TokenType::EscapedChar, next, after, after);
                }
                None => lexer.push_invalid(next),
            },
            ':' => lexer.lex_name(next),
            '(' => lexer.lex_regexp(next),
            _ => lexer.push(TokenType::Char, lexer.index, next, next),
        }
    }

    let end = lexer.index;
    lexer.push(TokenType::End, end, end, end);
    lexer.tokens
}

struct Lexer<'a> {
    input: &'a str,
    index: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn code_point(&self, at: usize) -> Option<char> {
        self.input.get(at..).and_then(|rest| rest.chars().next())
    }

    fn is_last_code_point(&self, at: usize) -> bool {
        self.code_point(at)
            .is_some_and(|ch| at + ch.len_utf8() >= self.input.len())
    }

    fn push(&mut self, kind: TokenType, value_start: usize, value_end: usize, next: usize) {
        self.tokens.push(Token {
            kind,
            index: self.index,
            value: &self.input[value_start..value_end],
        });
        self.index = next;
    }

    fn push_invalid(&mut self, next: usize) {
        self.push(TokenType::InvalidChar, self.index, next, next);
    }

    fn lex_name(&mut self, name_start: usize) {
        let mut position = name_start;
        while let Some(ch) = self.code_point(position) {
            if !is_valid_name_code_point(ch, position == name_start) {
                break;
            }
            position += ch.len_utf8();
        }

        if position == name_start {
            self.push_invalid(name_start);
            return;
        }
        self.push(TokenType::Name, name_start, position, position);
    }

    fn lex_regexp(&mut self, regexp_start: usize) {
        let mut depth = 1usize;
        let mut position = regexp_start;

        while let Some(ch) = self.code_point(position) {
            if !ch.is_ascii() || (position == regexp_start && ch == '?') {
                self.push_invalid(regexp_start);
                return;
            }

            match ch {
                '\\' => {
                    if self.is_last_code_point(position) {
                        self.push_invalid(regexp_start);
                        return;
                    }
                    match self.code_point(position + 1) {
                        Some(escaped) if escaped.is_ascii() => {
                            position += 1 + escaped.len_utf8();
                        }
                        _ => {
                            self.push_invalid(regexp_start);
                            return;
                        }
                    }
                    continue;
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        position += 1;
                        break;
                    }
                }
                '(' => {
                    depth += 1;
                    // Only non-capturing constructs may nest.
                    if self.is_last_code_point(position) || self.code_point(position + 1) != Some('?')
                    {
                        self.push_invalid(regexp_start);
                        return;
                    }
                }
                _ => {}
            }
            position += 1;
        }

        if depth != 0 || position - regexp_start <= 1 {
            self.push_invalid(regexp_start);
            return;
        }
        self.push(TokenType::Regexp, regexp_start, position - 1, position);
    }
}
