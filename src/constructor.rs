use crate::canonicalize::canonicalize_protocol;
use crate::component::CompiledComponent;
use crate::errors::UrlPatternResult;
use crate::init::UrlPatternInit;
use crate::pattern::{Options, Token, TokenType, tokenize};
use crate::types::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Protocol,
    Authority,
    Username,
    Password,
    Hostname,
    Port,
    Pathname,
    Search,
    Hash,
    Done,
}

impl State {
    fn component(self) -> Option<Component> {
        match self {
            State::Protocol => Some(Component::Protocol),
            State::Username => Some(Component::Username),
            State::Password => Some(Component::Password),
            State::Hostname => Some(Component::Hostname),
            State::Port => Some(Component::Port),
            State::Pathname => Some(Component::Pathname),
            State::Search => Some(Component::Search),
            State::Hash => Some(Component::Hash),
            State::Init | State::Authority | State::Done => None,
        }
    }
}

/// Splits a pattern string such as `https://*.example.com/:path*` into
/// per-component pattern strings.
#[tracing::instrument(level = "trace", fields(pattern = %input))]
pub(crate) fn parse_constructor_string(input: &str) -> UrlPatternResult<UrlPatternInit> {
    let mut parser = ConstructorParser {
        input,
        tokens: tokenize(input),
        result: UrlPatternInit::default(),
        component_start: 0,
        token_index: 0,
        token_increment: 1,
        group_depth: 0,
        ipv6_bracket_depth: 0,
        protocol_matches_special_scheme: false,
        state: State::Init,
    };
    parser.run()?;
    Ok(parser.result)
}

struct ConstructorParser<'a> {
    input: &'a str,
    tokens: Vec<Token<'a>>,
    result: UrlPatternInit,
    component_start: usize,
    token_index: usize,
    token_increment: usize,
    group_depth: usize,
    ipv6_bracket_depth: usize,
    protocol_matches_special_scheme: bool,
    state: State,
}

impl<'a> ConstructorParser<'a> {
    fn run(&mut self) -> UrlPatternResult<()> {
        while self.token_index < self.tokens.len() {
            self.token_increment = 1;
            let token = self.tokens[self.token_index];

            if token.kind == TokenType::End {
                match self.state {
                    State::Init => {
                        self.rewind();
                        if self.is_hash_prefix() {
                            self.change_state(State::Hash, 1);
                        } else if self.is_search_prefix() {
                            self.change_state(State::Search, 1);
                        } else {
                            self.change_state(State::Pathname, 0);
                        }
                        self.token_index += self.token_increment;
                        continue;
                    }
                    State::Authority => {
                        self.rewind_and_set_state(State::Hostname);
                        self.token_index += self.token_increment;
                        continue;
                    }
                    _ => {
                        self.change_state(State::Done, 0);
                        break;
                    }
                }
            }

            if token.kind == TokenType::Open {
                self.group_depth += 1;
                self.token_index += self.token_increment;
                continue;
            }

            if self.group_depth > 0 {
                if token.kind == TokenType::Close {
                    self.group_depth -= 1;
                } else {
                    self.token_index += self.token_increment;
                    continue;
                }
            }

            match self.state {
                State::Init => {
                    if self.is_protocol_suffix() {
                        self.rewind_and_set_state(State::Protocol);
                    }
                }
                State::Protocol => {
                    if self.is_protocol_suffix() {
                        self.compute_protocol_matches_special_scheme()?;
                        if self.next_is_authority_slashes() {
                            self.change_state(State::Authority, 3);
                        } else if self.protocol_matches_special_scheme {
                            self.change_state(State::Authority, 1);
                        } else {
                            self.change_state(State::Pathname, 1);
                        }
                    }
                }
                State::Authority => {
                    if self.is_identity_terminator() {
                        self.rewind_and_set_state(State::Username);
                    } else if self.is_pathname_start()
                        || self.is_search_prefix()
                        || self.is_hash_prefix()
                    {
                        self.rewind_and_set_state(State::Hostname);
                    }
                }
                State::Username => {
                    if self.is_password_prefix() {
                        self.change_state(State::Password, 1);
                    } else if self.is_identity_terminator() {
                        self.change_state(State::Hostname, 1);
                    }
                }
                State::Password => {
                    if self.is_identity_terminator() {
                        self.change_state(State::Hostname, 1);
                    }
                }
                State::Hostname => {
                    if self.is_ipv6_open() {
                        self.ipv6_bracket_depth += 1;
                    } else if self.is_ipv6_close() {
                        self.ipv6_bracket_depth = self.ipv6_bracket_depth.saturating_sub(1);
                    } else if self.is_port_prefix() && self.ipv6_bracket_depth == 0 {
                        self.change_state(State::Port, 1);
                    } else if self.is_pathname_start() {
                        self.change_state(State::Pathname, 0);
                    } else if self.is_search_prefix() {
                        self.change_state(State::Search, 1);
                    } else if self.is_hash_prefix() {
                        self.change_state(State::Hash, 1);
                    }
                }
                State::Port => {
                    if self.is_pathname_start() {
                        self.change_state(State::Pathname, 0);
                    } else if self.is_search_prefix() {
                        self.change_state(State::Search, 1);
                    } else if self.is_hash_prefix() {
                        self.change_state(State::Hash, 1);
                    }
                }
                State::Pathname => {
                    if self.is_search_prefix() {
                        self.change_state(State::Search, 1);
                    } else if self.is_hash_prefix() {
                        self.change_state(State::Hash, 1);
                    }
                }
                State::Search => {
                    if self.is_hash_prefix() {
                        self.change_state(State::Hash, 1);
                    }
                }
                State::Hash | State::Done => {}
            }

            self.token_index += self.token_increment;
        }

        if self.result.hostname.is_some() && self.result.port.is_none() {
            self.result.port = Some(String::new());
        }
        Ok(())
    }

    fn change_state(&mut self, new_state: State, skip: usize) {
        if let Some(component) = self.state.component() {
            let value = self.make_component_string();
            self.result.set(component, value);
        }

        if self.state != State::Init && new_state != State::Done {
            let before_hostname = matches!(
                self.state,
                State::Protocol | State::Authority | State::Username | State::Password
            );
            let before_pathname = before_hostname || matches!(self.state, State::Hostname | State::Port);
            let before_search = before_pathname || self.state == State::Pathname;

            if before_hostname
                && matches!(
                    new_state,
                    State::Port | State::Pathname | State::Search | State::Hash
                )
                && self.result.hostname.is_none()
            {
                self.result.hostname = Some(String::new());
            }

            if before_pathname
                && matches!(new_state, State::Search | State::Hash)
                && self.result.pathname.is_none()
            {
                let pathname = if self.protocol_matches_special_scheme { "/" } else { "" };
                self.result.pathname = Some(pathname.to_string());
            }

            if before_search && new_state == State::Hash && self.result.search.is_none() {
                self.result.search = Some(String::new());
            }
        }

        self.state = new_state;
        self.token_index += skip;
        self.component_start = self.token_index;
        self.token_increment = 0;
    }

    fn rewind(&mut self) {
        self.token_index = self.component_start;
        self.token_increment = 0;
    }

    fn rewind_and_set_state(&mut self, state: State) {
        self.rewind();
        self.state = state;
    }

    fn safe_token(&self, index: usize) -> Token<'a> {
        match self.tokens.get(index) {
            Some(token) => *token,
            // tokenize always ends with an End token
            None => self.tokens[self.tokens.len() - 1],
        }
    }

    fn is_non_special_pattern_char(&self, index: usize, value: &str) -> bool {
        let token = self.safe_token(index);
        token.value == value
            && matches!(
                token.kind,
                TokenType::Char | TokenType::EscapedChar | TokenType::InvalidChar
            )
    }

    fn is_protocol_suffix(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, ":")
    }

    fn next_is_authority_slashes(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index + 1, "/")
            && self.is_non_special_pattern_char(self.token_index + 2, "/")
    }

    fn is_identity_terminator(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "@")
    }

    fn is_password_prefix(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, ":")
    }

    fn is_port_prefix(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, ":")
    }

    fn is_pathname_start(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "/")
    }

    fn is_search_prefix(&self) -> bool {
        if self.is_non_special_pattern_char(self.token_index, "?") {
            return true;
        }
        if self.tokens[self.token_index].value != "?" {
            return false;
        }
        // a `?` modifier directly after a name, regexp, group or wildcard
        // belongs to that part
        let Some(previous) = self.token_index.checked_sub(1) else {
            return true;
        };
        !matches!(
            self.safe_token(previous).kind,
            TokenType::Name | TokenType::Regexp | TokenType::Close | TokenType::Asterisk
        )
    }

    fn is_hash_prefix(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "#")
    }

    fn is_ipv6_open(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "[")
    }

    fn is_ipv6_close(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "]")
    }

    fn make_component_string(&self) -> String {
        let end = self.safe_token(self.token_index).index;
        let start = self.safe_token(self.component_start).index;
        self.input.get(start..end).unwrap_or_default().to_string()
    }

    fn compute_protocol_matches_special_scheme(&mut self) -> UrlPatternResult<()> {
        let protocol = self.make_component_string();
        let compiled = CompiledComponent::compile(
            Component::Protocol,
            &protocol,
            canonicalize_protocol,
            &Options::default(),
        )?;
        self.protocol_matches_special_scheme = compiled.matches_special_scheme();
        Ok(())
    }
}
