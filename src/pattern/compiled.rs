use regex::escape;

use super::Options;
use super::ast::{Part, PartModifier, PartType};
use super::lexer::is_valid_name_code_point;
use crate::types::{FULL_WILDCARD_REGEXP, GroupNameList};

/// Renders parts into an anchored regular expression. The returned names are
/// in capture-group declaration order.
pub fn generate_regular_expression_and_name_list(
    parts: &[Part],
    options: &Options,
) -> (String, GroupNameList) {
    let segment_wildcard = options.segment_wildcard_regexp();
    let mut result = String::from("^");
    let mut names = GroupNameList::new();

    for part in parts {
        let modifier = part.modifier.as_str();

        if part.kind == PartType::FixedText {
            if part.modifier == PartModifier::None {
                result.push_str(&escape(&part.value));
            } else {
                result.push_str(&format!("(?:{}){}", escape(&part.value), modifier));
            }
            continue;
        }

        names.push(part.name.clone());

        let regexp = match part.kind {
            PartType::SegmentWildcard => segment_wildcard.as_str(),
            PartType::FullWildcard => FULL_WILDCARD_REGEXP,
            _ => part.value.as_str(),
        };

        if part.prefix.is_empty() && part.suffix.is_empty() {
            if part.modifier.is_repeating() {
                result.push_str(&format!("((?:{}){})", regexp, modifier));
            } else {
                result.push_str(&format!("({}){}", regexp, modifier));
            }
            continue;
        }

        let prefix = escape(&part.prefix);
        let suffix = escape(&part.suffix);

        if !part.modifier.is_repeating() {
            result.push_str(&format!("(?:{}({}){}){}", prefix, regexp, suffix, modifier));
            continue;
        }

        // the prefix and suffix wrap the whole repetition once; only the
        // separator between repeats reuses them
        result.push_str(&format!(
            "(?:{prefix}((?:{regexp})(?:{suffix}{prefix}(?:{regexp}))*){suffix})"
        ));
        if part.modifier == PartModifier::ZeroOrMore {
            result.push('?');
        }
    }

    result.push('$');
    (result, names)
}

pub fn escape_pattern_string(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '+' | '*' | '?' | ':' | '{' | '}' | '(' | ')' | '\\') {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

/// Serializes parts back into normalized pattern syntax.
pub fn generate_pattern_string(parts: &[Part], options: &Options) -> String {
    let mut result = String::new();

    for (index, part) in parts.iter().enumerate() {
        let previous = index.checked_sub(1).and_then(|i| parts.get(i));
        let next = parts.get(index + 1);

        if part.kind == PartType::FixedText {
            if part.modifier == PartModifier::None {
                result.push_str(&escape_pattern_string(&part.value));
            } else {
                result.push('{');
                result.push_str(&escape_pattern_string(&part.value));
                result.push('}');
                result.push_str(part.modifier.as_str());
            }
            continue;
        }

        let custom_name = part.has_custom_name();
        let mut needs_grouping =
            !part.suffix.is_empty() || (!part.prefix.is_empty() && !options.is_prefix(&part.prefix));

        if !needs_grouping
            && custom_name
            && part.kind == PartType::SegmentWildcard
            && part.modifier == PartModifier::None
            && let Some(next) = next
            && next.prefix.is_empty()
            && next.suffix.is_empty()
        {
            needs_grouping = if next.kind == PartType::FixedText {
                next.value
                    .chars()
                    .next()
                    .is_some_and(|ch| is_valid_name_code_point(ch, false))
            } else {
                !next.has_custom_name()
            };
        }

        if !needs_grouping
            && part.prefix.is_empty()
            && let Some(previous) = previous
            && previous.kind == PartType::FixedText
            && let Some(last) = previous.value.chars().last()
            && options.prefix == Some(last)
        {
            needs_grouping = true;
        }

        if needs_grouping {
            result.push('{');
        }
        result.push_str(&escape_pattern_string(&part.prefix));

        if custom_name {
            result.push(':');
            result.push_str(&part.name);
        }

        match part.kind {
            PartType::Regexp => {
                result.push('(');
                result.push_str(&part.value);
                result.push(')');
            }
            PartType::SegmentWildcard if !custom_name => {
                result.push('(');
                result.push_str(&options.segment_wildcard_pattern());
                result.push(')');
            }
            PartType::FullWildcard => {
                let bare_asterisk = previous.is_none_or(|previous| {
                    previous.kind == PartType::FixedText || previous.modifier != PartModifier::None
                }) || needs_grouping
                    || !part.prefix.is_empty();
                if !custom_name && bare_asterisk {
                    result.push('*');
                } else {
                    result.push('(');
                    result.push_str(FULL_WILDCARD_REGEXP);
                    result.push(')');
                }
            }
            _ => {}
        }

        if part.kind == PartType::SegmentWildcard
            && custom_name
            && part
                .suffix
                .chars()
                .next()
                .is_some_and(|ch| is_valid_name_code_point(ch, false))
        {
            result.push('\\');
        }
        result.push_str(&escape_pattern_string(&part.suffix));

        if needs_grouping {
            result.push('}');
        }
        result.push_str(part.modifier.as_str());
    }

    result
}
