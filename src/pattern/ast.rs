#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartType {
    FixedText,
    Regexp,
    SegmentWildcard,
    FullWildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartModifier {
    #[default]
    None,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl PartModifier {
    pub fn from_modifier(value: Option<&str>) -> Self {
        match value {
            Some("?") => Self::Optional,
            Some("*") => Self::ZeroOrMore,
            Some("+") => Self::OneOrMore,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Optional => "?",
            Self::ZeroOrMore => "*",
            Self::OneOrMore => "+",
        }
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }
}

/// A unit of a parsed component pattern: fixed text or a group.
///
/// For groups `value` holds the custom regular expression body and is empty
/// for the two wildcard kinds, whose body depends on the component options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub kind: PartType,
    pub value: String,
    pub modifier: PartModifier,
    pub name: String,
    pub prefix: String,
    pub suffix: String,
}

impl Part {
    pub fn fixed_text(value: String, modifier: PartModifier) -> Self {
        Self {
            kind: PartType::FixedText,
            value,
            modifier,
            name: String::new(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    pub fn has_custom_name(&self) -> bool {
        self.name
            .chars()
            .next()
            .is_some_and(|ch| !ch.is_ascii_digit())
    }
}
