//! Lower-level entry points for embedders that keep pattern state on their
//! side, such as a JavaScript binding. Every value here is serde-friendly.

use serde::{Deserialize, Serialize};

use crate::component::CompiledComponent;
use crate::errors::UrlPatternResult;
use crate::init::{StringOrInit, UrlPatternInit};
use crate::matcher::{Inputs, MatchInput};
use crate::options::UrlPatternOptions;
use crate::types::{Component, GroupNameList};
use crate::{UrlPattern, construct_pattern_init};

/// One compiled component as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlPatternComponent {
    pub pattern_string: String,
    pub regexp_string: String,
    pub group_name_list: GroupNameList,
}

impl From<&CompiledComponent> for UrlPatternComponent {
    fn from(component: &CompiledComponent) -> Self {
        Self {
            pattern_string: component.pattern_string().to_string(),
            regexp_string: component.regexp_string().to_string(),
            group_name_list: component.group_name_list().iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlPatternDescriptor {
    pub protocol: UrlPatternComponent,
    pub username: UrlPatternComponent,
    pub password: UrlPatternComponent,
    pub hostname: UrlPatternComponent,
    pub port: UrlPatternComponent,
    pub pathname: UrlPatternComponent,
    pub search: UrlPatternComponent,
    pub hash: UrlPatternComponent,
    pub has_regexp_groups: bool,
}

/// Turns constructor arguments into the structured init that
/// [`parse_pattern`] compiles.
pub fn process_construct_pattern_input(
    input: StringOrInit,
    base_url: Option<&str>,
) -> UrlPatternResult<UrlPatternInit> {
    construct_pattern_init(input, base_url)
}

pub fn parse_pattern(
    init: UrlPatternInit,
    options: UrlPatternOptions,
) -> UrlPatternResult<UrlPatternDescriptor> {
    let pattern = UrlPattern::from_init(&init, options)?;
    let describe = |component| UrlPatternComponent::from(pattern.component(component));

    Ok(UrlPatternDescriptor {
        protocol: describe(Component::Protocol),
        username: describe(Component::Username),
        password: describe(Component::Password),
        hostname: describe(Component::Hostname),
        port: describe(Component::Port),
        pathname: describe(Component::Pathname),
        search: describe(Component::Search),
        hash: describe(Component::Hash),
        has_regexp_groups: pattern.has_regexp_groups(),
    })
}

/// Resolves a match input into a fully populated init. `Ok(None)` means the
/// input matches nothing.
pub fn process_match_input(
    input: StringOrInit,
    base_url: Option<&str>,
) -> UrlPatternResult<Option<(UrlPatternInit, Inputs)>> {
    let Some((values, inputs)) = crate::matcher::process_match_input(&input, base_url)? else {
        return Ok(None);
    };

    let mut init = UrlPatternInit::default();
    for component in Component::ALL {
        init.set(component, values.get(component));
    }
    Ok(Some((init, inputs)))
}

/// Converts a resolved init back into component values; `None` when any
/// component is missing.
pub fn parse_match_input(init: UrlPatternInit) -> Option<MatchInput> {
    let mut values = MatchInput::default();
    for component in Component::ALL {
        *values.get_mut(component) = init.get(component)?.to_string();
    }
    Some(values)
}
