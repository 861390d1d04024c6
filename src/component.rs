use regex::{Regex, RegexBuilder};

use crate::canonicalize::CanonicalizeResult;
use crate::errors::{UrlPatternError, UrlPatternResult};
use crate::matcher::{ComponentMatch, Groups};
use crate::pattern::{
    Options, PartType, generate_pattern_string, generate_regular_expression_and_name_list,
    parse_pattern_string,
};
use crate::types::{Component, GroupNameList, special_schemes};

/// One URL component's pattern compiled into a regular expression.
#[derive(Debug, Clone)]
pub struct CompiledComponent {
    pattern_string: String,
    regexp_string: String,
    regexp: Regex,
    group_name_list: GroupNameList,
    has_regexp_groups: bool,
}

impl CompiledComponent {
    #[tracing::instrument(level = "trace", skip(encoding, options), fields(component=%component, pattern=%input))]
    pub fn compile<F>(
        component: Component,
        input: &str,
        encoding: F,
        options: &Options,
    ) -> UrlPatternResult<Self>
    where
        F: Fn(&str) -> CanonicalizeResult<String>,
    {
        let parts = parse_pattern_string(input, options, encoding)
            .map_err(|source| UrlPatternError::Pattern { component, source })?;

        let (regexp_string, group_name_list) =
            generate_regular_expression_and_name_list(&parts, options);
        let regexp = RegexBuilder::new(&regexp_string)
            .case_insensitive(options.ignore_case)
            .build()
            .map_err(|source| UrlPatternError::Regex {
                component,
                regexp: regexp_string.clone(),
                source,
            })?;

        tracing::event!(
            tracing::Level::TRACE,
            operation = "compile",
            component = %component,
            regexp = %regexp_string,
            groups = group_name_list.len() as u64
        );

        Ok(Self {
            pattern_string: generate_pattern_string(&parts, options),
            regexp_string,
            regexp,
            group_name_list,
            has_regexp_groups: parts.iter().any(|part| part.kind == PartType::Regexp),
        })
    }

    pub fn pattern_string(&self) -> &str {
        &self.pattern_string
    }

    pub fn regexp_string(&self) -> &str {
        &self.regexp_string
    }

    pub fn group_name_list(&self) -> &[String] {
        &self.group_name_list
    }

    pub fn has_regexp_groups(&self) -> bool {
        self.has_regexp_groups
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regexp.is_match(input)
    }

    /// Runs the regex and zips capture groups to names; groups that did not
    /// participate map to an empty string.
    pub fn exec(&self, input: &str) -> Option<ComponentMatch> {
        let captures = self.regexp.captures(input)?;
        let groups: Groups = self
            .group_name_list
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let value = captures
                    .get(index + 1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                (name.clone(), value)
            })
            .collect();

        Some(ComponentMatch {
            input: input.to_string(),
            groups,
        })
    }

    pub(crate) fn matches_special_scheme(&self) -> bool {
        special_schemes().any(|scheme| self.regexp.is_match(scheme))
    }
}
