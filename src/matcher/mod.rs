mod resolver;
mod result;

pub use resolver::{MatchInput, process_match_input};
pub use result::{ComponentMatch, Groups, Inputs, UrlPatternMatch};

use crate::component::CompiledComponent;
use crate::types::Component;

/// Per-component compiled patterns, in `Component::ALL` order.
pub(crate) type ComponentSet = [CompiledComponent; 8];

pub(crate) fn test_components(components: &ComponentSet, values: &MatchInput) -> bool {
    let matched = Component::ALL
        .iter()
        .zip(components.iter())
        .all(|(component, compiled)| compiled.is_match(values.get(*component)));

    tracing::event!(
        tracing::Level::TRACE,
        operation = "test",
        matched = matched
    );
    matched
}

pub(crate) fn exec_components(
    components: &ComponentSet,
    values: &MatchInput,
    inputs: Inputs,
) -> Option<UrlPatternMatch> {
    let result = exec_all(components, values, inputs);

    tracing::event!(
        tracing::Level::TRACE,
        operation = "exec",
        matched = result.is_some()
    );
    result
}

fn exec_all(
    components: &ComponentSet,
    values: &MatchInput,
    inputs: Inputs,
) -> Option<UrlPatternMatch> {
    let [protocol, username, password, hostname, port, pathname, search, hash] = components;

    Some(UrlPatternMatch {
        protocol: protocol.exec(&values.protocol)?,
        username: username.exec(&values.username)?,
        password: password.exec(&values.password)?,
        hostname: hostname.exec(&values.hostname)?,
        port: port.exec(&values.port)?,
        pathname: pathname.exec(&values.pathname)?,
        search: search.exec(&values.search)?,
        hash: hash.exec(&values.hash)?,
        inputs,
    })
}
