use bunner_urlpattern_rs::canonicalize::CanonicalizeResult;
use bunner_urlpattern_rs::pattern::{Options, PartModifier, PartType, parse_pattern_string};
use bunner_urlpattern_rs::{
    Component, Groups, StringOrInit, UrlPattern, UrlPatternInit, UrlPatternMatch,
    UrlPatternOptions,
};

fn component_options(component: Component) -> Options {
    match component {
        Component::Hostname => Options::hostname(),
        Component::Pathname => Options::pathname(),
        _ => Options::default(),
    }
}

fn keep_text(value: &str) -> CanonicalizeResult<String> {
    Ok(value.to_string())
}

fn component_groups(result: &UrlPatternMatch, component: Component) -> &Groups {
    let matched = match component {
        Component::Protocol => &result.protocol,
        Component::Username => &result.username,
        Component::Password => &result.password,
        Component::Hostname => &result.hostname,
        Component::Port => &result.port,
        Component::Pathname => &result.pathname,
        Component::Search => &result.search,
        Component::Hash => &result.hash,
    };
    &matched.groups
}

/// Substitutes captured groups back into the component's parts.
fn rebuild_component(pattern: &UrlPattern, component: Component, groups: &Groups) -> String {
    let compiled = pattern.component(component);
    let parts = parse_pattern_string(
        compiled.pattern_string(),
        &component_options(component),
        keep_text,
    )
    .expect("normalized pattern should parse");

    let mut rebuilt = String::new();
    for part in &parts {
        if part.kind == PartType::FixedText {
            if part.modifier == PartModifier::None {
                rebuilt.push_str(&part.value);
            }
            continue;
        }
        let value = groups
            .get(&part.name)
            .map(String::as_str)
            .unwrap_or_default();
        if value.is_empty() && part.modifier != PartModifier::None {
            continue;
        }
        rebuilt.push_str(&part.prefix);
        rebuilt.push_str(value);
        rebuilt.push_str(&part.suffix);
    }
    rebuilt
}

#[test]
fn test_when_url_matches_every_component_then_returns_true() {
    let pattern =
        UrlPattern::new("https://example.com/books/:id", None).expect("pattern should compile");

    assert!(
        pattern
            .test("https://example.com/books/123", None)
            .expect("test should not error")
    );
    assert!(
        !pattern
            .test("https://deno.land/books/123", None)
            .expect("test should not error")
    );
}

#[test]
fn test_when_pattern_has_base_url_then_matches_single_segment() {
    let pattern = UrlPattern::new("/:article", Some("https://blog.example.com"))
        .expect("pattern should compile");

    assert!(
        pattern
            .test("https://blog.example.com/article", None)
            .expect("test should not error")
    );
    assert!(
        !pattern
            .test("https://blog.example.com/article/123", None)
            .expect("test should not error")
    );
}

#[test]
fn exec_when_url_matches_then_returns_named_groups() {
    let pattern =
        UrlPattern::new("https://example.com/books/:id", None).expect("pattern should compile");

    let result = pattern
        .exec("https://example.com/books/123", None)
        .expect("exec should not error")
        .expect("url should match");

    assert_eq!(result.pathname.input, "/books/123");
    assert_eq!(result.pathname.groups.get("id").map(String::as_str), Some("123"));
    assert_eq!(result.hostname.input, "example.com");
    assert!(result.hostname.groups.is_empty());
    assert_eq!(result.search.groups.get("0").map(String::as_str), Some(""));
    assert_eq!(
        result.inputs.as_slice(),
        [StringOrInit::from("https://example.com/books/123")]
    );
}

#[test]
fn exec_when_input_is_not_a_url_then_returns_none() {
    let pattern = UrlPattern::new("/:x", None).expect("pattern should compile");

    let result = pattern
        .exec("not a url", Some("also not a url"))
        .expect("resolution failures are not errors");
    assert!(result.is_none());
    assert!(
        !pattern
            .test("not a url", Some("also not a url"))
            .expect("resolution failures are not errors")
    );
}

#[test]
fn exec_when_base_url_given_then_records_both_inputs() {
    let pattern = UrlPattern::new("https://example.com/*", None).expect("pattern should compile");

    let result = pattern
        .exec("a/b", Some("https://example.com/"))
        .expect("exec should not error")
        .expect("url should match");

    assert_eq!(result.inputs.len(), 2);
    assert_eq!(result.pathname.groups.get("0").map(String::as_str), Some("a/b"));
}

#[test]
fn test_agrees_with_exec() {
    let pattern = UrlPattern::new("http{s}?://*.example.com/:section/:page?", None)
        .expect("pattern should compile");

    let urls = [
        "https://www.example.com/docs",
        "http://api.example.com/docs/intro",
        "https://example.com/docs",
        "https://www.example.com/docs/intro/more",
        "ftp://www.example.com/docs",
        "not a url",
    ];

    for url in urls {
        let tested = pattern.test(url, None).expect("test should not error");
        let executed = pattern.exec(url, None).expect("exec should not error");
        assert_eq!(tested, executed.is_some(), "disagreement for {url}");
    }
}

#[test]
fn test_when_only_pathname_given_then_other_components_are_wildcards() {
    let pattern = UrlPattern::new(
        UrlPatternInit {
            pathname: Some("/x".into()),
            ..Default::default()
        },
        None,
    )
    .expect("pattern should compile");

    let input = UrlPatternInit {
        pathname: Some("/x".into()),
        protocol: Some("anything".into()),
        ..Default::default()
    };
    assert!(pattern.test(input, None).expect("test should not error"));
}

#[test]
fn test_when_structured_input_has_base_url_then_inherits_components() {
    let pattern =
        UrlPattern::new("https://example.com/books/:id", None).expect("pattern should compile");

    let input = UrlPatternInit {
        pathname: Some("/books/7".into()),
        base_url: Some("https://example.com".into()),
        ..Default::default()
    };
    let result = pattern
        .exec(input, None)
        .expect("exec should not error")
        .expect("input should match");
    assert_eq!(result.pathname.groups.get("id").map(String::as_str), Some("7"));
}

#[test]
fn test_when_structured_input_combined_with_base_url_then_errors() {
    let pattern = UrlPattern::new("/*", None).expect("pattern should compile");
    let result = pattern.test(UrlPatternInit::default(), Some("https://example.com"));
    assert!(result.is_err());
}

#[test]
fn test_when_ignore_case_enabled_then_pathname_matches_any_case() {
    let options = UrlPatternOptions::builder().ignore_case(true).build();
    let pattern = UrlPattern::with_options("https://example.com/Books/:id", None, options)
        .expect("pattern should compile");

    assert!(
        pattern
            .test("https://example.com/books/1", None)
            .expect("test should not error")
    );

    let strict =
        UrlPattern::new("https://example.com/Books/:id", None).expect("pattern should compile");
    assert!(
        !strict
            .test("https://example.com/books/1", None)
            .expect("test should not error")
    );
}

#[test]
fn exec_when_repeated_group_matches_then_captures_joined_segments() {
    let pattern = UrlPattern::new("https://example.com/files/:path+", None)
        .expect("pattern should compile");

    let result = pattern
        .exec("https://example.com/files/a/b/c", None)
        .expect("exec should not error")
        .expect("url should match");
    assert_eq!(result.pathname.groups.get("path").map(String::as_str), Some("a/b/c"));

    assert!(
        !pattern
            .test("https://example.com/files", None)
            .expect("test should not error")
    );
}

#[test]
fn exec_when_optional_group_absent_then_group_is_empty() {
    let pattern = UrlPattern::new("https://example.com/:section/:page?", None)
        .expect("pattern should compile");

    let result = pattern
        .exec("https://example.com/docs", None)
        .expect("exec should not error")
        .expect("url should match");
    assert_eq!(result.pathname.groups.get("page").map(String::as_str), Some(""));
}

#[test]
fn test_when_pattern_is_shared_across_threads_then_matches() {
    let pattern = std::sync::Arc::new(
        UrlPattern::new("https://example.com/:id", None).expect("pattern should compile"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pattern = std::sync::Arc::clone(&pattern);
            std::thread::spawn(move || {
                pattern
                    .test(format!("https://example.com/{i}").as_str(), None)
                    .expect("test should not error")
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("thread should not panic"));
    }
}

#[test]
fn exec_when_groups_substituted_back_then_components_still_match() {
    let cases = [
        ("https://:sub.example.com/:a/:b?", "https://www.example.com/x/y"),
        ("https://:sub.example.com/:a/:b?", "https://api.example.com/x"),
        ("https://example.com/files/:p+", "https://example.com/files/a/b/c"),
        ("https://example.com/items{x:id(\\d+)y}?", "https://example.com/itemsx42y"),
        ("https://example.com/items{x:id(\\d+)y}?", "https://example.com/items"),
        ("https://example.com/docs?q=:term#:frag", "https://example.com/docs?q=rust#top"),
    ];

    for (source, url) in cases {
        let pattern = UrlPattern::new(source, None).expect("pattern should compile");
        let result = pattern
            .exec(url, None)
            .expect("exec should not error")
            .unwrap_or_else(|| panic!("{url} should match {source}"));

        for component in Component::ALL {
            let groups = component_groups(&result, component);
            for name in pattern.component(component).group_name_list() {
                assert!(groups.contains_key(name), "{component} lacks group {name}");
            }

            let rebuilt = rebuild_component(&pattern, component, groups);
            assert!(
                pattern.component(component).is_match(&rebuilt),
                "{component} of {source} does not match rebuilt '{rebuilt}'"
            );
        }
    }
}
