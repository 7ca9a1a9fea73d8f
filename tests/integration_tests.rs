//! Integration tests for template rendering

use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::json;

use temple::binding::scope::{nested_elements, top_level_bindings};
use temple::template::inline_partials;
use temple::{
    render_html, CssMatcher, Fragment, HtmlConfig, RenderError, Selector, TemplateEngine,
    TemplateError, TemplateRegistry, TempleConfig, Value,
};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn registry() -> TemplateRegistry {
    TemplateRegistry::from_file(&fixture("temple.html")).expect("Should load fixture")
}

fn pretty(fragment: &Fragment) -> String {
    render_html(fragment, &HtmlConfig::new().with_pretty_print(true))
}

fn count(fragment: &Fragment, selector: &str) -> usize {
    let selector = Selector::parse(selector).expect("valid selector");
    fragment
        .query_all(fragment.root(), &selector, &CssMatcher)
        .len()
}

#[test]
fn test_fixture_templates() {
    let reg = registry();
    assert_eq!(
        reg.ids().collect::<Vec<_>>(),
        vec![
            "template-truth",
            "template-names",
            "template-name",
            "template-arrays",
            "template-attributes"
        ]
    );
}

#[test]
fn test_truth_template_has_one_guard_pair() {
    let reg = registry();
    let engine = TemplateEngine::new(&reg, "template-truth").expect("exists");
    assert_eq!(count(engine.template(), "[data-true]"), 1);
    assert_eq!(count(engine.template(), "[data-false]"), 1);
}

#[test]
fn test_falsy_data_shows_false_branch() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-truth").expect("exists");
    let output = engine
        .render(&Value::from(json!({ "person": false, "persons": [] })))
        .expect("Should render");
    assert_eq!(output.text_content(output.root()).trim(), "Shown.");
}

#[test]
fn test_truthy_data_strips_wrappers() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-truth").expect("exists");
    let output = engine
        .render(&Value::from(json!({ "person": true })))
        .expect("Should render");
    assert_eq!(count(&output, "[data-true], [data-false]"), 0);
    assert_eq!(output.text_content(output.root()).trim(), "Hidden.");
}

#[test]
fn test_same_engine_renders_both_branches() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-truth").expect("exists");
    let shown = engine
        .render(&Value::from(json!({ "person": false })))
        .expect("Should render");
    let hidden = engine
        .render(&Value::from(json!({ "person": "yes" })))
        .expect("Should render");
    assert_eq!(shown.text_content(shown.root()).trim(), "Shown.");
    assert_eq!(hidden.text_content(hidden.root()).trim(), "Hidden.");
}

#[test]
fn test_nested_partials_are_inlined() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-names").expect("exists");
    engine.prepare().expect("Should inline");
    assert_eq!(count(engine.template(), "[data-id='pass']"), 1);
    assert_eq!(count(engine.template(), "[data-template]"), 0);
}

#[test]
fn test_inlining_twice_changes_nothing() {
    let reg = registry();
    let config = TempleConfig::default();
    let mut fragment = reg.get("template-names").expect("exists").content.clone();
    let root = fragment.root();

    let first = inline_partials(&mut fragment, root, &reg, &config, &CssMatcher).expect("Should inline");
    let once = fragment.deep_clone();
    let second = inline_partials(&mut fragment, root, &reg, &config, &CssMatcher).expect("Should inline");

    assert_eq!(first, 1);
    assert_eq!(second, 0);
    assert_eq!(fragment.deep_clone(), once);
}

#[test]
fn test_nested_array_of_objects() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-names").expect("exists");
    let data = Value::from(json!({
        "names": [
            { "name": { "pass": "Jamie", "link": "URL!" } },
            { "name": { "pass": "Joffrey" } }
        ]
    }));
    let output = engine.render(&data).expect("Should render");
    insta::assert_snapshot!(pretty(&output), @r###"
    <ul>
      <li data-id="names">
        <p data-id="name">
          <b data-id="pass">Jamie</b>
          <a data-id="link">URL!</a>
        </p>
      </li>
      <li data-id="names">
        <p data-id="name">
          <b data-id="pass">Joffrey</b>
        </p>
      </li>
    </ul>
    "###);
}

#[test]
fn test_array_expansion_order() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-arrays").expect("exists");
    let output = engine
        .render(&Value::from(json!({ "repo": ["resque", "hub", "rip"] })))
        .expect("Should render");

    let items = Selector::parse("[data-id='repo']").expect("valid");
    let texts: Vec<String> = output
        .query_all(output.root(), &items, &CssMatcher)
        .into_iter()
        .map(|id| output.text_content(id))
        .collect();
    assert_eq!(texts, vec!["resque", "hub", "rip"]);

    // The repeated element is gone; only the copies remain
    assert_eq!(engine.template().to_html().matches("data-id=\"repo\"").count(), 1);
    assert_eq!(output.to_html().matches("<li data-id=\"repo\"></li>").count(), 0);
}

#[test]
fn test_empty_array_removes_element() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-arrays").expect("exists");
    let output = engine
        .render(&Value::from(json!({ "repo": [] })))
        .expect("Should render");
    assert_eq!(count(&output, "li"), 0);
    assert_eq!(count(&output, "ul.repos"), 1);
}

#[test]
fn test_attribute_injection_from_json() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-attributes").expect("exists");
    let data = Value::from(json!({
        "heading": { "@": { "class": "secondary-heading" }, "html": "District 5" },
        "paragraph": "It's not worth winning if you can't win big.",
        "list": {
            "@": { "class": "unordered mtn", "data-coach": "bombay" },
            "list-item": [
                "Averman",
                { "@": { "class": "even" }, "html": "Conway" },
                "Goldberg",
                { "@": { "class": "even" }, "html": "Hall" }
            ]
        }
    }));
    let output = engine.render(&data).expect("Should render");
    insta::assert_snapshot!(pretty(&output), @r###"
    <h2 data-id="heading" class="secondary-heading">District 5</h2>
    <p data-id="paragraph">It's not worth winning if you can't win big.</p>
    <ul data-id="list" class="unordered mtn" data-coach="bombay">
      <li data-id="list-item">Averman</li>
      <li data-id="list-item" class="even">Conway</li>
      <li data-id="list-item">Goldberg</li>
      <li data-id="list-item" class="even">Hall</li>
    </ul>
    "###);
}

#[test]
fn test_attribute_injection_from_toml() {
    let reg = registry();
    let mut engine = TemplateEngine::new(&reg, "template-attributes").expect("exists");
    let data = Value::from_file(&fixture("attributes.toml")).expect("Should load data");
    let output = engine.render(&data).expect("Should render");

    let heading = Selector::parse("h2").expect("valid");
    let h2 = output
        .query_first(output.root(), &heading, &CssMatcher)
        .expect("heading rendered");
    assert_eq!(output.attribute(h2, "class"), Some("secondary-heading"));
    assert_eq!(output.text_content(h2), "District 5");
    assert_eq!(count(&output, "li.even"), 1);
    assert_eq!(count(&output, "ul[data-coach=bombay]"), 1);
}

#[test]
fn test_scope_three_levels_deep() {
    let fragment = Fragment::from_markup(
        r#"<div data-id="top"><div data-id="one"><div data-true="two"><i data-false="three"></i></div></div></div>"#,
    )
    .expect("Should parse");
    let selector = TempleConfig::default().binding_selector();
    let root = fragment.root();

    let all = fragment.query_all(root, &selector, &CssMatcher);
    assert_eq!(all.len(), 4);
    assert_eq!(
        nested_elements(&fragment, &all, &selector, root, &CssMatcher),
        all[1..].to_vec()
    );

    let middle = all[1];
    let inner = fragment.query_all(middle, &selector, &CssMatcher);
    assert_eq!(
        nested_elements(&fragment, &inner, &selector, middle, &CssMatcher),
        vec![all[3]]
    );
    assert_eq!(
        top_level_bindings(&fragment, middle, &selector, &CssMatcher),
        vec![all[2]]
    );
}

#[test]
fn test_custom_config_from_toml() {
    let config = TempleConfig::from_str(
        r#"
id_attribute = "x-text"
true_attribute = "x-if"
false_attribute = "x-unless"
partial_attribute = "x-include"
leave_conditional_wrapper = true
"#,
    )
    .expect("Should parse config");

    let reg = TemplateRegistry::from_markup(
        r#"<template id="page"><section x-include="card"></section><p x-unless="card">none</p></template>
<template id="card"><div x-if="card"><b x-text="title"></b></div></template>"#,
    )
    .expect("Should collect");

    let mut engine = TemplateEngine::new(&reg, "page")
        .expect("exists")
        .with_config(config);
    let output = engine
        .render(&Value::from(json!({ "card": { "title": "Ducks" } })))
        .expect("Should render");
    assert_eq!(
        output.to_html(),
        r#"<div x-if="card"><b x-text="title">Ducks</b></div>"#
    );
}

#[test]
fn test_missing_partial_is_fatal() {
    let reg = TemplateRegistry::from_markup(
        r#"<template id="page"><div data-template="ghost"></div></template>"#,
    )
    .expect("Should collect");
    let mut engine = TemplateEngine::new(&reg, "page").expect("exists");
    let err = engine.render(&Value::Null).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Template(TemplateError::NotFound { ref id }) if id == "ghost"
    ));
    assert_eq!(err.to_string(), "template not found: \"ghost\"");
}

#[test]
fn test_circular_partials_are_reported() {
    let reg = TemplateRegistry::from_markup(
        r#"<template id="a"><div data-template="b"></div></template>
<template id="b"><p data-template="c"></p></template>
<template id="c"><span data-template="a"></span></template>"#,
    )
    .expect("Should collect");
    let mut engine = TemplateEngine::new(&reg, "a").expect("exists");
    let err = engine.render(&Value::Null).unwrap_err();
    assert_eq!(
        err.to_string(),
        "circular template reference detected: a -> b -> c -> a"
    );
}

#[test]
fn test_render_convenience() {
    let html = temple::render(
        r#"<template id="t"><h1 data-id="title"></h1><p data-false="body">No body.</p></template>"#,
        "t",
        r#"{"title": "Mighty Ducks", "year": 1992}"#,
    )
    .expect("Should render");
    assert_eq!(html, r#"<h1 data-id="title">Mighty Ducks</h1>No body."#);
}
