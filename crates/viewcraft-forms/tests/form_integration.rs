//! A search-style form assembled at runtime, bound from a query string.

use viewcraft_db::value::Value;
use viewcraft_forms::{BaseForm, Form, FormFieldDef, FormFieldType, WidgetType};
use viewcraft_http::{HttpRequest, QueryDict};

fn match_choices() -> Vec<(String, String)> {
    vec![
        ("contains".to_string(), "Contains".to_string()),
        ("equals".to_string(), "Equals".to_string()),
    ]
}

fn search_form() -> BaseForm {
    BaseForm::new(vec![
        FormFieldDef::new("title", FormFieldType::text())
            .required(false)
            .label("Title"),
        FormFieldDef::new(
            "title_match",
            FormFieldType::Choice {
                choices: match_choices(),
            },
        )
        .required(false)
        .initial("contains")
        .widget(WidgetType::RadioSelect)
        .label("Title Match Type"),
        FormFieldDef::new("price_min", FormFieldType::text()).required(false),
        FormFieldDef::new("price_max", FormFieldType::text()).required(false),
    ])
}

#[test]
fn test_bound_from_post_body() {
    let request = HttpRequest::builder()
        .method(http::Method::POST)
        .content_type("application/x-www-form-urlencoded")
        .body(b"title=ownership&title_match=equals&price_min=10".to_vec())
        .build();

    let mut form = search_form();
    form.bind(request.post());
    assert!(form.is_valid());

    let cleaned = form.cleaned_data();
    assert_eq!(cleaned.get("title"), Some(&Value::from("ownership")));
    assert_eq!(cleaned.get("title_match"), Some(&Value::from("equals")));
    assert_eq!(cleaned.get("price_min"), Some(&Value::from("10")));
    assert_eq!(cleaned.get("price_max"), Some(&Value::Null));
}

#[test]
fn test_missing_choice_falls_back_to_initial() {
    let mut form = search_form();
    form.bind(&QueryDict::parse("title=rust"));
    assert!(form.is_valid());
    assert_eq!(
        form.cleaned_data().get("title_match"),
        Some(&Value::from("contains"))
    );
}

#[test]
fn test_unknown_choice_is_an_error() {
    let mut form = search_form();
    form.bind(&QueryDict::parse("title=rust&title_match=regex"));
    assert!(!form.is_valid());
    assert!(form.errors().contains_key("title_match"));
    assert!(form.cleaned_data().contains_key("title"));
}

#[test]
fn test_context_renders_radio_group() {
    let mut form = search_form();
    form.bind(&QueryDict::parse("title_match=equals"));
    let ctx = form.as_context();
    let radio = ctx["fields"][1]["html"].as_str().unwrap_or_default();
    assert!(radio.contains(r#"value="equals" id="id_title_match_1" checked"#));
    assert_eq!(ctx["fields"][1]["widget"], "RadioSelect");
}
