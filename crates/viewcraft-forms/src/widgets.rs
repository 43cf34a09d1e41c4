//! Widget system for rendering HTML form elements.
//!
//! Widgets are the bridge between form fields and their HTML representation.
//! Each widget knows how to render itself as HTML, extract a value from
//! submitted form data, and generate an appropriate `id` attribute for
//! its `<label>` element.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

use viewcraft_http::QueryDict;

/// Enumerates the built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// A set of `<input type="radio">` elements.
    RadioSelect,
    /// `<input type="date">`.
    DateInput,
    /// `<input type="datetime-local">`.
    DateTimeInput,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::HiddenInput => "HiddenInput",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::RadioSelect => "RadioSelect",
            Self::DateInput => "DateInput",
            Self::DateTimeInput => "DateTimeInput",
        };
        write!(f, "{name}")
    }
}

/// A trait for HTML form widgets.
///
/// All widgets must be `Send + Sync` so forms can be built inside request
/// handlers running on any worker thread.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type enum variant.
    fn widget_type(&self) -> WidgetType;

    /// Renders the widget as an HTML string.
    ///
    /// # Arguments
    /// - `name` - The HTML `name` attribute
    /// - `value` - The current value to display (if any)
    /// - `attrs` - Additional HTML attributes
    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String;

    /// Extracts a raw string value from the submitted form data.
    ///
    /// Returns `None` if no value was submitted for this field name.
    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<String> {
        data.get(name).map(String::from)
    }

    /// Returns the HTML `id` attribute value for a label targeting this widget.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }
}

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats an attributes map as ` key="value"` pairs, sorted by key.
fn render_attrs(attrs: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = attrs.keys().collect();
    keys.sort();
    keys.into_iter().fold(String::new(), |mut out, k| {
        let _ = write!(out, r#" {k}="{}""#, escape_html(&attrs[k]));
        out
    })
}

fn render_input(
    input_type: &str,
    name: &str,
    value: Option<&str>,
    attrs: &HashMap<String, String>,
) -> String {
    let val = escape_html(value.unwrap_or(""));
    format!(
        r#"<input type="{input_type}" name="{name}" value="{val}"{} />"#,
        render_attrs(attrs)
    )
}

/// A basic `<input type="text">` widget.
#[derive(Debug, Clone)]
pub struct TextInput;

impl Widget for TextInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::TextInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        render_input("text", name, value, attrs)
    }
}

/// A `<input type="number">` widget.
#[derive(Debug, Clone)]
pub struct NumberInput;

impl Widget for NumberInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::NumberInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        render_input("number", name, value, attrs)
    }
}

/// A `<input type="hidden">` widget.
#[derive(Debug, Clone)]
pub struct HiddenInput;

impl Widget for HiddenInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::HiddenInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        render_input("hidden", name, value, attrs)
    }

    fn id_for_label(&self, _id: &str) -> String {
        String::new()
    }
}

/// A `<input type="date">` widget.
#[derive(Debug, Clone)]
pub struct DateInput;

impl Widget for DateInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::DateInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        render_input("date", name, value, attrs)
    }
}

/// A `<input type="datetime-local">` widget.
#[derive(Debug, Clone)]
pub struct DateTimeInput;

impl Widget for DateTimeInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::DateTimeInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        render_input("datetime-local", name, value, attrs)
    }
}

/// A `<input type="checkbox">` widget.
///
/// An unchecked box submits nothing, so a missing key reads as `"false"`.
#[derive(Debug, Clone)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        let checked = matches!(value, Some("true" | "1" | "on" | "yes"));
        let checked_attr = if checked { " checked" } else { "" };
        format!(
            r#"<input type="checkbox" name="{name}"{checked_attr}{} />"#,
            render_attrs(attrs)
        )
    }

    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<String> {
        Some(data.get(name).map_or_else(|| "false".to_string(), String::from))
    }
}

/// A `<select>` widget.
#[derive(Debug, Clone)]
pub struct Select {
    /// The available choices as `(value, display_label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl Select {
    /// Creates a new `Select` widget with the given choices.
    pub fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }
}

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Select
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        let current = value.unwrap_or("");
        let mut options = String::new();
        for (val, label) in &self.choices {
            let selected = if val == current { " selected" } else { "" };
            let _ = write!(
                options,
                r#"<option value="{}"{selected}>{}</option>"#,
                escape_html(val),
                escape_html(label)
            );
        }
        format!(r#"<select name="{name}"{}>{options}</select>"#, render_attrs(attrs))
    }
}

/// A set of `<input type="radio">` elements.
#[derive(Debug, Clone)]
pub struct RadioSelect {
    /// The available choices as `(value, display_label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl RadioSelect {
    /// Creates a new `RadioSelect` widget with the given choices.
    pub fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }
}

impl Widget for RadioSelect {
    fn widget_type(&self) -> WidgetType {
        WidgetType::RadioSelect
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        let current = value.unwrap_or("");
        let id_base = attrs.get("id").map_or(name, String::as_str);
        let mut html = String::from("<div>");
        for (i, (val, label)) in self.choices.iter().enumerate() {
            let checked = if val == current { " checked" } else { "" };
            let option_id = format!("{id_base}_{i}");
            let _ = write!(
                html,
                r#"<div><input type="radio" name="{name}" value="{}" id="{option_id}"{checked} /> <label for="{option_id}">{}</label></div>"#,
                escape_html(val),
                escape_html(label)
            );
        }
        html.push_str("</div>");
        html
    }

    fn id_for_label(&self, id: &str) -> String {
        format!("{id}_0")
    }
}

/// Creates a boxed widget for a widget type. Choice widgets get `choices`;
/// other widgets ignore them.
pub fn create_widget(widget_type: WidgetType, choices: &[(String, String)]) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::TextInput => Box::new(TextInput),
        WidgetType::NumberInput => Box::new(NumberInput),
        WidgetType::HiddenInput => Box::new(HiddenInput),
        WidgetType::CheckboxInput => Box::new(CheckboxInput),
        WidgetType::Select => Box::new(Select::new(choices.to_vec())),
        WidgetType::RadioSelect => Box::new(RadioSelect::new(choices.to_vec())),
        WidgetType::DateInput => Box::new(DateInput),
        WidgetType::DateTimeInput => Box::new(DateTimeInput),
    }
}
