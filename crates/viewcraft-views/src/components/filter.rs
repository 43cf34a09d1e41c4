//! Exact-match filtering from a compact `field:value` parameter.
//!
//! `?filter=status:published,category:[rust,go]` keeps rows whose `status`
//! is `published` and whose `category` is `rust` or `go`. Only configured
//! fields are honoured. Anything unparseable is ignored.

use std::sync::Arc;

use serde_json::json;
use viewcraft_core::{Settings, ViewcraftResult};
use viewcraft_db::value::Value;
use viewcraft_db::{Lookup, QuerySet, Q};
use viewcraft_http::{modify_query_params, HttpRequest};

use crate::component::{Component, Context};

/// A parsed filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    Many(Vec<String>),
}

impl FilterValue {
    fn contains(&self, candidate: &str) -> bool {
        match self {
            Self::Single(value) => value == candidate,
            Self::Many(values) => values.iter().any(|v| v == candidate),
        }
    }

    fn to_param(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Many(values) => format!("[{}]", values.join(",")),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Single(value) => json!(value),
            Self::Many(values) => json!(values),
        }
    }
}

/// Filterable fields and the values offered for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    param_name: String,
    fields: Vec<(String, Vec<String>)>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            param_name: "filter".to_string(),
            fields: Vec::new(),
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the filter parameter name from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            param_name: settings.filter_param.clone(),
            ..Self::default()
        }
    }

    /// Declares a filterable field with the choices offered in the context.
    /// Submitted values outside the choices are still applied.
    #[must_use]
    pub fn field<I, S>(mut self, name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let choices = choices.into_iter().map(Into::into).collect();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = choices,
            None => self.fields.push((name, choices)),
        }
        self
    }

    #[must_use]
    pub fn with_param_name(mut self, param_name: impl Into<String>) -> Self {
        self.param_name = param_name.into();
        self
    }

    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    /// Returns `true` if `name` is a filterable field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Parses a filter parameter, keeping configured fields only. A later
    /// part for the same field replaces an earlier one.
    pub fn parse(&self, raw: &str) -> Vec<(String, FilterValue)> {
        let mut filters: Vec<(String, FilterValue)> = Vec::new();
        for part in split_parts(raw) {
            let Some((field, value)) = part.split_once(':') else {
                tracing::trace!(part, "ignoring filter part without ':'");
                continue;
            };
            let field = field.trim();
            if !self.has_field(field) {
                tracing::trace!(field, "ignoring unknown filter field");
                continue;
            }
            let value = value.trim();
            let parsed = match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
                Some(inner) => FilterValue::Many(
                    inner
                        .split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(ToString::to_string)
                        .collect(),
                ),
                None => FilterValue::Single(value.to_string()),
            };
            if matches!(&parsed, FilterValue::Many(values) if values.is_empty())
                || matches!(&parsed, FilterValue::Single(v) if v.is_empty())
            {
                continue;
            }
            filters.retain(|(f, _)| f != field);
            filters.push((field.to_string(), parsed));
        }
        filters
    }

    /// Renders filters back into parameter form, in config order.
    pub fn to_param(&self, filters: &[(String, FilterValue)]) -> Option<String> {
        let parts: Vec<String> = self
            .fields
            .iter()
            .filter_map(|(name, _)| {
                filters
                    .iter()
                    .find(|(f, _)| f == name)
                    .map(|(f, value)| format!("{f}:{}", value.to_param()))
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join(","))
    }
}

/// Splits on commas outside brackets, so `a:[x,y],b:z` has two parts.
fn split_parts(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Applies the filter parameter.
#[derive(Debug)]
pub struct FilterComponent {
    config: Arc<FilterConfig>,
    filters: Option<Vec<(String, FilterValue)>>,
}

impl FilterComponent {
    pub const fn new(config: Arc<FilterConfig>) -> Self {
        Self {
            config,
            filters: None,
        }
    }

    /// The request's filters, parsed on first use.
    pub fn filters(&mut self, request: &HttpRequest) -> &[(String, FilterValue)] {
        let config = &self.config;
        self.filters.get_or_insert_with(|| {
            request
                .get()
                .get(config.param_name())
                .map(|raw| config.parse(raw))
                .unwrap_or_default()
        })
    }

    fn toggle_url(
        request: &HttpRequest,
        config: &FilterConfig,
        filters: &[(String, FilterValue)],
        field: &str,
        choice: &str,
    ) -> String {
        let mut updated: Vec<(String, FilterValue)> =
            filters.iter().filter(|(f, _)| f != field).cloned().collect();
        let active = filters
            .iter()
            .any(|(f, value)| f == field && value.contains(choice));
        if !active {
            updated.push((field.to_string(), FilterValue::Single(choice.to_string())));
        }
        let param = config.to_param(&updated);
        modify_query_params(request, &[(config.param_name(), param.as_deref())])
    }
}

impl Component for FilterComponent {
    fn name(&self) -> &str {
        "filter"
    }

    fn process_get_queryset(
        &mut self,
        request: &HttpRequest,
        queryset: QuerySet,
    ) -> ViewcraftResult<QuerySet> {
        let filters = self.filters(request);
        if filters.is_empty() {
            return Ok(queryset);
        }
        let predicate = Q::And(
            filters
                .iter()
                .map(|(field, value)| match value {
                    FilterValue::Single(v) => Q::filter(field.as_str(), Lookup::Exact(Value::from(v.as_str()))),
                    FilterValue::Many(values) => Q::filter(
                        field.as_str(),
                        Lookup::In(values.iter().map(|v| Value::from(v.as_str())).collect()),
                    ),
                })
                .collect(),
        );
        tracing::debug!(filters = filters.len(), "applying filters");
        Ok(queryset.filter(predicate))
    }

    fn process_get_context_data(
        &mut self,
        request: &HttpRequest,
        mut context: Context,
    ) -> ViewcraftResult<Context> {
        let config = Arc::clone(&self.config);
        let filters = self.filters(request).to_vec();

        let params: serde_json::Map<String, serde_json::Value> = filters
            .iter()
            .map(|(field, value)| (field.clone(), value.to_json()))
            .collect();

        let mut choices = serde_json::Map::new();
        for (field, values) in &config.fields {
            let entries: Vec<serde_json::Value> = values
                .iter()
                .map(|choice| {
                    let active = filters
                        .iter()
                        .any(|(f, value)| f == field && value.contains(choice));
                    json!({
                        "value": choice,
                        "active": active,
                        "url": Self::toggle_url(request, &config, &filters, field, choice),
                    })
                })
                .collect();
            choices.insert(field.clone(), json!(entries));
        }

        context.insert("filter_params".into(), serde_json::Value::Object(params));
        context.insert("filter_choices".into(), serde_json::Value::Object(choices));
        Ok(context)
    }
}
