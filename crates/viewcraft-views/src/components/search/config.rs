//! Searchable-field configuration.
//!
//! Both types here are validated when built and immutable afterwards, so
//! every request can assume the field set is well formed.

use std::collections::HashSet;

use viewcraft_core::utils::text::humanize;
use viewcraft_core::{Settings, ViewcraftError, ViewcraftResult};
use viewcraft_db::ModelMeta;

use super::codec::GLOBAL_KEY;
use super::match_type::{FieldKind, MatchType};

/// One searchable field.
///
/// # Examples
///
/// ```
/// use viewcraft_views::{FieldKind, MatchType, SearchFieldSpec};
///
/// let spec = SearchFieldSpec::new(
///     "view_count",
///     FieldKind::Integer,
///     vec![MatchType::Equals, MatchType::Range],
/// )
/// .unwrap();
/// assert_eq!(spec.label(), "View count");
/// assert_eq!(spec.default_match_type(), MatchType::Equals);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFieldSpec {
    field_name: String,
    label: String,
    kind: FieldKind,
    match_types: Vec<MatchType>,
    default_match_type: MatchType,
    case_sensitive: Option<bool>,
}

impl SearchFieldSpec {
    /// Declares a field with an explicit list of allowed match types. The
    /// first one becomes the default.
    pub fn new(
        field_name: impl Into<String>,
        kind: FieldKind,
        match_types: Vec<MatchType>,
    ) -> ViewcraftResult<Self> {
        let field_name = field_name.into();
        if field_name.trim().is_empty() {
            return Err(ViewcraftError::SearchConfig(
                "Search field name must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        let match_types: Vec<MatchType> =
            match_types.into_iter().filter(|mt| seen.insert(*mt)).collect();
        let Some(&default_match_type) = match_types.first() else {
            return Err(ViewcraftError::SearchConfig(format!(
                "Search field '{field_name}' must allow at least one match type"
            )));
        };

        Ok(Self {
            label: humanize(&field_name),
            field_name,
            kind,
            match_types,
            default_match_type,
            case_sensitive: None,
        })
    }

    /// Declares a field allowing every match type its kind supports.
    pub fn for_kind(field_name: impl Into<String>, kind: FieldKind) -> ViewcraftResult<Self> {
        Self::new(field_name, kind, kind.supported_match_types().to_vec())?
            .with_default_match_type(kind.default_match_type())
    }

    /// Sets the label shown in the form and in search chips.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the default match type, which must be one of the allowed ones.
    pub fn with_default_match_type(mut self, match_type: MatchType) -> ViewcraftResult<Self> {
        if !self.allows(match_type) {
            return Err(ViewcraftError::SearchConfig(format!(
                "Default match type '{match_type}' is not allowed for field '{}'",
                self.field_name
            )));
        }
        self.default_match_type = match_type;
        Ok(self)
    }

    /// Overrides the config-wide case sensitivity for this field.
    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn match_types(&self) -> &[MatchType] {
        &self.match_types
    }

    pub const fn default_match_type(&self) -> MatchType {
        self.default_match_type
    }

    pub const fn case_sensitive(&self) -> Option<bool> {
        self.case_sensitive
    }

    /// Returns `true` if `match_type` was declared for this field.
    pub fn allows(&self, match_type: MatchType) -> bool {
        self.match_types.contains(&match_type)
    }
}

/// The search component's configuration.
///
/// Field order matters: criteria are applied in the order fields are
/// declared here, whatever order a token lists them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    param_name: String,
    case_sensitive: bool,
    min_length: usize,
    global_fields: Vec<String>,
    fields: Vec<SearchFieldSpec>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            param_name: "q".to_string(),
            case_sensitive: false,
            min_length: 2,
            global_fields: Vec::new(),
            fields: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Builds a config over `fields`, rejecting duplicate names and the
    /// reserved `global_search` key.
    pub fn new(fields: Vec<SearchFieldSpec>) -> ViewcraftResult<Self> {
        let mut seen = HashSet::new();
        for spec in &fields {
            if spec.field_name == GLOBAL_KEY {
                return Err(ViewcraftError::SearchConfig(format!(
                    "'{GLOBAL_KEY}' is reserved and cannot be a search field"
                )));
            }
            if !seen.insert(spec.field_name.as_str()) {
                return Err(ViewcraftError::SearchConfig(format!(
                    "Duplicate search field '{}'",
                    spec.field_name
                )));
            }
        }
        Ok(Self {
            fields,
            ..Self::default()
        })
    }

    /// Like [`new`](Self::new), seeding the parameter name, case rule and
    /// global-term minimum from settings.
    pub fn from_settings(settings: &Settings, fields: Vec<SearchFieldSpec>) -> ViewcraftResult<Self> {
        let mut config = Self::new(fields)?;
        config.param_name.clone_from(&settings.search_param);
        config.case_sensitive = settings.search_case_sensitive;
        config.min_length = settings.search_min_length;
        Ok(config)
    }

    /// Derives searchable fields from model metadata.
    ///
    /// `include` restricts the fields (empty means all) and `exclude`
    /// removes some. Fields whose type has no search kind are skipped.
    /// Fields keep the model's declaration order.
    pub fn from_model(meta: &ModelMeta, include: &[&str], exclude: &[&str]) -> ViewcraftResult<Self> {
        for name in include.iter().chain(exclude) {
            if meta.get_field(name).is_none() {
                return Err(ViewcraftError::SearchConfig(format!(
                    "Model '{}' has no field '{name}'",
                    meta.label()
                )));
            }
        }

        let mut specs = Vec::new();
        for field in &meta.fields {
            let name = field.name.as_str();
            if (!include.is_empty() && !include.contains(&name)) || exclude.contains(&name) {
                continue;
            }
            let Some(kind) = FieldKind::from_field_type(&field.field_type) else {
                tracing::trace!(field = name, "skipping field with no search kind");
                continue;
            };
            specs.push(SearchFieldSpec::for_kind(name, kind)?.with_label(humanize(name)));
        }
        Self::new(specs)
    }

    /// Sets the query parameter carrying the token.
    #[must_use]
    pub fn with_param_name(mut self, param_name: impl Into<String>) -> Self {
        self.param_name = param_name.into();
        self
    }

    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Sets the minimum length of a global term; shorter terms are ignored.
    #[must_use]
    pub const fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Sets the fields a global term is matched against.
    ///
    /// Names must be non-empty, and a name that is also a declared search
    /// field must be a text field.
    pub fn with_global_fields(mut self, fields: &[&str]) -> ViewcraftResult<Self> {
        for name in fields {
            if name.trim().is_empty() {
                return Err(ViewcraftError::SearchConfig(
                    "Global search field names must not be empty".into(),
                ));
            }
            if let Some(spec) = self.field(name) {
                if spec.kind != FieldKind::Text {
                    return Err(ViewcraftError::SearchConfig(format!(
                        "Global search field '{name}' is not a text field"
                    )));
                }
            }
        }
        self.global_fields = fields.iter().map(ToString::to_string).collect();
        Ok(self)
    }

    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn global_fields(&self) -> &[String] {
        &self.global_fields
    }

    pub fn fields(&self) -> &[SearchFieldSpec] {
        &self.fields
    }

    /// Looks up a declared field.
    pub fn field(&self, name: &str) -> Option<&SearchFieldSpec> {
        self.fields.iter().find(|spec| spec.field_name == name)
    }

    /// Returns the case rule for `spec`: its own override, else the config's.
    pub fn is_case_sensitive(&self, spec: &SearchFieldSpec) -> bool {
        spec.case_sensitive.unwrap_or(self.case_sensitive)
    }
}
