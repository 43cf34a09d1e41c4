//! Field type definitions.
//!
//! A [`FieldType`] says what kind of data a model column holds, which is
//! what search configuration derives default match types from. A
//! [`FieldDef`] adds the column's name and display metadata.

use crate::value::Value;

/// The type of a model field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    /// Auto-incrementing integer primary key.
    AutoField,
    /// Variable-length string with a max length.
    CharField,
    /// Unlimited-length text.
    TextField,
    /// Slug (URL-friendly string).
    SlugField,
    /// Email address.
    EmailField,
    /// URL.
    UrlField,
    /// 32-bit signed integer.
    IntegerField,
    /// 64-bit signed integer.
    BigIntegerField,
    /// 16-bit signed integer.
    SmallIntegerField,
    /// 64-bit floating-point number.
    FloatField,
    /// Fixed-precision decimal number.
    DecimalField {
        /// Maximum total digits.
        max_digits: u32,
        /// Digits after the decimal point.
        decimal_places: u32,
    },
    /// Boolean (true/false).
    BooleanField,
    /// Date without time.
    DateField,
    /// Date and time.
    DateTimeField,
    /// UUID.
    UuidField,
    /// JSON data.
    JsonField,
    /// Many-to-one relationship.
    ForeignKey {
        /// The target model name (e.g. "blog.author").
        to: String,
    },
}

impl FieldType {
    /// Returns `true` for string-valued fields.
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            Self::CharField | Self::TextField | Self::SlugField | Self::EmailField | Self::UrlField
        )
    }

    /// Returns `true` for integer-valued fields (including the primary key).
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::AutoField | Self::IntegerField | Self::BigIntegerField | Self::SmallIntegerField
        )
    }

    /// Returns `true` for floating-point and decimal fields.
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::FloatField | Self::DecimalField { .. })
    }

    /// Returns `true` for date and datetime fields.
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::DateField | Self::DateTimeField)
    }
}

/// Definition of a model field.
///
/// # Examples
///
/// ```
/// use viewcraft_db::fields::{FieldDef, FieldType};
///
/// let field = FieldDef::new("view_count", FieldType::IntegerField).nullable();
/// assert_eq!(field.verbose_name, "view count");
/// assert!(field.null);
/// ```
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The attribute name of this field.
    pub name: String,
    /// The database column name (may differ from `name`).
    pub column: String,
    /// The type of this field.
    pub field_type: FieldType,
    /// Whether NULL is allowed.
    pub null: bool,
    /// Human-readable name for the field.
    pub verbose_name: String,
    /// Allowed values as (value, display_label) pairs.
    pub choices: Option<Vec<(Value, String)>>,
}

impl FieldDef {
    /// Creates a new non-null `FieldDef` whose column matches its name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            verbose_name: name.replace('_', " "),
            name,
            field_type,
            null: false,
            choices: None,
        }
    }

    /// Sets the database column name.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Allows NULL values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Sets the verbose (human-readable) name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the allowed choices.
    #[must_use]
    pub fn choices(mut self, choices: Vec<(Value, String)>) -> Self {
        self.choices = Some(choices);
        self
    }
}
