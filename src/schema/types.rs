//! Field and collection type definitions
//!
//! Supported field types:
//! - text, longtext, richtext, slug, email, color, time: text column
//! - password: text column (one-way hash)
//! - number: numeric column
//! - boolean: boolean column
//! - date: date/datetime columns, single or range mode
//! - enumeration, json, media, relation: json column
//! - group: no column of its own; owns an ordered child schema

use serde::{Deserialize, Serialize};

/// Project identifier
pub type ProjectId = i64;
/// Collection identifier
pub type CollectionId = i64;
/// Field definition identifier
pub type FieldId = i64;

/// Declared field types, closed set.
///
/// Every dispatch site (codec, group manager, filter compiler, sort planner)
/// matches exhaustively on this enum, so adding a type is a compile error
/// until all of them are updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Longtext,
    Richtext,
    Slug,
    Email,
    Password,
    Number,
    Boolean,
    Color,
    Date,
    Time,
    Enumeration,
    Json,
    Media,
    Relation,
    Group,
}

impl FieldType {
    /// Returns the type name used in stored rows and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Longtext => "longtext",
            FieldType::Richtext => "richtext",
            FieldType::Slug => "slug",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Color => "color",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Enumeration => "enumeration",
            FieldType::Json => "json",
            FieldType::Media => "media",
            FieldType::Relation => "relation",
            FieldType::Group => "group",
        }
    }

    /// Parses a type name; unknown names yield None
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(FieldType::Text),
            "longtext" => Some(FieldType::Longtext),
            "richtext" => Some(FieldType::Richtext),
            "slug" => Some(FieldType::Slug),
            "email" => Some(FieldType::Email),
            "password" => Some(FieldType::Password),
            "number" => Some(FieldType::Number),
            "boolean" => Some(FieldType::Boolean),
            "color" => Some(FieldType::Color),
            "date" => Some(FieldType::Date),
            "time" => Some(FieldType::Time),
            "enumeration" => Some(FieldType::Enumeration),
            "json" => Some(FieldType::Json),
            "media" => Some(FieldType::Media),
            "relation" => Some(FieldType::Relation),
            "group" => Some(FieldType::Group),
            _ => None,
        }
    }

    /// Returns true for types whose value is a set of links to other records
    pub fn is_linking(&self) -> bool {
        matches!(self, FieldType::Media | FieldType::Relation)
    }

    /// Returns true for the group container type
    pub fn is_group(&self) -> bool {
        matches!(self, FieldType::Group)
    }
}

/// Date storage mode for `date` fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    /// One bound, stored in the start column only
    #[default]
    Single,
    /// Two bounds split on the literal `" - "` delimiter
    Range,
}

/// Per-field options controlling encoding and write fan-out
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Field accepts an ordered list of values (non-group types)
    #[serde(default)]
    pub repeatable: bool,
    /// Media/relation fields accept more than one target
    #[serde(default)]
    pub multiple: bool,
    /// Date mode (single bound or range)
    #[serde(default)]
    pub date_mode: DateMode,
    /// Date fields carry a time-of-day component
    #[serde(default)]
    pub include_time: bool,
    /// Target collection for relation fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_collection: Option<CollectionId>,
    /// Allowed values for enumeration fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Ordered child schema; only populated for group fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldDefinition>,
}

/// Validation rules, enforced by the external validation layer.
///
/// The core never rejects on these; emptiness handling at this layer is
/// always skip-silently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_chars: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<u32>,
}

/// One field of a collection's schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field identifier, referenced by stored value rows
    pub id: FieldId,
    /// Name, unique within collection + optional parent group field
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Encoding and fan-out options
    #[serde(default)]
    pub options: FieldOptions,
    /// Validation rules (read-only here)
    #[serde(default)]
    pub rules: ValidationRules,
}

impl FieldDefinition {
    /// Creates a field with default options and rules
    pub fn new(id: FieldId, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id,
            name: name.into(),
            field_type,
            options: FieldOptions::default(),
            rules: ValidationRules::default(),
        }
    }

    /// Sets options, builder-style
    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets validation rules, builder-style
    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Marks the field repeatable
    pub fn repeatable(mut self) -> Self {
        self.options.repeatable = true;
        self
    }

    /// Looks up a child field by name (group fields only)
    pub fn child(&self, name: &str) -> Option<&FieldDefinition> {
        self.options.children.iter().find(|f| f.name == name)
    }
}

/// A collection of entries sharing one field schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub project_id: ProjectId,
    pub name: String,
    /// Singleton collections hold at most one entry per locale
    #[serde(default)]
    pub singleton: bool,
    /// Ordered field definitions
    pub fields: Vec<FieldDefinition>,
}

impl Collection {
    /// Creates a collection with the given fields
    pub fn new(
        id: CollectionId,
        project_id: ProjectId,
        name: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            id,
            project_id,
            name: name.into(),
            singleton: false,
            fields,
        }
    }

    /// Marks the collection as a singleton
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Looks up a top-level field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a top-level field by identifier
    pub fn field_by_id(&self, id: FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }
}
