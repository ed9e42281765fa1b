use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Organization login plus project number; resolved to an opaque id remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub org: String,
    pub number: i32,
}

impl ProjectIdentity {
    pub fn new(org: impl Into<String>, number: i32) -> Self {
        Self {
            org: org.into(),
            number,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Plain,
    Iteration,
    SingleSelect { options: BTreeMap<String, String> },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Option name -> option id, only for single-select fields.
    pub fn options(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            FieldKind::SingleSelect { options } => Some(options),
            _ => None,
        }
    }
}

/// Custom fields keyed by their own `name`.
pub type FieldCollection = BTreeMap<String, FieldDescriptor>;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedProject {
    pub project_id: String,
    pub fields: FieldCollection,
}

// Wire records for the field query. Only the keys we read are declared.
#[derive(Debug, Clone, Deserialize)]
pub struct RawField {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub options: Option<Vec<RawOption>>,
    #[serde(default)]
    pub configuration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOption {
    pub id: String,
    pub name: String,
}

impl From<RawField> for FieldDescriptor {
    fn from(raw: RawField) -> Self {
        let kind = match (raw.options, raw.configuration) {
            (Some(options), _) => FieldKind::SingleSelect {
                // Later duplicates overwrite earlier ones.
                options: options.into_iter().map(|o| (o.name, o.id)).collect(),
            },
            (None, Some(_)) => FieldKind::Iteration,
            (None, None) => FieldKind::Plain,
        };
        FieldDescriptor {
            id: raw.id,
            name: raw.name,
            kind,
        }
    }
}
