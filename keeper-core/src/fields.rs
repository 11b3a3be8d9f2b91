//! Field-update types shared with the persistence collaborator
use serde::{Deserialize, Serialize};

/// Opaque server-assigned investigator identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestigatorId(String);

impl InvestigatorId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvestigatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sections the persistence collaborator accepts field updates for.
/// Serialized exactly as the wire strings the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldCategory {
    #[serde(rename = "attributes")]
    Attributes,
    #[serde(rename = "skills")]
    Skills,
    #[serde(rename = "personalInfo")]
    PersonalInfo,
    #[serde(rename = "talents")]
    Talents,
    #[serde(rename = "stats")]
    Stats,
    #[serde(rename = "skill_check")]
    SkillCheck,
    #[serde(rename = "skill_name")]
    SkillName,
    #[serde(rename = "skill_prio")]
    SkillPrio,
    #[serde(rename = "phobias")]
    Phobias,
    #[serde(rename = "manias")]
    Manias,
    #[serde(rename = "combat")]
    Combat,
}

/// A single field value on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i32),
    Flag(bool),
    Text(String),
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One confirmed change to push to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub category: FieldCategory,
    pub field: String,
    pub value: FieldValue,
}

impl FieldUpdate {
    #[must_use]
    pub fn new(category: FieldCategory, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            category,
            field: field.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_serialize_to_wire_strings() {
        let json = serde_json::to_string(&FieldCategory::PersonalInfo).unwrap();
        assert_eq!(json, "\"personalInfo\"");
        let json = serde_json::to_string(&FieldCategory::SkillPrio).unwrap();
        assert_eq!(json, "\"skill_prio\"");
    }

    #[test]
    fn field_values_are_untagged() {
        let update = FieldUpdate::new(FieldCategory::Skills, "Dodge", 43);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["value"], 43);
        assert_eq!(json["field"], "Dodge");
        assert_eq!(json["category"], "skills");
    }
}
