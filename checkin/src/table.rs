//! Field ownership table.
//!
//! Maps each check-in section to the single role allowed to sign it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::types::{CheckinError, CheckinField, Result, Role};

/// Section → owning role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTable {
    owners: BTreeMap<CheckinField, Role>,
}

/// YAML shape: field id → role display name.
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
struct RawTable(BTreeMap<String, String>);

impl OwnershipTable {
    /// Table with no owners. Only admins can edit anything.
    pub fn empty() -> Self {
        Self {
            owners: BTreeMap::new(),
        }
    }

    /// The standard check-in form.
    pub fn standard() -> Self {
        Self {
            owners: CheckinField::all()
                .into_iter()
                .map(|field| (field, field.default_owner()))
                .collect(),
        }
    }

    /// Assign an owner.
    ///
    /// A [`Role::Other`] owner is kept but grants nobody edit access.
    pub fn with_owner(mut self, field: CheckinField, role: Role) -> Self {
        self.owners.insert(field, role);
        self
    }

    /// Remove a section's owner, leaving it admin-only.
    pub fn without_owner(mut self, field: CheckinField) -> Self {
        self.owners.remove(&field);
        self
    }

    /// Role required for a section, by wire id.
    pub fn required_role(&self, field_id: &str) -> Option<&Role> {
        CheckinField::from_id(field_id).and_then(|field| self.owner(field))
    }

    /// Role required for a section.
    pub fn owner(&self, field: CheckinField) -> Option<&Role> {
        self.owners.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckinField, &Role)> {
        self.owners.iter().map(|(field, role)| (*field, role))
    }

    /// Load from YAML mapping field ids to role display names.
    ///
    /// Unknown field ids and role names are rejected.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let RawTable(raw) = serde_yaml::from_str(yaml)?;

        let mut owners = BTreeMap::new();
        for (field_id, role_name) in raw {
            let field = CheckinField::from_id(&field_id)
                .ok_or_else(|| CheckinError::UnknownField(field_id.clone()))?;
            let role = Role::from_display_name(&role_name);
            if !role.is_known() {
                return Err(CheckinError::UnknownRole(role_name));
            }
            owners.insert(field, role);
        }

        info!(fields = owners.len(), "Loaded check-in ownership table");
        Ok(Self { owners })
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        let raw = RawTable(
            self.owners
                .iter()
                .map(|(field, role)| (field.id().to_string(), role.display_name().to_string()))
                .collect(),
        );
        Ok(serde_yaml::to_string(&raw)?)
    }
}

impl Default for OwnershipTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = OwnershipTable::standard();
        assert_eq!(table.required_role("quality_manager"), Some(&Role::QualityManager));
        assert_eq!(table.required_role("methodes_uap2"), Some(&Role::MethodesUap2));
        assert_eq!(table.required_role("unknown_section"), None);
        assert_eq!(table.iter().count(), CheckinField::all().len());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let table = OwnershipTable::standard();
        let yaml = table.to_yaml().unwrap();
        assert!(yaml.contains("quality_manager: Quality Manager"));
        assert_eq!(OwnershipTable::from_yaml(&yaml).unwrap(), table);
    }

    #[test]
    fn test_yaml_subset() {
        let table = OwnershipTable::from_yaml("quality_manager: Quality Manager\nhse_manager: HSE Manager\n").unwrap();
        assert_eq!(table.iter().count(), 2);
        assert_eq!(table.required_role("launch_manager"), None);
    }

    #[test]
    fn test_yaml_rejects_unknown_entries() {
        assert!(matches!(
            OwnershipTable::from_yaml("night_shift: Quality Manager\n"),
            Err(CheckinError::UnknownField(_))
        ));
        assert!(matches!(
            OwnershipTable::from_yaml("quality_manager: Night Shift Lead\n"),
            Err(CheckinError::UnknownRole(_))
        ));
        assert!(matches!(
            OwnershipTable::from_yaml("quality_manager: quality manager\n"),
            Err(CheckinError::UnknownRole(ref name)) if name == "quality manager"
        ));
        assert!(matches!(
            OwnershipTable::from_yaml("- not a map\n"),
            Err(CheckinError::Config(_))
        ));
    }
}
