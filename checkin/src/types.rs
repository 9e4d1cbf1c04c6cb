//! Core types for check-in forms.
//!
//! Roles and form sections are closed enums with stable ids. Display names
//! coming from the identity provider are parsed once, at the edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A plant role.
///
/// Matches the role display names assigned in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Global administrator
    Admin,
    ProjectManager,
    BusinessManager,
    EngineeringManager,
    QualityManager,
    PlantQualityManager,
    IndustrialEngineeringManager,
    LaunchManager,
    MethodesUap1,
    MethodesUap2,
    MaintenanceManager,
    PurchasingManager,
    LogisticManager,
    HseManager,
    ProductionManager,
    /// A directory role this plant does not assign check-in sections to
    Other(String),
}

impl Role {
    /// Canonical display name.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::ProjectManager => "Project Manager",
            Self::BusinessManager => "Business Manager",
            Self::EngineeringManager => "Engineering Manager",
            Self::QualityManager => "Quality Manager",
            Self::PlantQualityManager => "Plant Quality Manager",
            Self::IndustrialEngineeringManager => "Industrial Engineering Manager",
            Self::LaunchManager => "Launch Manager",
            Self::MethodesUap1 => "Methodes UAP1",
            Self::MethodesUap2 => "Methodes UAP2",
            Self::MaintenanceManager => "Maintenance Manager",
            Self::PurchasingManager => "Purchasing Manager",
            Self::LogisticManager => "Logistic Manager",
            Self::HseManager => "HSE Manager",
            Self::ProductionManager => "Production Manager",
            Self::Other(name) => name,
        }
    }

    /// Every named role.
    pub fn known() -> Vec<Self> {
        vec![
            Self::Admin,
            Self::ProjectManager,
            Self::BusinessManager,
            Self::EngineeringManager,
            Self::QualityManager,
            Self::PlantQualityManager,
            Self::IndustrialEngineeringManager,
            Self::LaunchManager,
            Self::MethodesUap1,
            Self::MethodesUap2,
            Self::MaintenanceManager,
            Self::PurchasingManager,
            Self::LogisticManager,
            Self::HseManager,
            Self::ProductionManager,
        ]
    }

    /// Parse a display name.
    ///
    /// Only surrounding whitespace is dropped. Anything that is not exactly a
    /// canonical name stays [`Role::Other`].
    pub fn from_display_name(raw: &str) -> Self {
        let name = raw.trim();
        Self::known()
            .into_iter()
            .find(|role| role.display_name() == name)
            .unwrap_or_else(|| Self::Other(name.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_display_name(&raw))
    }
}

/// A role-owned section of the check-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CheckinField {
    ProjectManager,
    BusinessManager,
    EngineeringManager,
    QualityManager,
    PlantQualityManager,
    IndustrialEngineering,
    LaunchManager,
    MethodesUap1,
    MethodesUap2,
    MaintenanceManager,
    PurchasingManager,
    LogisticManager,
    HseManager,
    ProductionManager,
}

impl CheckinField {
    /// Stable wire id.
    pub fn id(&self) -> &'static str {
        match self {
            Self::ProjectManager => "project_manager",
            Self::BusinessManager => "business_manager",
            Self::EngineeringManager => "engineering_manager",
            Self::QualityManager => "quality_manager",
            Self::PlantQualityManager => "plant_quality_manager",
            Self::IndustrialEngineering => "industrial_engineering",
            Self::LaunchManager => "launch_manager",
            Self::MethodesUap1 => "methodes_uap1",
            Self::MethodesUap2 => "methodes_uap2",
            Self::MaintenanceManager => "maintenance_manager",
            Self::PurchasingManager => "purchasing_manager",
            Self::LogisticManager => "logistic_manager",
            Self::HseManager => "hse_manager",
            Self::ProductionManager => "production_manager",
        }
    }

    /// Role that owns this section in the standard form.
    pub fn default_owner(&self) -> Role {
        match self {
            Self::ProjectManager => Role::ProjectManager,
            Self::BusinessManager => Role::BusinessManager,
            Self::EngineeringManager => Role::EngineeringManager,
            Self::QualityManager => Role::QualityManager,
            Self::PlantQualityManager => Role::PlantQualityManager,
            Self::IndustrialEngineering => Role::IndustrialEngineeringManager,
            Self::LaunchManager => Role::LaunchManager,
            Self::MethodesUap1 => Role::MethodesUap1,
            Self::MethodesUap2 => Role::MethodesUap2,
            Self::MaintenanceManager => Role::MaintenanceManager,
            Self::PurchasingManager => Role::PurchasingManager,
            Self::LogisticManager => Role::LogisticManager,
            Self::HseManager => Role::HseManager,
            Self::ProductionManager => Role::ProductionManager,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|field| field.id() == id)
    }

    /// All sections in form order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::ProjectManager,
            Self::BusinessManager,
            Self::EngineeringManager,
            Self::QualityManager,
            Self::PlantQualityManager,
            Self::IndustrialEngineering,
            Self::LaunchManager,
            Self::MethodesUap1,
            Self::MethodesUap2,
            Self::MaintenanceManager,
            Self::PurchasingManager,
            Self::LogisticManager,
            Self::HseManager,
            Self::ProductionManager,
        ]
    }
}

impl fmt::Display for CheckinField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The user acting on a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub roles: BTreeSet<Role>,
}

impl Actor {
    pub fn new(name: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            name: name.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Build an actor from directory display names.
    pub fn from_display_names<'a>(name: impl Into<String>, roles: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(name, roles.into_iter().map(Role::from_display_name))
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

/// Stored value of one check-in section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RoleFieldValue {
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

/// Partial update to a section. `None` leaves a value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFieldUpdate {
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub when: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl RoleFieldUpdate {
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Default::default()
        }
    }

    pub fn with_when(mut self, when: impl Into<String>) -> Self {
        self.when = Some(when.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Error types for check-in operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckinError {
    /// Actor may not edit this section
    #[error("{actor} is not allowed to edit {field}")]
    EditDenied { field: String, actor: String },

    /// No such section
    #[error("Unknown check-in field: {0}")]
    UnknownField(String),

    /// Role name in configuration is not a plant role
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Malformed YAML configuration
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CheckinError>;
