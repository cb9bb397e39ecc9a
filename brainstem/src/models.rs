//! The platform's resource model: a closed set of model names, each
//! belonging to exactly one API app namespace.

use crate::errors::{UnknownPortal, UnknownResourceType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visibility scope of a request. Changes the access-control domain,
/// not the record shape.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Public,
    Private,
    Super,
}

impl Portal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Portal::Public => "public",
            Portal::Private => "private",
            Portal::Super => "super",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Portal {
    type Err = UnknownPortal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Portal::Public),
            "private" => Ok(Portal::Private),
            "super" => Ok(Portal::Super),
            _ => Err(UnknownPortal(s.to_string())),
        }
    }
}

/// API app namespace grouping a family of resource types.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Namespace {
    Stem,
    Modules,
    PersonalAttributes,
    Resources,
    Taxonomies,
    Attributes,
    Users,
    Auth,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Stem => "stem",
            Namespace::Modules => "modules",
            Namespace::PersonalAttributes => "personal_attributes",
            Namespace::Resources => "resources",
            Namespace::Taxonomies => "taxonomies",
            Namespace::Attributes => "attributes",
            Namespace::Users => "users",
            Namespace::Auth => "auth",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named category of remote record.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Project,
    Subject,
    Dataset,
    Collection,
    Action,
    Behavior,
    ExperimentData,
    Manipulation,
    SubjectStateChange,
    ActionLog,
    SubjectLog,
    BehavioralParadigm,
    DataRepository,
    PhysicalEnvironment,
    Consumable,
    HardwareDevice,
    Supplier,
    BrainRegion,
    EnvironmentType,
    SensoryStimulusType,
    Species,
    Strain,
    StrainApproval,
    Journal,
    Laboratory,
    Publication,
    JournalApproval,
    User,
    Group,
}

/// Every resource type, in declaration order.
pub const ALL_RESOURCE_TYPES: [ResourceType; 29] = [
    ResourceType::Project,
    ResourceType::Subject,
    ResourceType::Dataset,
    ResourceType::Collection,
    ResourceType::Action,
    ResourceType::Behavior,
    ResourceType::ExperimentData,
    ResourceType::Manipulation,
    ResourceType::SubjectStateChange,
    ResourceType::ActionLog,
    ResourceType::SubjectLog,
    ResourceType::BehavioralParadigm,
    ResourceType::DataRepository,
    ResourceType::PhysicalEnvironment,
    ResourceType::Consumable,
    ResourceType::HardwareDevice,
    ResourceType::Supplier,
    ResourceType::BrainRegion,
    ResourceType::EnvironmentType,
    ResourceType::SensoryStimulusType,
    ResourceType::Species,
    ResourceType::Strain,
    ResourceType::StrainApproval,
    ResourceType::Journal,
    ResourceType::Laboratory,
    ResourceType::Publication,
    ResourceType::JournalApproval,
    ResourceType::User,
    ResourceType::Group,
];

impl ResourceType {
    /// Model name as it appears in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Project => "project",
            ResourceType::Subject => "subject",
            ResourceType::Dataset => "dataset",
            ResourceType::Collection => "collection",
            ResourceType::Action => "action",
            ResourceType::Behavior => "behavior",
            ResourceType::ExperimentData => "experimentdata",
            ResourceType::Manipulation => "manipulation",
            ResourceType::SubjectStateChange => "subjectstatechange",
            ResourceType::ActionLog => "actionlog",
            ResourceType::SubjectLog => "subjectlog",
            ResourceType::BehavioralParadigm => "behavioralparadigm",
            ResourceType::DataRepository => "datarepository",
            ResourceType::PhysicalEnvironment => "physicalenvironment",
            ResourceType::Consumable => "consumable",
            ResourceType::HardwareDevice => "hardwaredevice",
            ResourceType::Supplier => "supplier",
            ResourceType::BrainRegion => "brainregion",
            ResourceType::EnvironmentType => "environmenttype",
            ResourceType::SensoryStimulusType => "sensorystimulustype",
            ResourceType::Species => "species",
            ResourceType::Strain => "strain",
            ResourceType::StrainApproval => "strainapproval",
            ResourceType::Journal => "journal",
            ResourceType::Laboratory => "laboratory",
            ResourceType::Publication => "publication",
            ResourceType::JournalApproval => "journalapproval",
            ResourceType::User => "user",
            ResourceType::Group => "group",
        }
    }

    /// The app namespace the model belongs to. Total over the enum, so
    /// a URL with an empty app segment is unrepresentable.
    pub fn namespace(&self) -> Namespace {
        match self {
            ResourceType::Project
            | ResourceType::Subject
            | ResourceType::Dataset
            | ResourceType::Collection => Namespace::Stem,
            ResourceType::Action
            | ResourceType::Behavior
            | ResourceType::ExperimentData
            | ResourceType::Manipulation
            | ResourceType::SubjectStateChange
            | ResourceType::ActionLog
            | ResourceType::SubjectLog => Namespace::Modules,
            ResourceType::BehavioralParadigm
            | ResourceType::DataRepository
            | ResourceType::PhysicalEnvironment => Namespace::PersonalAttributes,
            ResourceType::Consumable | ResourceType::HardwareDevice | ResourceType::Supplier => {
                Namespace::Resources
            }
            ResourceType::BrainRegion
            | ResourceType::EnvironmentType
            | ResourceType::SensoryStimulusType
            | ResourceType::Species
            | ResourceType::Strain
            | ResourceType::StrainApproval => Namespace::Taxonomies,
            ResourceType::Journal
            | ResourceType::Laboratory
            | ResourceType::Publication
            | ResourceType::JournalApproval => Namespace::Attributes,
            ResourceType::User => Namespace::Users,
            ResourceType::Group => Namespace::Auth,
        }
    }

    /// Key under which a single record is nested in a response body,
    /// e.g. `{"experiment_data": {...}}`.
    pub fn singular_key(&self) -> &'static str {
        match self {
            ResourceType::Project => "project",
            ResourceType::Subject => "subject",
            ResourceType::Dataset => "dataset",
            ResourceType::Collection => "collection",
            ResourceType::Action => "action",
            ResourceType::Behavior => "behavior",
            ResourceType::ExperimentData => "experiment_data",
            ResourceType::Manipulation => "manipulation",
            ResourceType::SubjectStateChange => "subject_state_change",
            ResourceType::ActionLog => "action_log",
            ResourceType::SubjectLog => "subject_log",
            ResourceType::BehavioralParadigm => "behavioral_paradigm",
            ResourceType::DataRepository => "data_repository",
            ResourceType::PhysicalEnvironment => "physical_environment",
            ResourceType::Consumable => "consumable",
            ResourceType::HardwareDevice => "hardware_device",
            ResourceType::Supplier => "supplier",
            ResourceType::BrainRegion => "brain_region",
            ResourceType::EnvironmentType => "environment_type",
            ResourceType::SensoryStimulusType => "sensory_stimulus_type",
            ResourceType::Species => "species",
            ResourceType::Strain => "strain",
            ResourceType::StrainApproval => "strain_approval",
            ResourceType::Journal => "journal",
            ResourceType::Laboratory => "laboratory",
            ResourceType::Publication => "publication",
            ResourceType::JournalApproval => "journal_approval",
            ResourceType::User => "user",
            ResourceType::Group => "group",
        }
    }

    /// Key under which a collection of records is nested in a response
    /// body, e.g. `{"datasets": [...]}`.
    pub fn list_key(&self) -> &'static str {
        match self {
            ResourceType::Project => "projects",
            ResourceType::Subject => "subjects",
            ResourceType::Dataset => "datasets",
            ResourceType::Collection => "collections",
            ResourceType::Action => "actions",
            ResourceType::Behavior => "behaviors",
            // the server uses the same key for one and for many
            ResourceType::ExperimentData => "experiment_data",
            ResourceType::Manipulation => "manipulations",
            ResourceType::SubjectStateChange => "subject_state_changes",
            ResourceType::ActionLog => "action_logs",
            ResourceType::SubjectLog => "subject_logs",
            ResourceType::BehavioralParadigm => "behavioral_paradigms",
            ResourceType::DataRepository => "data_repositories",
            ResourceType::PhysicalEnvironment => "physical_environments",
            ResourceType::Consumable => "consumables",
            ResourceType::HardwareDevice => "hardware_devices",
            ResourceType::Supplier => "suppliers",
            ResourceType::BrainRegion => "brain_regions",
            ResourceType::EnvironmentType => "environment_types",
            ResourceType::SensoryStimulusType => "sensory_stimulus_types",
            ResourceType::Species => "species",
            ResourceType::Strain => "strains",
            ResourceType::StrainApproval => "strain_approvals",
            ResourceType::Journal => "journals",
            ResourceType::Laboratory => "laboratories",
            ResourceType::Publication => "publications",
            ResourceType::JournalApproval => "journal_approvals",
            ResourceType::User => "users",
            ResourceType::Group => "groups",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    /// Unknown model names are rejected here, at the boundary, before
    /// any URL is constructed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_RESOURCE_TYPES
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| UnknownResourceType(s.to_string()))
    }
}
