//! Denormalized dataset metadata for file-format conversion.
//!
//! This is a hand-specialized pass over a fixed set of relations, not
//! a generic graph walk: the traversal order matters because later
//! hops consume ids produced by earlier ones. A missing required
//! relation aborts the whole traversal; the data repository and action
//! branches are optional and skipped when their id lists are empty.

use crate::errors::AggregateError;
use crate::models::{Portal, ResourceType};
use crate::StemClient;
use serde_json::Value;

fn id_of(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// An id-valued field the traversal cannot continue without.
fn required_id(
    record: &Value,
    model: ResourceType,
    field: &'static str,
) -> Result<String, AggregateError> {
    record
        .get(field)
        .and_then(id_of)
        .ok_or(AggregateError::MissingRelation { model, field })
}

/// First entry of an id-list field the traversal cannot continue without.
fn required_first_id(
    record: &Value,
    model: ResourceType,
    field: &'static str,
) -> Result<String, AggregateError> {
    record
        .get(field)
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
        .and_then(id_of)
        .ok_or(AggregateError::MissingRelation { model, field })
}

fn optional_first_id(record: &Value, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
        .and_then(id_of)
}

fn drop_keys(record: &mut Value, keys: &[&str]) {
    if let Some(object) = record.as_object_mut() {
        for key in keys {
            object.remove(*key);
        }
    }
}

fn inline(record: &mut Value, key: &str, resolved: Value) {
    if let Some(object) = record.as_object_mut() {
        object.insert(key.to_string(), resolved);
    }
}

pub(crate) async fn dataset_metadata(
    client: &StemClient,
    portal: Portal,
    dataset_id: &str,
) -> Result<Value, AggregateError> {
    let mut dataset = client
        .load_one(ResourceType::Dataset, portal, dataset_id)
        .await?;

    // project, minus its back-references to subjects and datasets
    let project_id = required_first_id(&dataset, ResourceType::Dataset, "projects")?;
    let mut project = client
        .load_one(ResourceType::Project, portal, &project_id)
        .await?;
    drop_keys(&mut project, &["subjects", "datasets"]);
    drop_keys(&mut dataset, &["projects"]);
    inline(&mut dataset, "project", project);

    // experiment data with its hardware device and the device's supplier
    let experiment_data_id = required_first_id(&dataset, ResourceType::Dataset, "experimentdata")?;
    let mut experiment_data = client
        .load_one(ResourceType::ExperimentData, portal, &experiment_data_id)
        .await?;
    let hardware_device_id = required_id(
        &experiment_data,
        ResourceType::ExperimentData,
        "hardware_device",
    )?;
    let mut hardware_device = client
        .load_one(ResourceType::HardwareDevice, portal, &hardware_device_id)
        .await?;
    let supplier_id = required_id(&hardware_device, ResourceType::HardwareDevice, "supplier")?;
    let supplier = client
        .load_one(ResourceType::Supplier, portal, &supplier_id)
        .await?;
    inline(&mut experiment_data, "supplier", supplier);
    drop_keys(&mut hardware_device, &["supplier"]);
    inline(&mut experiment_data, "hardware_device", hardware_device);
    drop_keys(&mut experiment_data, &["dataset"]);
    let action_id = optional_first_id(&experiment_data, "actions");
    drop_keys(&mut dataset, &["experimentdata"]);
    inline(&mut dataset, "experiment_data", experiment_data);

    // data repository, when the dataset names one
    if let Some(data_repository_id) = optional_first_id(&dataset, "datarepositories") {
        let data_repository = client
            .load_one(ResourceType::DataRepository, portal, &data_repository_id)
            .await?;
        drop_keys(&mut dataset, &["datarepositories"]);
        inline(&mut dataset, "data_repository", data_repository);
    }

    // action and its subject, when the experiment data names an action
    if let Some(action_id) = action_id {
        let mut action = client
            .load_one(ResourceType::Action, portal, &action_id)
            .await?;
        let brain_region_id = required_id(&action, ResourceType::Action, "brain_region")?;
        let brain_region = client
            .load_one(ResourceType::BrainRegion, portal, &brain_region_id)
            .await?;
        inline(&mut action, "brain_region", brain_region);
        let subject_id = required_id(&action, ResourceType::Action, "subject")?;
        inline(&mut dataset, "action", action);

        let mut subject = client
            .load_one(ResourceType::Subject, portal, &subject_id)
            .await?;
        let strain_id = required_id(&subject, ResourceType::Subject, "strain")?;
        let mut strain = client
            .load_one(ResourceType::Strain, portal, &strain_id)
            .await?;
        let species_id = required_id(&strain, ResourceType::Strain, "species")?;
        let species = client
            .load_one(ResourceType::Species, portal, &species_id)
            .await?;
        drop_keys(&mut strain, &["species"]);
        inline(&mut subject, "strain", strain);
        inline(&mut subject, "species", species);
        drop_keys(&mut subject, &["projects", "actions"]);
        inline(&mut dataset, "subject", subject);
    }

    Ok(dataset)
}
