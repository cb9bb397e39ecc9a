//! Mapping from an aggregated dataset metadata document to the
//! conversion-specification document consumed by the NWB converter.

use serde::Serialize;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(thiserror::Error, Debug)]
pub enum SpecError {
    /// The aggregated document lacks a field the spec needs.
    #[error("dataset metadata has no usable \"{0}\" field")]
    MissingField(&'static str),

    #[error("unsupported experiment modality \"{0}\"")]
    UnsupportedModality(String),

    #[error("\"date_time\" is not an RFC 3339 timestamp: {0}")]
    BadTimestamp(String),
}

/// The conversion-specification document. Serializes to the shape the
/// downstream converter expects.
#[derive(Serialize, Debug)]
pub struct ConversionSpec {
    pub metadata: TopMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_interfaces: Option<DataInterfaces>,
    pub experiments: Experiments,
}

#[derive(Serialize, Debug, Default)]
pub struct TopMetadata {
    #[serde(rename = "NWBFile")]
    pub nwb_file: TopNwbFile,
}

#[derive(Serialize, Debug, Default)]
pub struct TopNwbFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_description: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct DataInterfaces {
    pub recording: String,
}

#[derive(Serialize, Debug)]
pub struct Experiments {
    pub ecephys: Ecephys,
}

#[derive(Serialize, Debug)]
pub struct Ecephys {
    pub metadata: EcephysMetadata,
    pub sessions: Vec<Session>,
}

#[derive(Serialize, Debug)]
pub struct EcephysMetadata {
    #[serde(rename = "NWBFile")]
    pub nwb_file: EcephysNwbFile,
}

#[derive(Serialize, Debug)]
pub struct EcephysNwbFile {
    pub session_description: String,
}

#[derive(Serialize, Debug)]
pub struct Session {
    pub nwbfile_name: String,
    pub source_data: SourceData,
    pub metadata: SessionMetadata,
}

#[derive(Serialize, Debug)]
pub struct SourceData {
    pub recording: Map<String, Value>,
}

#[derive(Serialize, Debug)]
pub struct SessionMetadata {
    #[serde(rename = "NWBFile")]
    pub nwb_file: SessionNwbFile,
    #[serde(rename = "Subject")]
    pub subject: SubjectMetadata,
}

#[derive(Serialize, Debug)]
pub struct SessionNwbFile {
    pub session_id: String,
    pub session_start_time: String,
    pub identifier: String,
}

#[derive(Serialize, Debug)]
pub struct SubjectMetadata {
    pub subject_id: String,
    pub strain: String,
    pub sex: String,
    pub species: String,
    pub date_of_birth: String,
}

/// Recording interface used by the converter for data produced with a
/// supplier's hardware. Keyed by supplier name with spaces removed.
fn recording_interface(supplier: &str) -> Option<&'static str> {
    match supplier {
        "BlackrockMicrosystems" => Some("BlackrockRecordingInterface"),
        "CEDCambridgeElectronicdesignlimited" => Some("CEDRecordingInterface"),
        "IMEC" => Some("SpikeGLXRecordingInterface"),
        "IntanTechnologies" => Some("IntanRecordingInterface"),
        "JaneliaResearchCampus" => Some("SpikeGLXRecordingInterface"),
        "Neuralynx" => Some("NeuralynxRecordingInterface"),
        "OpenEphys" => Some("OpenEphysRecordingInterface"),
        "PlexonInstruments" => Some("PlexonRecordingInterface"),
        _ => None,
    }
}

fn get<'a>(document: &'a Value, path: &'static str) -> Result<&'a Value, SpecError> {
    let mut current = document;
    for segment in path.split('.') {
        current = current.get(segment).ok_or(SpecError::MissingField(path))?;
    }
    Ok(current)
}

fn get_str<'a>(document: &'a Value, path: &'static str) -> Result<&'a str, SpecError> {
    get(document, path)?
        .as_str()
        .ok_or(SpecError::MissingField(path))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build the conversion spec from an aggregated dataset metadata
/// document. Only extracellular experiment data is supported.
/// `interface_kwargs` are extra `source_data.recording` entries, e.g.
/// a `stream_name`, applied when the supplier maps to an interface.
pub fn build_conversion_spec(
    metadata: &Value,
    interface_kwargs: Option<Map<String, Value>>,
) -> Result<ConversionSpec, SpecError> {
    let modality = get_str(metadata, "experiment_data.type")?;
    if modality != "Extracellular" {
        return Err(SpecError::UnsupportedModality(modality.to_string()));
    }

    let date_time = get_str(metadata, "date_time")?;
    if date_time.is_empty() {
        return Err(SpecError::MissingField("date_time"));
    }
    let session_start_time = OffsetDateTime::parse(date_time, &Rfc3339)
        .map_err(|_| SpecError::BadTimestamp(date_time.to_string()))
        .and_then(|parsed| {
            parsed
                .format(&Rfc3339)
                .map_err(|_| SpecError::BadTimestamp(date_time.to_string()))
        })?;

    // descriptions are passed through verbatim
    let experiment_description = get_str(metadata, "project.description")
        .ok()
        .filter(|description| !description.is_empty())
        .map(str::to_string);

    let supplier = get_str(metadata, "experiment_data.supplier.name")?.replace(' ', "");
    let interface = recording_interface(&supplier);

    let mut recording = match (interface, interface_kwargs) {
        (Some(_), Some(kwargs)) => kwargs,
        _ => Map::new(),
    };
    // limited for now to the first protocol path
    let folder_path = get(metadata, "data_repository.data_protocols_json")?
        .as_array()
        .and_then(|protocols| protocols.first())
        .and_then(|protocol| protocol.get("path"))
        .and_then(Value::as_str)
        .ok_or(SpecError::MissingField(
            "data_repository.data_protocols_json",
        ))?;
    recording.insert(
        "folder_path".to_string(),
        Value::String(folder_path.to_string()),
    );

    let name = get_str(metadata, "name")?;
    let session = Session {
        nwbfile_name: format!("{}.nwb", name),
        source_data: SourceData { recording },
        metadata: SessionMetadata {
            nwb_file: SessionNwbFile {
                session_id: name.to_string(),
                session_start_time,
                identifier: get_str(metadata, "id")?.to_string(),
            },
            subject: SubjectMetadata {
                subject_id: get_str(metadata, "subject.name")?.to_string(),
                strain: get_str(metadata, "subject.strain.name")?.to_string(),
                sex: get_str(metadata, "subject.sex")?.to_string(),
                species: capitalize(get_str(metadata, "subject.species.description")?),
                date_of_birth: get_str(metadata, "subject.birth_date")?.to_string(),
            },
        },
    };

    Ok(ConversionSpec {
        metadata: TopMetadata {
            nwb_file: TopNwbFile {
                experiment_description,
            },
        },
        data_interfaces: interface.map(|name| DataInterfaces {
            recording: name.to_string(),
        }),
        experiments: Experiments {
            ecephys: Ecephys {
                metadata: EcephysMetadata {
                    nwb_file: EcephysNwbFile {
                        session_description: get_str(metadata, "experiment_data.description")?
                            .to_string(),
                    },
                },
                sessions: vec![session],
            },
        },
    })
}
