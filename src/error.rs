//! Error types for db-schema-diff

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the schema model, the serializer and the catalog builder
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Unknown type discriminator '{discriminator}' in list {list}")]
    UnknownDiscriminator {
        list: String,
        discriminator: String,
    },

    #[error("Unsupported version {found} (reader knows up to {known})")]
    UnsupportedVersion { found: u8, known: u8 },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Object type {code} is not implemented for {context}")]
    VariantNotImplemented { code: String, context: String },

    #[error("Unknown object type code: {code}")]
    UnknownObjectTypeCode { code: String },

    #[error("Unknown SQL type name: {type_name}")]
    UnknownSqlType { type_name: String },

    #[error("Parent object {parent} of {object} not found")]
    MissingParentObject { object: String, parent: String },

    #[error("Failed to read snapshot: {path}")]
    SnapshotReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write snapshot to {path}")]
    SnapshotWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write script to {path}")]
    ScriptWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot format: {message}")]
    InvalidSnapshotFormat { message: String },

    #[error("XML error: {message}")]
    XmlError { message: String },
}

impl SchemaError {
    pub(crate) fn serialization(message: impl Into<String>) -> Self {
        SchemaError::Serialization {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for SchemaError {
    fn from(err: std::io::Error) -> Self {
        SchemaError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for SchemaError {
    fn from(err: quick_xml::Error) -> Self {
        SchemaError::XmlError {
            message: err.to_string(),
        }
    }
}

impl From<roxmltree::Error> for SchemaError {
    fn from(err: roxmltree::Error) -> Self {
        SchemaError::XmlError {
            message: err.to_string(),
        }
    }
}
