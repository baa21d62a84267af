//! Versioned, symmetric (de)serialization of the schema model
//!
//! Every entity declares its fields once in [`DeSerialize::de_serialize`].
//! The same code path writes when handed a writer and reads when handed a
//! reader: each `read_write_*` call takes the field by `&mut`, emits it in
//! write mode and overwrites it in read mode.

mod binary;
mod entities;
mod snapshot;
mod xml;

pub use binary::{BinaryReader, BinaryWriter};
pub use entities::resolve_routine_parameter;
pub use snapshot::{
    catalog_checksum, decode_snapshot, encode_snapshot, encode_snapshot_at, load_snapshot,
    save_snapshot, save_snapshot_at, Snapshot, SnapshotFormat,
};
pub use xml::{XmlReader, XmlWriter};

use crate::error::SchemaError;
use crate::model::Catalog;

/// Entity that can be written to and read from an [`ObjectReadWriter`]
pub trait DeSerialize {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError>;
}

/// Two-way field codec. Field names are ignored by the binary form and
/// become element names in the XML form.
pub trait ObjectReadWriter: Sized {
    /// `true` when fields are being filled from the underlying source
    fn is_reading(&self) -> bool;

    fn read_write_u8(&mut self, name: &str, value: &mut u8) -> Result<(), SchemaError>;
    fn read_write_i32(&mut self, name: &str, value: &mut i32) -> Result<(), SchemaError>;
    fn read_write_i64(&mut self, name: &str, value: &mut i64) -> Result<(), SchemaError>;
    fn read_write_bool(&mut self, name: &str, value: &mut bool) -> Result<(), SchemaError>;
    fn read_write_string(&mut self, name: &str, value: &mut String) -> Result<(), SchemaError>;
    fn read_write_string_opt(
        &mut self,
        name: &str,
        value: &mut Option<String>,
    ) -> Result<(), SchemaError>;

    fn begin_object(&mut self, name: &str) -> Result<(), SchemaError>;
    fn end_object(&mut self) -> Result<(), SchemaError>;

    /// Records `len` when writing; returns the stored element count when reading
    fn begin_list(&mut self, name: &str, len: usize) -> Result<usize, SchemaError>;
    fn end_list(&mut self) -> Result<(), SchemaError>;

    /// Per-entity version byte. Reading a version newer than `current` fails.
    fn read_write_version(&mut self, current: u8) -> Result<u8, SchemaError> {
        let mut version = current;
        self.read_write_u8("Version", &mut version)?;
        if version > current {
            return Err(SchemaError::UnsupportedVersion {
                found: version,
                known: current,
            });
        }
        Ok(version)
    }

    fn read_write_object<T: DeSerialize>(
        &mut self,
        name: &str,
        value: &mut T,
    ) -> Result<(), SchemaError> {
        self.begin_object(name)?;
        value.de_serialize(self)?;
        self.end_object()
    }

    fn read_write_list<T: DeSerialize + Default>(
        &mut self,
        name: &str,
        values: &mut Vec<T>,
    ) -> Result<(), SchemaError> {
        let count = self.begin_list(name, values.len())?;
        if self.is_reading() {
            values.clear();
            for _ in 0..count {
                let mut item = T::default();
                self.read_write_object("Item", &mut item)?;
                values.push(item);
            }
        } else {
            for item in values.iter_mut() {
                self.read_write_object("Item", item)?;
            }
        }
        self.end_list()
    }

    /// List whose elements may be of several concrete kinds. Each element is
    /// preceded by its discriminator; `resolve` maps a discriminator read
    /// back to an empty instance of the right kind.
    fn read_write_poly_list<T, D, F>(
        &mut self,
        name: &str,
        values: &mut Vec<T>,
        discriminator: D,
        resolve: F,
    ) -> Result<(), SchemaError>
    where
        T: DeSerialize,
        D: Fn(&T) -> &'static str,
        F: Fn(&str) -> Option<T>,
    {
        let count = self.begin_list(name, values.len())?;
        if self.is_reading() {
            values.clear();
            for _ in 0..count {
                self.begin_object("Item")?;
                let mut type_name = String::new();
                self.read_write_string("Type", &mut type_name)?;
                let mut item =
                    resolve(&type_name).ok_or_else(|| SchemaError::UnknownDiscriminator {
                        list: name.to_string(),
                        discriminator: type_name.clone(),
                    })?;
                item.de_serialize(self)?;
                self.end_object()?;
                values.push(item);
            }
        } else {
            for item in values.iter_mut() {
                self.begin_object("Item")?;
                let mut type_name = discriminator(item).to_string();
                self.read_write_string("Type", &mut type_name)?;
                item.de_serialize(self)?;
                self.end_object()?;
            }
        }
        self.end_list()
    }
}

/// Binary encoding of a catalog (no snapshot envelope)
pub fn to_bytes(catalog: &Catalog) -> Result<Vec<u8>, SchemaError> {
    let mut writer = BinaryWriter::new(Vec::new());
    // Writing only reads the fields; the clone keeps the input untouched.
    let mut value = catalog.clone();
    writer.read_write_object("Catalog", &mut value)?;
    Ok(writer.into_inner())
}

pub fn from_bytes(data: &[u8]) -> Result<Catalog, SchemaError> {
    let mut reader = BinaryReader::new(data);
    let mut catalog = Catalog::default();
    reader.read_write_object("Catalog", &mut catalog)?;
    reader.finish()?;
    Ok(catalog)
}

/// XML encoding of a catalog (no snapshot envelope)
pub fn to_xml(catalog: &Catalog) -> Result<String, SchemaError> {
    let mut writer = XmlWriter::new(Vec::new());
    let mut value = catalog.clone();
    writer.read_write_object("Catalog", &mut value)?;
    let bytes = writer.into_inner();
    String::from_utf8(bytes).map_err(|e| SchemaError::serialization(e.to_string()))
}

pub fn from_xml(text: &str) -> Result<Catalog, SchemaError> {
    let doc = roxmltree::Document::parse(text)?;
    let mut reader = XmlReader::new(doc.root());
    let mut catalog = Catalog::default();
    reader.read_write_object("Catalog", &mut catalog)?;
    reader.finish()?;
    Ok(catalog)
}
