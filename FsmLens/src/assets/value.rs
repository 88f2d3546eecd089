//! Template-driven value reading
//!
//! Walks a [`TemplateField`] tree and reads the matching values from an
//! object's bytes. Only what name resolution needs is materialized: integers,
//! floats, booleans, strings and nested composites/arrays. Unknown leaf types
//! with a known byte size are skipped.

use super::reader::{AssetReadExt, align4, skip};
use super::schema::TemplateField;
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek};

/// Upper bound for pre-allocating array storage from an untrusted count.
const MAX_PREALLOC: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum ValueData {
    None,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<ValueField>),
    /// Raw bytes that were skipped.
    Skipped(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueField {
    pub name: String,
    pub type_name: String,
    pub data: ValueData,
    pub children: Vec<ValueField>,
}

impl ValueField {
    /// Direct child by name.
    pub fn get(&self, name: &str) -> Option<&ValueField> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct child by name, or [`Error::FieldNotFound`].
    pub fn field(&self, name: &str) -> Result<&ValueField> {
        self.get(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.data {
            ValueData::Int(v) => Some(v),
            ValueData::UInt(v) => i64::try_from(v).ok(),
            ValueData::Bool(v) => Some(i64::from(v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            ValueData::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Read one value (and its children) described by `template`.
pub fn read_value<R: Read + Seek + ?Sized>(reader: &mut R, template: &TemplateField) -> Result<ValueField> {
    let mut children = Vec::new();

    let data = if template.is_array {
        read_array(reader, template)?
    } else if template.type_name == "string" {
        let s = reader.read_count_string()?;
        // the string's inner char array carries the alignment flag
        if template.children.first().is_some_and(|c| c.align) {
            align4(reader)?;
        }
        ValueData::String(s)
    } else if template.children.is_empty() {
        read_primitive(reader, template)?
    } else {
        for child in &template.children {
            children.push(read_value(reader, child)?);
        }
        ValueData::None
    };

    if template.align {
        align4(reader)?;
    }

    Ok(ValueField {
        name: template.name.clone(),
        type_name: template.type_name.clone(),
        data,
        children,
    })
}

fn read_array<R: Read + Seek + ?Sized>(reader: &mut R, template: &TemplateField) -> Result<ValueData> {
    let element = template.children.get(1).ok_or_else(|| {
        Error::MalformedSchema(format!("array '{}' has no element template", template.name))
    })?;

    let count = reader.read_i32_le()?;
    let count = usize::try_from(count).map_err(|_| Error::InvalidCount(i64::from(count)))?;

    let mut elements = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        elements.push(read_value(reader, element)?);
    }
    Ok(ValueData::Array(elements))
}

fn read_primitive<R: Read + Seek + ?Sized>(reader: &mut R, template: &TemplateField) -> Result<ValueData> {
    let eof = Error::from_read;
    let data = match template.type_name.as_str() {
        "bool" => ValueData::Bool(reader.read_bool_u8()?),
        "SInt8" => ValueData::Int(i64::from(reader.read_i8().map_err(eof)?)),
        "UInt8" | "char" => ValueData::UInt(u64::from(reader.read_u8().map_err(eof)?)),
        "SInt16" | "short" => ValueData::Int(i64::from(reader.read_i16::<LittleEndian>().map_err(eof)?)),
        "UInt16" | "unsigned short" => {
            ValueData::UInt(u64::from(reader.read_u16::<LittleEndian>().map_err(eof)?))
        }
        "int" | "SInt32" | "Type*" => ValueData::Int(i64::from(reader.read_i32_le()?)),
        "UInt32" | "unsigned int" => {
            ValueData::UInt(u64::from(reader.read_u32::<LittleEndian>().map_err(eof)?))
        }
        "SInt64" | "long long" | "FileSize" => ValueData::Int(reader.read_i64_le()?),
        "UInt64" | "unsigned long long" => ValueData::UInt(reader.read_u64::<LittleEndian>().map_err(eof)?),
        "float" => ValueData::Float(f64::from(reader.read_f32_le()?)),
        "double" => ValueData::Float(reader.read_f64::<LittleEndian>().map_err(eof)?),
        other => {
            let size = usize::try_from(template.byte_size).map_err(|_| {
                Error::MalformedSchema(format!("leaf '{}' of type '{other}' has no fixed size", template.name))
            })?;
            skip(reader, size as u64)?;
            ValueData::Skipped(size)
        }
    };
    Ok(data)
}
