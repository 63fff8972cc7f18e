use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry;

/// Why a candidate measurement set was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("{field} = {value} exceeds maximum {max}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// One complete, schema-valid set of measurement values. Can only be built
/// through [`MeasurementVector::new`], so holding one proves every registered
/// field is present, no extra fields exist, and every value is in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct MeasurementVector {
    values: BTreeMap<String, u32>,
}

impl MeasurementVector {
    /// Validate `values` against the field registry.
    pub fn new(values: BTreeMap<String, u32>) -> Result<Self, ValidationError> {
        for name in values.keys() {
            if registry::max_of(name).is_none() {
                return Err(ValidationError::UnknownField(name.clone()));
            }
        }
        for spec in &registry::FIELDS {
            match values.get(spec.name) {
                None => return Err(ValidationError::MissingField(spec.name)),
                Some(&value) if value > spec.max => {
                    return Err(ValidationError::OutOfRange {
                        field: spec.name,
                        value,
                        max: spec.max,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(MeasurementVector { values })
    }

    /// Every registered field at 0. Useful as a baseline for overrides.
    pub fn zeroed() -> Self {
        let values = registry::all_field_names()
            .map(|name| (name.to_string(), 0))
            .collect();
        MeasurementVector { values }
    }

    pub fn get(&self, field: &str) -> Option<u32> {
        self.values.get(field).copied()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl TryFrom<BTreeMap<String, u32>> for MeasurementVector {
    type Error = ValidationError;

    fn try_from(values: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        MeasurementVector::new(values)
    }
}

impl From<MeasurementVector> for BTreeMap<String, u32> {
    fn from(vector: MeasurementVector) -> Self {
        vector.values
    }
}
