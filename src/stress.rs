use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The inference service encodes classes as 0/1/2 on the wire; any other
/// code fails decoding and is never stored as a valid class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StressClass {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognized stress code {0}")]
pub struct UnknownStressCode(pub u8);

impl StressClass {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(StressClass::Low),
            1 => Some(StressClass::Medium),
            2 => Some(StressClass::High),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            StressClass::Low => 0,
            StressClass::Medium => 1,
            StressClass::High => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StressClass::Low => "Low",
            StressClass::Medium => "Medium",
            StressClass::High => "High",
        }
    }
}

impl TryFrom<u8> for StressClass {
    type Error = UnknownStressCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        StressClass::from_code(code).ok_or(UnknownStressCode(code))
    }
}

impl From<StressClass> for u8 {
    fn from(class: StressClass) -> Self {
        class.code()
    }
}

impl fmt::Display for StressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
