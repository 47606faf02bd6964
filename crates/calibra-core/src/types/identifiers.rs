//! Pyramid identifiers: policy areas, dimensions, question slots, clusters.
//!
//! Each identifier is a validated newtype over its ordinal. The string forms
//! (`PA01`, `DIM03`, `Q5`, `CL02`) are what configuration files and produced
//! artifacts use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CLUSTER_COUNT, DIMENSION_COUNT, POLICY_AREA_COUNT, SLOT_COUNT};

/// Error produced when parsing or constructing an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierError {
    pub input: String,
    pub expected: &'static str,
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid identifier {:?}, expected {}", self.input, self.expected)
    }
}

impl std::error::Error for IdentifierError {}

macro_rules! ordinal_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal, $width:literal, $max:expr, $expected:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(u8);

        impl $name {
            /// Construct from a 1-based ordinal.
            pub fn new(ordinal: u8) -> Result<Self, IdentifierError> {
                if (1..=$max).contains(&ordinal) {
                    Ok(Self(ordinal))
                } else {
                    Err(IdentifierError {
                        input: ordinal.to_string(),
                        expected: $expected,
                    })
                }
            }

            /// 1-based ordinal.
            pub fn ordinal(self) -> u8 {
                self.0
            }

            /// Zero-based index, handy for dense arrays.
            pub fn index(self) -> usize {
                usize::from(self.0 - 1)
            }

            /// Every identifier in ascending order.
            pub fn all() -> impl Iterator<Item = Self> {
                (1..=$max).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{:0", $width, "}"), self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let err = || IdentifierError {
                    input: s.to_string(),
                    expected: $expected,
                };
                let upper = s.trim().to_ascii_uppercase();
                let digits = upper.strip_prefix($prefix).ok_or_else(err)?;
                let ordinal: u8 = digits.parse().map_err(|_| err())?;
                Self::new(ordinal).map_err(|_| err())
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }
    };
}

ordinal_id!(
    /// Policy area `PA01`..`PA10`.
    PolicyArea,
    "PA",
    2,
    POLICY_AREA_COUNT,
    "PA01..PA10"
);

ordinal_id!(
    /// Analytical dimension `DIM01`..`DIM06`.
    Dimension,
    "DIM",
    2,
    DIMENSION_COUNT,
    "DIM01..DIM06"
);

ordinal_id!(
    /// Micro-question slot `Q1`..`Q5` within one (area, dimension) cell.
    Slot,
    "Q",
    1,
    SLOT_COUNT,
    "Q1..Q5"
);

ordinal_id!(
    /// Thematic cluster `CL01`..`CL04`.
    ClusterId,
    "CL",
    2,
    CLUSTER_COUNT,
    "CL01..CL04"
);

/// Key of one micro-score leaf: `PA03-DIM02-Q4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MicroKey {
    pub area: PolicyArea,
    pub dimension: Dimension,
    pub slot: Slot,
}

impl MicroKey {
    pub fn new(area: PolicyArea, dimension: Dimension, slot: Slot) -> Self {
        Self {
            area,
            dimension,
            slot,
        }
    }

    /// Id of the dimension node this leaf feeds.
    pub fn cell_id(&self) -> String {
        format!("{}-{}", self.area, self.dimension)
    }

    /// All 300 keys in canonical order (area, dimension, slot).
    pub fn all() -> impl Iterator<Item = Self> {
        PolicyArea::all().flat_map(|area| {
            Dimension::all()
                .flat_map(move |dimension| Slot::all().map(move |slot| Self::new(area, dimension, slot)))
        })
    }
}

impl fmt::Display for MicroKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.area, self.dimension, self.slot)
    }
}

impl FromStr for MicroKey {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(d), Some(q), None) => Ok(Self::new(a.parse()?, d.parse()?, q.parse()?)),
            _ => Err(IdentifierError {
                input: s.to_string(),
                expected: "PAxx-DIMxx-Qx",
            }),
        }
    }
}
