//! Region records returned by a successful lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::binary::{decode_u32_le, CITY_ID_LENGTH};
use crate::{Error, Result};

/// A decoded data record.
///
/// `region` is kept as the raw text stored in the index (typically
/// `country|area|province|city|isp`); splitting it is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Opaque city identifier
    pub city_id: u32,
    /// Region text
    pub region: String,
}

impl RegionInfo {
    /// Create a new record.
    pub fn new(city_id: u32, region: impl Into<String>) -> Self {
        Self {
            city_id,
            region: region.into(),
        }
    }

    /// Decode a record: 4-byte little-endian city id followed by UTF-8 text.
    pub fn decode(record: &[u8]) -> Result<Self> {
        if record.len() < CITY_ID_LENGTH {
            return Err(Error::corrupt(format!(
                "data record of {} bytes is shorter than its city id",
                record.len()
            )));
        }

        let city_id = decode_u32_le(record, 0)?;
        let region = std::str::from_utf8(&record[CITY_ID_LENGTH..])
            .map_err(|e| Error::corrupt(format!("region text is not UTF-8: {}", e)))?;

        Ok(Self::new(city_id, region))
    }
}

impl fmt::Display for RegionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.city_id, self.region)
    }
}
