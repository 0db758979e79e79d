use std::fmt;

use crate::profile::Profile;
use crate::Result;

/// Text encoded into the share QR code: a compact JSON object with the
/// keys `name`, `bio` and `website`, in that order.
#[derive(Eq, PartialEq, Hash, Clone, Debug)]
pub struct Payload(String);

impl Payload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the payload back into the profile it was made from.
    pub fn decode(&self) -> Result<Profile> {
        deserialize(&self.0)
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn serialize(profile: &Profile) -> Result<Payload> {
    let json = serde_json::to_string(profile)?;
    log::trace!("Serialized profile into {} bytes", json.len());
    Ok(Payload(json))
}

/// Missing or unknown keys are rejected.
pub fn deserialize(payload: &str) -> Result<Profile> {
    Ok(serde_json::from_str(payload)?)
}
