use serde::{Deserialize, Serialize};

/// One entry of the server's user cache: the stable player UUID and the last
/// known display name. Names are treated as unique for lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub uuid: String,
    pub name: String,
}

impl RosterEntry {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}
