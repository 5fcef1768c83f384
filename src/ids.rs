// region:    --- Imports
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// endregion: --- Imports

/// Tenant (auction house) every row belongs to. Repository calls cannot be made without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub i64);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A caller-supplied reference to an entity: either the numeric primary key or
/// a textual handle (public id, or e-mail for users).
///
/// JSON numbers and strings are both accepted. Strings that look like numbers are
/// tried as primary keys first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Numeric(i64),
    Text(String),
}

impl Identifier {
    pub fn numeric(&self) -> Option<i64> {
        match self {
            Identifier::Numeric(id) => Some(*id),
            Identifier::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Identifier::Numeric(id) => Cow::Owned(id.to_string()),
            Identifier::Text(text) => Cow::Borrowed(text.trim()),
        }
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        Identifier::Numeric(id)
    }
}

impl From<&str> for Identifier {
    fn from(text: &str) -> Self {
        Identifier::Text(text.to_string())
    }
}

impl From<String> for Identifier {
    fn from(text: String) -> Self {
        Identifier::Text(text)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
