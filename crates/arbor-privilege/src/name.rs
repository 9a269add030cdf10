//! Privilege names.
//!
//! Privilege names are namespace-qualified strings such as `jcr:read`.
//! Unqualified names are accepted; a qualified name must have a non-empty
//! prefix and local part.

use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PrivilegeError, PrivilegeResult};

/// Unique name of a privilege.
///
/// # Example
///
/// ```
/// use arbor_privilege::PrivilegeName;
///
/// let read = PrivilegeName::parse("jcr:read").unwrap();
/// assert_eq!(read.prefix(), Some("jcr"));
/// assert_eq!(read.local_name(), "read");
///
/// assert!(PrivilegeName::parse("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PrivilegeName(Cow<'static, str>);

impl PrivilegeName {
    /// Create a name from a static string without validation.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Parse and validate a privilege name.
    pub fn parse(name: impl Into<Cow<'static, str>>) -> PrivilegeResult<Self> {
        let name = Self(name.into());
        name.validate()?;
        Ok(name)
    }

    /// Check that this name is well formed.
    pub fn validate(&self) -> PrivilegeResult<()> {
        Self::check(self.as_str())
    }

    /// Check that a string is a well-formed privilege name.
    pub fn check(name: &str) -> PrivilegeResult<()> {
        if name.is_empty() {
            return Err(PrivilegeError::invalid_name(name, "name is empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(PrivilegeError::invalid_name(name, "name contains whitespace"));
        }
        if let Some((prefix, local)) = name.split_once(':') {
            if prefix.is_empty() || local.is_empty() {
                return Err(PrivilegeError::invalid_name(
                    name,
                    "prefix and local name must not be empty",
                ));
            }
            if local.contains(':') {
                return Err(PrivilegeError::invalid_name(name, "name has more than one prefix"));
            }
        }
        Ok(())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace prefix, if the name is qualified.
    pub fn prefix(&self) -> Option<&str> {
        self.as_str().split_once(':').map(|(prefix, _)| prefix)
    }

    /// The part of the name after the prefix.
    pub fn local_name(&self) -> &str {
        self.as_str()
            .split_once(':')
            .map_or(self.as_str(), |(_, local)| local)
    }
}

impl fmt::Display for PrivilegeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for PrivilegeName {
    fn from(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

impl From<String> for PrivilegeName {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

/// Missing and null names are reported as `InvalidPrivilegeName`, like
/// malformed ones.
impl<'de> Deserialize<'de> for PrivilegeName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(name) => Self::parse(name).map_err(serde::de::Error::custom),
            None => Err(serde::de::Error::custom(PrivilegeError::invalid_name(
                "",
                "name is missing",
            ))),
        }
    }
}

impl Borrow<str> for PrivilegeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PrivilegeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
