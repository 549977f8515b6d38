use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

/// A row of the privilege directory.
///
/// Columns are kept as raw JSON: the directory is not strictly typed, and a
/// string `"true"` in `is_admin` or a numeric role must not make the row
/// unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaffRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub is_admin: Value,
    #[serde(default)]
    pub role: Value,
}

impl StaffRecord {
    /// Only a JSON `true` counts.
    pub fn is_admin(&self) -> bool {
        self.is_admin == Value::Bool(true)
    }

    /// The role as text. Null or missing is the empty string, other scalars
    /// use their JSON text.
    pub fn role(&self) -> String {
        role_text(&self.role)
    }
}

fn role_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(role_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Decides whether a directory record grants admin privilege.
///
/// A record is privileged when `is_admin` is exactly `true`, or when its role
/// lower-cases to one of the configured admin role names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegePolicy {
    admin_roles: BTreeSet<String>,
}

impl PrivilegePolicy {
    pub const DEFAULT_ADMIN_ROLES: [&'static str; 2] = ["admin", "administrador"];

    pub fn new<I, S>(admin_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            admin_roles: admin_roles
                .into_iter()
                .map(|role| role.as_ref().to_lowercase())
                .filter(|role| !role.is_empty())
                .collect(),
        }
    }

    pub fn admin_roles(&self) -> impl Iterator<Item = &str> {
        self.admin_roles.iter().map(String::as_str)
    }

    pub fn is_privileged(&self, record: &StaffRecord) -> bool {
        record.is_admin() || self.admin_roles.contains(&record.role().to_lowercase())
    }
}

impl Default for PrivilegePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ADMIN_ROLES)
    }
}
