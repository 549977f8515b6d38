use serde::Deserialize;

use super::user::UserId;

/// Names of the tables and columns the deletion workflow touches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    pub staff_table: String,
    pub staff_id_column: String,
    pub staff_select: String,
    pub profile_table: String,
    pub profile_id_column: String,
    pub profile_user_column: String,
    pub device_table: String,
    pub device_staff_column: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            staff_table: "staff".to_string(),
            staff_id_column: "id".to_string(),
            staff_select: "id,is_admin,role".to_string(),
            profile_table: "perfil".to_string(),
            profile_id_column: "id".to_string(),
            profile_user_column: "user_id".to_string(),
            device_table: "device_authorizations".to_string(),
            device_staff_column: "staff_id".to_string(),
        }
    }
}

impl TableSchema {
    /// Directory lookup (and directory row deletion) for one identity.
    pub fn staff_filter(&self, id: &UserId) -> RowFilter {
        RowFilter::eq(&self.staff_id_column, id.as_str())
    }

    /// Profile rows are keyed either by their own id or by the user reference.
    pub fn profile_filter(&self, id: &UserId) -> RowFilter {
        RowFilter::any_eq([
            (self.profile_id_column.as_str(), id.as_str()),
            (self.profile_user_column.as_str(), id.as_str()),
        ])
    }

    pub fn device_filter(&self, id: &UserId) -> RowFilter {
        RowFilter::eq(&self.device_staff_column, id.as_str())
    }
}

/// Row selector understood by every [`crate::PrivilegedScope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// `column = value`
    Eq { column: String, value: String },
    /// `column1 = value1 OR column2 = value2 ...`
    AnyEq(Vec<(String, String)>),
}

impl RowFilter {
    pub fn eq(column: &str, value: &str) -> Self {
        Self::Eq {
            column: column.to_owned(),
            value: value.to_owned(),
        }
    }

    pub fn any_eq<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::AnyEq(
            pairs
                .into_iter()
                .map(|(column, value)| (column.to_owned(), value.to_owned()))
                .collect(),
        )
    }

    /// Whether a row (a JSON object) is selected by this filter.
    ///
    /// Values are compared as strings so that numeric ids match their textual
    /// form, the same way the platform's query layer coerces them.
    pub fn matches(&self, row: &serde_json::Value) -> bool {
        match self {
            Self::Eq { column, value } => column_equals(row, column, value),
            Self::AnyEq(pairs) => pairs
                .iter()
                .any(|(column, value)| column_equals(row, column, value)),
        }
    }

    /// Every value this filter compares against.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Eq { value, .. } => vec![value.as_str()],
            Self::AnyEq(pairs) => pairs.iter().map(|(_, value)| value.as_str()).collect(),
        }
    }
}

fn column_equals(row: &serde_json::Value, column: &str, value: &str) -> bool {
    match row.get(column) {
        Some(serde_json::Value::String(s)) => s == value,
        Some(serde_json::Value::Number(n)) => n.to_string() == value,
        Some(serde_json::Value::Bool(b)) => b.to_string() == value,
        _ => false,
    }
}
