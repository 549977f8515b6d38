use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use offboard_core::{
    AuthUser, BearerToken, CallerScope, PlatformConnector, PlatformError, PlatformSettings,
    PrivilegedScope, RowFilter, UserId,
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// One call made against the in-memory platform, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    ResolveUser,
    SelectOne { table: String },
    DeleteRows { table: String, filter: RowFilter },
    DeleteIdentity(String),
}

/// Initial contents of an [`InMemoryPlatform`], usually read from a JSON file.
///
/// ```json
/// {
///   "identities": [{ "id": "admin-1", "email": "a@example.com", "token": "t0k3n" }],
///   "tables": { "staff": [{ "id": "admin-1", "is_admin": true, "role": "admin" }] }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemorySeed {
    pub identities: Vec<SeedIdentity>,
    pub tables: HashMap<String, Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Vec<Value>>,
    identities: HashMap<String, AuthUser>,
    tokens: HashMap<String, String>,
    failing_tables: HashSet<String>,
    identity_failure: Option<(u16, String)>,
    /// `None` unless the platform was built with [`InMemoryPlatform::with_journal`].
    journal: Option<Vec<PlatformCall>>,
}

impl State {
    fn record(&mut self, call: PlatformCall) {
        if let Some(journal) = &mut self.journal {
            journal.push(call);
        }
    }
}

/// Platform fake holding tables and identities in process memory.
///
/// Settings passed to the connector methods are ignored. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPlatform {
    state: Arc<RwLock<State>>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`InMemoryPlatform::new`], but every call is recorded and can be
    /// read back with [`InMemoryPlatform::journal`]. For tests: the journal
    /// is never trimmed.
    pub fn with_journal() -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                journal: Some(Vec::new()),
                ..State::default()
            })),
        }
    }

    pub fn from_seed(seed: MemorySeed) -> Self {
        let mut state = State {
            tables: seed.tables,
            ..State::default()
        };

        for identity in seed.identities {
            if let Some(token) = identity.token {
                state.tokens.insert(token, identity.id.clone());
            }
            state.identities.insert(
                identity.id.clone(),
                AuthUser {
                    id: identity.id,
                    email: identity.email,
                },
            );
        }

        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Register an identity that `token` resolves to.
    pub async fn add_identity(&self, id: &str, token: &str) {
        let mut state = self.state.write().await;
        state.identities.insert(
            id.to_string(),
            AuthUser {
                id: id.to_string(),
                email: None,
            },
        );
        state.tokens.insert(token.to_string(), id.to_string());
    }

    pub async fn insert_row(&self, table: &str, row: Value) {
        self.state
            .write()
            .await
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .read()
            .await
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn has_identity(&self, id: &str) -> bool {
        self.state.read().await.identities.contains_key(id)
    }

    /// Make every select and delete against `table` fail.
    pub async fn fail_table(&self, table: &str) {
        self.state
            .write()
            .await
            .failing_tables
            .insert(table.to_string());
    }

    /// Make identity deletion fail with the given status and message.
    pub async fn fail_identity_deletion(&self, status: u16, message: &str) {
        self.state.write().await.identity_failure = Some((status, message.to_string()));
    }

    /// Calls recorded so far. Always empty without [`InMemoryPlatform::with_journal`].
    pub async fn journal(&self) -> Vec<PlatformCall> {
        self.state.read().await.journal.clone().unwrap_or_default()
    }
}

impl PlatformConnector for InMemoryPlatform {
    type Caller = InMemoryCallerScope;
    type Privileged = InMemoryPrivilegedScope;

    fn caller_scope(
        &self,
        _settings: &PlatformSettings,
        credential: Option<BearerToken>,
    ) -> Result<Self::Caller, PlatformError> {
        Ok(InMemoryCallerScope {
            state: self.state.clone(),
            token: credential.map(|token| token.as_ref().expose_secret().to_owned()),
        })
    }

    fn privileged_scope(
        &self,
        _settings: &PlatformSettings,
    ) -> Result<Self::Privileged, PlatformError> {
        Ok(InMemoryPrivilegedScope {
            state: self.state.clone(),
        })
    }
}

pub struct InMemoryCallerScope {
    state: Arc<RwLock<State>>,
    token: Option<String>,
}

#[async_trait::async_trait]
impl CallerScope for InMemoryCallerScope {
    async fn resolve_user(&self) -> Result<Option<AuthUser>, PlatformError> {
        let Some(token) = &self.token else {
            return Ok(None);
        };

        let mut state = self.state.write().await;
        state.record(PlatformCall::ResolveUser);

        Ok(state
            .tokens
            .get(token)
            .and_then(|id| state.identities.get(id))
            .cloned())
    }
}

pub struct InMemoryPrivilegedScope {
    state: Arc<RwLock<State>>,
}

fn injected_failure(table: &str) -> PlatformError {
    PlatformError::Api {
        status: 500,
        message: format!("injected failure on {table}"),
    }
}

/// Keep only the requested columns, PostgREST style. `*` keeps everything.
fn project(row: &Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row.clone();
    }

    let projected: Map<String, Value> = columns
        .split(',')
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(|column| {
            let value = row.get(column).cloned().unwrap_or(Value::Null);
            (column.to_string(), value)
        })
        .collect();

    Value::Object(projected)
}

#[async_trait::async_trait]
impl PrivilegedScope for InMemoryPrivilegedScope {
    async fn select_one(
        &self,
        table: &str,
        columns: &str,
        filter: &RowFilter,
    ) -> Result<Option<Value>, PlatformError> {
        let mut state = self.state.write().await;
        state.record(PlatformCall::SelectOne {
            table: table.to_string(),
        });

        if state.failing_tables.contains(table) {
            return Err(injected_failure(table));
        }

        let matching: Vec<Value> = state
            .tables
            .get(table)
            .into_iter()
            .flatten()
            .filter(|row| filter.matches(row))
            .map(|row| project(row, columns))
            .collect();

        match matching.len() {
            0 => Ok(None),
            1 => Ok(matching.into_iter().next()),
            n => Err(PlatformError::MultipleRows(n)),
        }
    }

    async fn delete_rows(&self, table: &str, filter: &RowFilter) -> Result<u64, PlatformError> {
        let mut state = self.state.write().await;
        state.record(PlatformCall::DeleteRows {
            table: table.to_string(),
            filter: filter.clone(),
        });

        if state.failing_tables.contains(table) {
            return Err(injected_failure(table));
        }

        let Some(rows) = state.tables.get_mut(table) else {
            return Ok(0);
        };

        let before = rows.len();
        rows.retain(|row| !filter.matches(row));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_identity(&self, user_id: &UserId) -> Result<(), PlatformError> {
        let mut state = self.state.write().await;
        state.record(PlatformCall::DeleteIdentity(user_id.to_string()));

        if let Some((status, message)) = state.identity_failure.clone() {
            return Err(PlatformError::Api { status, message });
        }

        state
            .identities
            .remove(user_id.as_str())
            .ok_or_else(|| PlatformError::Api {
                status: 404,
                message: "User not found".to_string(),
            })?;
        state.tokens.retain(|_, id| id != user_id.as_str());

        Ok(())
    }
}
