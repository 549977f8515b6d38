//! Supabase platform connector.
//!
//! Speaks the two HTTP APIs a Supabase project exposes:
//! - GoTrue under `/auth/v1` (caller resolution, identity deletion);
//! - PostgREST under `/rest/v1` (directory lookup, row deletion).

use offboard_core::{
    AuthUser, BearerToken, CallerScope, PlatformConnector, PlatformError, PlatformSettings,
    PrivilegedScope, RowFilter, UserId,
};
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode, Url,
    header::{AUTHORIZATION, CONTENT_RANGE},
};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const DELETE_PREFERENCE: &str = "return=minimal,count=exact";

const USER_PATH: &str = "auth/v1/user";
const ADMIN_USERS_PATH: &str = "auth/v1/admin/users/";
const REST_PATH: &str = "rest/v1/";

/// Builds caller and privileged scopes on top of one shared HTTP client.
#[derive(Clone)]
pub struct SupabaseConnector {
    http_client: Client,
}

impl SupabaseConnector {
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }
}

impl PlatformConnector for SupabaseConnector {
    type Caller = SupabaseCallerScope;
    type Privileged = SupabasePrivilegedScope;

    fn caller_scope(
        &self,
        settings: &PlatformSettings,
        credential: Option<BearerToken>,
    ) -> Result<Self::Caller, PlatformError> {
        Ok(SupabaseCallerScope {
            http_client: self.http_client.clone(),
            base_url: base_url(&settings.url)?,
            anon_key: settings.anon_key.clone(),
            credential,
        })
    }

    fn privileged_scope(
        &self,
        settings: &PlatformSettings,
    ) -> Result<Self::Privileged, PlatformError> {
        Ok(SupabasePrivilegedScope {
            http_client: self.http_client.clone(),
            base_url: base_url(&settings.url)?,
            service_role_key: settings.service_role_key.clone(),
        })
    }
}

/// Anon key plus the caller's own token.
pub struct SupabaseCallerScope {
    http_client: Client,
    base_url: Url,
    anon_key: Secret<String>,
    credential: Option<BearerToken>,
}

#[async_trait::async_trait]
impl CallerScope for SupabaseCallerScope {
    #[tracing::instrument(name = "Resolving caller", skip_all)]
    async fn resolve_user(&self) -> Result<Option<AuthUser>, PlatformError> {
        let Some(credential) = &self.credential else {
            return Ok(None);
        };

        let url = join(&self.base_url, USER_PATH)?;
        let response = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, self.anon_key.expose_secret())
            .header(AUTHORIZATION, credential.to_header_value())
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => response
                .json::<AuthUser>()
                .await
                .map(Some)
                .map_err(|e| PlatformError::MalformedResponse(e.to_string())),
            _ => Err(api_error(response).await),
        }
    }
}

/// Service role key. Every request bypasses row-level security.
pub struct SupabasePrivilegedScope {
    http_client: Client,
    base_url: Url,
    service_role_key: Secret<String>,
}

impl SupabasePrivilegedScope {
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let key = self.service_role_key.expose_secret();
        self.http_client
            .request(method, url)
            .header(API_KEY_HEADER, key)
            .header(AUTHORIZATION, format!("Bearer {key}"))
    }

    fn table_url(&self, table: &str) -> Result<Url, PlatformError> {
        join(&self.base_url, &format!("{REST_PATH}{table}"))
    }
}

#[async_trait::async_trait]
impl PrivilegedScope for SupabasePrivilegedScope {
    #[tracing::instrument(name = "Selecting row", skip(self, filter))]
    async fn select_one(
        &self,
        table: &str,
        columns: &str,
        filter: &RowFilter,
    ) -> Result<Option<Value>, PlatformError> {
        let response = self
            .request(Method::GET, self.table_url(table)?)
            .query(&[("select", columns)])
            .query(&filter_query(filter))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let mut rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| PlatformError::MalformedResponse(e.to_string()))?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(PlatformError::MultipleRows(n)),
        }
    }

    #[tracing::instrument(name = "Deleting rows", skip(self, filter))]
    async fn delete_rows(&self, table: &str, filter: &RowFilter) -> Result<u64, PlatformError> {
        let response = self
            .request(Method::DELETE, self.table_url(table)?)
            .header(PREFER_HEADER, DELETE_PREFERENCE)
            .query(&filter_query(filter))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(affected_rows)
            .unwrap_or(0))
    }

    #[tracing::instrument(name = "Deleting identity", skip_all, fields(user_id = %user_id))]
    async fn delete_identity(&self, user_id: &UserId) -> Result<(), PlatformError> {
        // Dot segments would be dropped from the path and hit the collection.
        if matches!(user_id.as_str(), "." | "..") {
            return Err(PlatformError::InvalidIdentifier(user_id.as_str().to_string()));
        }

        let mut url = join(&self.base_url, ADMIN_USERS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| {
                PlatformError::InvalidConfiguration("URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .push(user_id.as_str());

        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

fn base_url(raw: &str) -> Result<Url, PlatformError> {
    let mut url =
        Url::parse(raw).map_err(|e| PlatformError::InvalidConfiguration(format!("{raw}: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(PlatformError::InvalidConfiguration(format!(
            "{raw}: not a base URL"
        )));
    }

    // Keep any path prefix when joining relative endpoints.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn join(base: &Url, path: &str) -> Result<Url, PlatformError> {
    base.join(path)
        .map_err(|e| PlatformError::InvalidConfiguration(e.to_string()))
}

/// PostgREST query parameters for a filter.
fn filter_query(filter: &RowFilter) -> Vec<(String, String)> {
    match filter {
        RowFilter::Eq { column, value } => vec![(column.clone(), format!("eq.{value}"))],
        RowFilter::AnyEq(pairs) => {
            let clauses = pairs
                .iter()
                .map(|(column, value)| format!("{column}.eq.{}", quote(value)))
                .collect::<Vec<_>>()
                .join(",");
            vec![("or".to_string(), format!("({clauses})"))]
        }
    }
}

/// Double-quote a value inside a PostgREST logical filter so that `,`, `.`
/// and parentheses are taken literally.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Total from a `Content-Range` header such as `*/3` or `0-2/3`.
fn affected_rows(content_range: &str) -> Option<u64> {
    content_range.rsplit_once('/')?.1.trim().parse().ok()
}

fn transport(error: reqwest::Error) -> PlatformError {
    PlatformError::Transport(error.to_string())
}

async fn api_error(response: Response) -> PlatformError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| {
            if text.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                text
            }
        });

    PlatformError::Api {
        status: status.as_u16(),
        message,
    }
}
