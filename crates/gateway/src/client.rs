//! Supabase gateway client
//!
//! Speaks PostgREST under `/rest/v1` and the GoTrue admin API under
//! `/auth/v1`, authenticating every request with the service-role key.

use async_trait::async_trait;
use init_shared::{AuthUser, UserId};
use reqwest::{
    header::{ACCEPT, CONTENT_RANGE},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    auth_admin::{GenerateLinkParams, GeneratedLink, UserAttributes},
    error::{GatewayError, GatewayResult},
    gateway::DataGateway,
    query::{parse_content_range, Cardinality, SelectResponse, TableQuery},
};

/// PostgREST error code for "JSON object requested, multiple (or no) rows returned"
const PGRST_SINGLE_ROW: &str = "PGRST116";

const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub service_role_key: String,
}

/// HTTP implementation of [`DataGateway`]
#[derive(Clone)]
pub struct SupabaseGateway {
    client: Client,
    rest_url: String,
    auth_url: String,
    service_role_key: String,
}

/// Error body shapes of PostgREST (`code`/`message`) and GoTrue
/// (`error_code`/`msg`, numeric `code`)
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl SupabaseGateway {
    pub fn new(config: SupabaseConfig) -> GatewayResult<Self> {
        let base = config.url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(GatewayError::Config("Supabase URL is empty".to_string()));
        }
        if config.service_role_key.trim().is_empty() {
            return Err(GatewayError::Config(
                "Supabase service role key is empty".to_string(),
            ));
        }

        Ok(Self {
            client: Client::new(),
            rest_url: format!("{}/rest/v1", base),
            auth_url: format!("{}/auth/v1", base),
            service_role_key: config.service_role_key,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", self.service_role_key))
    }

    fn table_url(&self, query: &TableQuery) -> String {
        format!("{}/{}", self.rest_url, query.table.as_str())
    }

    fn user_url(&self, user_id: UserId) -> String {
        format!("{}/admin/users/{}", self.auth_url, user_id)
    }
}

/// Turn a non-success response into a [`GatewayError`], passing the
/// backend's code and message through
async fn error_from_response(response: Response) -> GatewayError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

    let code = body.error_code.or_else(|| {
        body.code.as_ref().map(|c| match c {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    });

    if status == StatusCode::NOT_ACCEPTABLE && code.as_deref() == Some(PGRST_SINGLE_ROW) {
        return GatewayError::NotFound;
    }
    if status == StatusCode::NOT_FOUND && code.as_deref() == Some("user_not_found") {
        return GatewayError::NotFound;
    }

    let message = body
        .message
        .or(body.msg)
        .or(body.error_description)
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text
            }
        });

    warn!(status = status.as_u16(), code = ?code, %message, "Gateway request failed");

    GatewayError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}

async fn ensure_success(response: Response) -> GatewayResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Parse a body that may legitimately be empty (204, `return=minimal`)
async fn optional_json(response: Response) -> GatewayResult<Option<Value>> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&text)?))
}

#[async_trait]
impl DataGateway for SupabaseGateway {
    async fn select(&self, query: TableQuery) -> GatewayResult<SelectResponse> {
        let method = if query.head { Method::HEAD } else { Method::GET };
        debug!(table = %query.table, head = query.head, "PostgREST select");

        let mut request = self
            .authorized(self.client.request(method, self.table_url(&query)))
            .query(&query.query_pairs());
        if let Some(prefer) = query.prefer_header() {
            request = request.header("Prefer", prefer);
        }
        if query.cardinality == Cardinality::Single {
            request = request.header(ACCEPT, SINGLE_OBJECT_MEDIA_TYPE);
        }

        let response = ensure_success(request.send().await?).await?;

        let count = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);

        if query.head {
            return Ok(SelectResponse {
                rows: Value::Null,
                count,
            });
        }

        let rows: Value = response.json().await?;
        let rows = match query.cardinality {
            Cardinality::MaybeSingle => match rows {
                Value::Array(mut items) => match items.len() {
                    0 => Value::Null,
                    1 => items.remove(0),
                    n => return Err(GatewayError::MultipleRows(n)),
                },
                other => other,
            },
            _ => rows,
        };

        Ok(SelectResponse { rows, count })
    }

    async fn delete(&self, query: TableQuery) -> GatewayResult<Option<Value>> {
        debug!(table = %query.table, "PostgREST delete");

        let filters: Vec<(String, String)> = query
            .query_pairs()
            .into_iter()
            .filter(|(k, _)| k != "select")
            .collect();

        let response = self
            .authorized(self.client.delete(self.table_url(&query)))
            .query(&filters)
            .header("Prefer", "return=minimal")
            .send()
            .await?;

        optional_json(ensure_success(response).await?).await
    }

    async fn rpc(&self, function: &str, args: Value) -> GatewayResult<Value> {
        debug!(function, "PostgREST rpc");

        let response = self
            .authorized(
                self.client
                    .post(format!("{}/rpc/{}", self.rest_url, function)),
            )
            .json(&args)
            .send()
            .await?;

        Ok(optional_json(ensure_success(response).await?)
            .await?
            .unwrap_or(Value::Null))
    }

    async fn get_user_by_id(&self, user_id: UserId) -> GatewayResult<AuthUser> {
        let response = self
            .authorized(self.client.get(self.user_url(user_id)))
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    async fn delete_user(&self, user_id: UserId) -> GatewayResult<()> {
        let response = self
            .authorized(self.client.delete(self.user_url(user_id)))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn update_user_by_id(
        &self,
        user_id: UserId,
        attributes: UserAttributes,
    ) -> GatewayResult<AuthUser> {
        let response = self
            .authorized(self.client.put(self.user_url(user_id)))
            .json(&attributes)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    async fn generate_link(&self, params: GenerateLinkParams) -> GatewayResult<GeneratedLink> {
        let response = self
            .authorized(
                self.client
                    .post(format!("{}/admin/generate_link", self.auth_url)),
            )
            .json(&params)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    async fn health(&self) -> GatewayResult<()> {
        let response = self
            .authorized(self.client.get(format!("{}/health", self.auth_url)))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}
