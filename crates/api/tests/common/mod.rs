//! In-memory gateway and helpers shared by the API integration tests
#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use init_api::{auth::AdminContext, AppState, Config};
use init_gateway::{
    DataGateway, GatewayError, GatewayResult, GenerateLinkParams, GeneratedLink, SelectResponse,
    TableQuery, UserAttributes,
};
use init_shared::{AuthUser, UserId};
use serde_json::{json, Value};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-jwt-secret-must-be-at-least-32-characters-long";

/// Gateway double that records every call it receives
#[derive(Default)]
pub struct FakeGateway {
    pub calls: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<TableQuery>>,
    pub updates: Mutex<Vec<(UserId, UserAttributes)>>,
    pub link_requests: Mutex<Vec<GenerateLinkParams>>,
    /// Rows handed back for every select
    pub rows: Mutex<Value>,
    pub count: Option<u64>,
    pub user: Option<AuthUser>,
    pub action_link: Option<String>,
    /// Selects whose `status` filter equals this value fail immediately
    pub fail_status: Option<&'static str>,
    pub select_delay: Duration,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub completed: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(json!([])),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<TableQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl DataGateway for FakeGateway {
    async fn select(&self, query: TableQuery) -> GatewayResult<SelectResponse> {
        self.record(format!("select:{}", query.table));
        self.queries.lock().unwrap().push(query.clone());

        if self.fail_status.is_some() && query.eq_value("status") == self.fail_status {
            return Err(GatewayError::Api {
                status: 500,
                code: None,
                message: "count failed".to_string(),
            });
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.select_delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);

        Ok(SelectResponse {
            rows: if query.head {
                Value::Null
            } else {
                self.rows.lock().unwrap().clone()
            },
            count: self.count,
        })
    }

    async fn delete(&self, query: TableQuery) -> GatewayResult<Option<Value>> {
        self.record(format!("delete:{}", query.table));
        self.queries.lock().unwrap().push(query);
        Ok(None)
    }

    async fn rpc(&self, function: &str, args: Value) -> GatewayResult<Value> {
        self.record(format!("rpc:{}:{}", function, args));
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get_user_by_id(&self, user_id: UserId) -> GatewayResult<AuthUser> {
        self.record(format!("get_user:{}", user_id));
        self.user.clone().ok_or(GatewayError::NotFound)
    }

    async fn delete_user(&self, user_id: UserId) -> GatewayResult<()> {
        self.record(format!("delete_user:{}", user_id));
        Ok(())
    }

    async fn update_user_by_id(
        &self,
        user_id: UserId,
        attributes: UserAttributes,
    ) -> GatewayResult<AuthUser> {
        self.record(format!("update_user:{}", user_id));
        self.updates.lock().unwrap().push((user_id, attributes));
        Ok(user(user_id, Some("banned@example.com")))
    }

    async fn generate_link(&self, params: GenerateLinkParams) -> GatewayResult<GeneratedLink> {
        self.record("generate_link");
        self.link_requests.lock().unwrap().push(params);
        Ok(GeneratedLink {
            action_link: self.action_link.clone(),
            ..Default::default()
        })
    }

    async fn health(&self) -> GatewayResult<()> {
        Ok(())
    }
}

pub fn user(id: UserId, email: Option<&str>) -> AuthUser {
    AuthUser {
        id,
        email: email.map(str::to_string),
        phone: None,
        banned_until: None,
        created_at: None,
        last_sign_in_at: None,
        app_metadata: json!({}),
        user_metadata: json!({}),
        extra: Default::default(),
    }
}

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        site_url: "https://app.test".to_string(),
        cors_allowed_origins: vec!["https://app.test".to_string()],
        supabase_url: "http://127.0.0.1:1".to_string(),
        supabase_service_role_key: "service-role-key".to_string(),
        supabase_jwt_secret: JWT_SECRET.to_string(),
        admin_role: "super-admin".to_string(),
    }
}

pub fn state_with(gateway: Arc<FakeGateway>) -> AppState {
    AppState::with_gateway(test_config(), gateway).unwrap()
}

pub fn admin() -> AdminContext {
    AdminContext {
        user_id: UserId(Uuid::new_v4()),
        email: Some("admin@example.com".to_string()),
    }
}
