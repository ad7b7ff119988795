//! JSON-RPC client for the remote object query service.
//!
//! This module provides the low-level transport for the record API:
//! authentication, `search_read` queries, and generic server-side
//! method calls.

use super::error::BackendError;
use log::*;
use serde_json::{json, Value};

/// Query options accepted by `search_read`.
///
#[derive(Clone, Debug, Default)]
pub struct SearchOptions {
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Makes authenticated JSON-RPC requests against the record service.
///
pub struct Client {
    base_url: String,
    database: String,
    username: String,
    api_key: String,
    uid: Option<i64>,
    request_id: u64,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new unauthenticated instance for the given endpoint and
    /// credentials.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This should never happen
    /// in practice as reqwest::Client::builder().build() only fails on
    /// invalid configuration, which we don't use.
    pub fn new(base_url: &str, database: &str, username: &str, api_key: &str) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            database: database.to_owned(),
            username: username.to_owned(),
            api_key: api_key.to_owned(),
            uid: None,
            request_id: 0,
            http_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// Authenticate against the `common` service and remember the numeric
    /// uid for subsequent object calls. A `false` result means the server
    /// rejected the credentials.
    ///
    pub async fn authenticate(&mut self) -> Result<i64, BackendError> {
        debug!("Authenticating user '{}'...", self.username);
        let result = self
            .rpc(
                "common",
                "login",
                json!([self.database, self.username, self.api_key]),
            )
            .await?;
        match result.as_i64() {
            Some(uid) if uid > 0 => {
                debug!("Authenticated as uid {}.", uid);
                self.uid = Some(uid);
                Ok(uid)
            }
            _ => Err(BackendError::AuthFailed {
                user: self.username.clone(),
            }),
        }
    }

    /// Fetch rows for the entity matching the domain predicate.
    ///
    pub async fn search_read(
        &mut self,
        model: &str,
        domain: Value,
        fields: &[&str],
        options: SearchOptions,
    ) -> Result<Vec<Value>, BackendError> {
        let mut kwargs = json!({ "fields": fields });
        if let Some(order) = &options.order {
            kwargs["order"] = json!(order);
        }
        if let Some(limit) = options.limit {
            kwargs["limit"] = json!(limit);
        }
        if let Some(offset) = options.offset {
            kwargs["offset"] = json!(offset);
        }
        let result = self
            .execute(model, "search_read", json!([domain]), kwargs)
            .await?;
        let rows: Vec<Value> = serde_json::from_value(result)?;
        debug!("search_read {}: {} rows", model, rows.len());
        Ok(rows)
    }

    /// Invoke an arbitrary server-side method on the entity.
    ///
    pub async fn call(
        &mut self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, BackendError> {
        self.execute(model, method, args, kwargs).await
    }

    /// Make an `execute_kw` object call, authenticating first if needed.
    ///
    async fn execute(
        &mut self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, BackendError> {
        if self.uid.is_none() {
            self.authenticate().await?;
        }
        // uid is set after a successful authenticate
        let uid = self.uid.unwrap_or_default();
        self.rpc(
            "object",
            "execute_kw",
            json!([
                self.database,
                uid,
                self.api_key,
                model,
                method,
                args,
                kwargs
            ]),
        )
        .await
    }

    /// Post a single JSON-RPC envelope and unwrap its result.
    ///
    async fn rpc(&mut self, service: &str, method: &str, args: Value) -> Result<Value, BackendError> {
        self.request_id += 1;
        let envelope = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "service": service,
                "method": method,
                "args": args,
            },
            "id": self.request_id,
        });

        let url = format!("{}/jsonrpc", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&envelope)
            .send()
            .await?;
        let body: Value = response.json().await?;

        if let Some(error) = body.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(-1);
            let message = error
                .get("data")
                .and_then(|d| d.get("message"))
                .or_else(|| error.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error")
                .to_owned();
            warn!("RPC {}.{} failed: {} ({})", service, method, message, code);
            return Err(BackendError::Rpc { code, message });
        }

        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }
}
