#![allow(dead_code)]

use portfolio_core::{ApiError, ApiResult, CancelToken, CollectionKind, RemoteApi};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Scriptable in-process API used by store and session tests.
#[derive(Default)]
pub struct StubApi {
    pub admin: RefCell<HashMap<CollectionKind, Value>>,
    pub public: RefCell<HashMap<String, Value>>,
    pub created: RefCell<Option<Value>>,
    pub fail_writes: Cell<bool>,
    pub fail_reads: Cell<bool>,
    /// Cancelled in the middle of the next remote call.
    pub cancel_during_call: RefCell<Option<CancelToken>>,
    pub calls: RefCell<Vec<String>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(self, kind: CollectionKind, value: Value) -> Self {
        self.admin.borrow_mut().insert(kind, value);
        self
    }

    pub fn with_public(self, key: &str, value: Value) -> Self {
        self.public.borrow_mut().insert(key.to_string(), value);
        self
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.set(true);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
        if let Some(token) = self.cancel_during_call.borrow_mut().take() {
            token.cancel();
        }
    }

    fn write_result<T>(&self, ok: T) -> ApiResult<T> {
        if self.fail_writes.get() {
            Err(ApiError::Status {
                status: 500,
                body: "boom".to_string(),
            })
        } else {
            Ok(ok)
        }
    }
}

impl RemoteApi for StubApi {
    fn fetch_admin(&self, kind: CollectionKind) -> ApiResult<Value> {
        self.record(format!("GET admin/{kind}"));
        if self.fail_reads.get() {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        self.admin
            .borrow()
            .get(&kind)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: String::new(),
            })
    }

    fn create(&self, kind: CollectionKind, body: &Value) -> ApiResult<Value> {
        self.record(format!("POST admin/{kind}"));
        let response = self.created.borrow().clone().unwrap_or_else(|| body.clone());
        self.write_result(response)
    }

    fn update(&self, kind: CollectionKind, id: Option<&str>, body: &Value) -> ApiResult<Value> {
        match id {
            Some(id) => self.record(format!("PUT admin/{kind}/{id}")),
            None => self.record(format!("PUT admin/{kind}")),
        }
        self.write_result(body.clone())
    }

    fn delete(&self, kind: CollectionKind, id: &str) -> ApiResult<()> {
        self.record(format!("DELETE admin/{kind}/{id}"));
        self.write_result(())
    }

    fn fetch_public(&self, key: &str) -> ApiResult<Value> {
        self.record(format!("GET public/{key}"));
        self.public
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| ApiError::Network("connection refused".to_string()))
    }
}

pub fn project(id: &str, title: &str) -> Value {
    json!({"id": id, "title": title})
}
