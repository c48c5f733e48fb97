use serde::de::DeserializeOwned;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request, Session};
use crate::registry::RegistryError;
use crate::store::StoreError;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<StoreError> for HandlerErr {
    fn from(e: StoreError) -> Self {
        Self::new("store_failed", e.to_string())
    }
}

impl From<RegistryError> for HandlerErr {
    fn from(e: RegistryError) -> Self {
        let message = e.to_string();
        match e {
            RegistryError::NotFound { kind, id } => Self {
                code: "not_found",
                message,
                details: Some(json!({ "kind": kind, "id": id })),
            },
            RegistryError::Store(s) => s.into(),
        }
    }
}

pub fn respond(req: &Request, res: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match res {
        Ok(v) => ok(&req.id, v),
        Err(e) => {
            tracing::debug!(method = %req.method, code = e.code, "request failed: {}", e.message);
            e.response(&req.id)
        }
    }
}

pub fn session(state: &AppState) -> Result<&Session, HandlerErr> {
    state
        .session
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

pub fn session_mut(state: &mut AppState) -> Result<&mut Session, HandlerErr> {
    state
        .session
        .as_mut()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

pub fn required_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, HandlerErr> {
    match req.params.get(key).and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim()),
        _ => Err(HandlerErr::bad_params(format!("missing {key}"))),
    }
}

pub fn optional_bool(req: &Request, key: &str) -> Result<bool, HandlerErr> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(false),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| HandlerErr::bad_params(format!("{key} must be a boolean"))),
    }
}

/// Decodes `params[key]` into `T`, reporting the serde message on failure.
pub fn typed_param<T: DeserializeOwned>(req: &Request, key: &str) -> Result<T, HandlerErr> {
    let Some(raw) = req.params.get(key) else {
        return Err(HandlerErr::bad_params(format!("missing {key}")));
    };
    serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::bad_params(format!("invalid {key}: {e}")))
}

pub fn object_param(
    req: &Request,
    key: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, HandlerErr> {
    req.params
        .get(key)
        .and_then(|v| v.as_object())
        .cloned()
        .ok_or_else(|| HandlerErr::bad_params(format!("missing/invalid {key}")))
}
