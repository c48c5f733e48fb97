use crate::ipc::helpers::{object_param, respond, session, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::settings;
use serde_json::json;

fn handle_settings_get(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let s = session(state)?;
    Ok(json!({ "settings": settings::load(&*s.store)? }))
}

fn handle_settings_update(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let patch = object_param(req, "patch")?;
    let s = session(state)?;
    Ok(json!({ "settings": settings::update(&*s.store, patch)? }))
}

fn handle_settings_reset(
    state: &mut AppState,
    _req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let s = session(state)?;
    Ok(json!({ "settings": settings::reset(&*s.store)? }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "settings.get" => handle_settings_get(state, req),
        "settings.update" => handle_settings_update(state, req),
        "settings.reset" => handle_settings_reset(state, req),
        _ => return None,
    };
    Some(respond(req, res))
}
