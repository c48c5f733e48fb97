use crate::db;
use crate::ipc::helpers::{respond, required_str, session_mut, HandlerErr};
use crate::ipc::types::{AppState, Request, Session};
use crate::store::{SnapshotStore, StoreError, ALL_KEYS};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Opens (creating if needed) the workspace at `path` and hydrates its registries.
/// The current workspace stays open until the new one has loaded.
pub fn open_workspace(state: &mut AppState, path: &Path) -> Result<(), HandlerErr> {
    let conn = db::open_db(path).map_err(|e| HandlerErr {
        code: "db_open_failed",
        message: format!("{e:?}"),
        details: Some(json!({ "path": path.to_string_lossy() })),
    })?;
    let session = Session::open(conn).map_err(|e| {
        let key = match &e {
            StoreError::CorruptSnapshot { key, .. } => Some(key.clone()),
            _ => None,
        };
        HandlerErr {
            code: "db_open_failed",
            message: e.to_string(),
            details: Some(json!({ "path": path.to_string_lossy(), "key": key })),
        }
    })?;
    info!(
        workspace = %path.display(),
        teachers = session.teachers.list().len(),
        payments = session.payments.list().len(),
        "workspace opened"
    );
    state.workspace = Some(path.to_path_buf());
    state.session = Some(session);
    Ok(())
}

fn handle_health(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
    }))
}

fn handle_workspace_select(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let path = PathBuf::from(required_str(req, "path")?);
    open_workspace(state, &path)?;
    Ok(json!({ "workspacePath": path.to_string_lossy() }))
}

/// Drops every stored collection; the reload that follows reseeds them.
fn handle_workspace_clear(
    state: &mut AppState,
    _req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let session = session_mut(state)?;
    for key in ALL_KEYS {
        session.store.remove(key)?;
    }
    let fresh = Session::hydrate(session.store.clone())?;
    *session = fresh;
    info!("workspace cleared");
    Ok(json!({
        "teacherCount": session.teachers.list().len(),
        "paymentCount": session.payments.list().len()
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "health" => handle_health(state, req),
        "workspace.select" => handle_workspace_select(state, req),
        "workspace.clear" => handle_workspace_clear(state, req),
        _ => return None,
    };
    Some(respond(req, res))
}
