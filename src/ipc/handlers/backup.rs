use crate::backup;
use crate::ipc::helpers::{required_str, respond, session, session_mut, HandlerErr};
use crate::ipc::types::{AppState, Request, Session};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

fn handle_backup_export(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let out_path = required_str(req, "outPath")?;
    let s = session(state)?;

    let export = backup::export_workspace_bundle(&*s.store, &PathBuf::from(out_path))
        .map_err(|e| HandlerErr {
            code: "io_failed",
            message: format!("{e:#}"),
            details: Some(json!({ "path": out_path })),
        })?;
    info!(path = out_path, entries = export.entry_count, "workspace bundle exported");

    Ok(json!({
        "path": out_path,
        "bundleFormat": export.bundle_format,
        "entryCount": export.entry_count
    }))
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let in_path = required_str(req, "inPath")?;
    let src = PathBuf::from(in_path);
    if !src.is_file() {
        return Err(HandlerErr {
            code: "not_found",
            message: "bundle file not found".to_string(),
            details: Some(json!({ "path": in_path })),
        });
    }
    let s = session_mut(state)?;

    let import = backup::import_workspace_bundle(&src, &*s.store).map_err(|e| HandlerErr {
        code: "io_failed",
        message: format!("{e:#}"),
        details: Some(json!({ "path": in_path })),
    })?;
    *s = Session::hydrate(s.store.clone())?;
    info!(path = in_path, keys = ?import.keys_restored, "workspace bundle imported");

    Ok(json!({
        "bundleFormatDetected": import.bundle_format_detected,
        "keysRestored": import.keys_restored,
        "teacherCount": s.teachers.list().len(),
        "paymentCount": s.payments.list().len()
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "backup.export" => handle_backup_export(state, req),
        "backup.import" => handle_backup_import(state, req),
        _ => return None,
    };
    Some(respond(req, res))
}
