use crate::ipc::helpers::{
    optional_bool, required_str, respond, session, session_mut, typed_param, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewTeacher, TeacherPatch};
use serde_json::json;

fn handle_teachers_list(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let s = session(state)?;
    Ok(json!({ "teachers": s.teachers.list() }))
}

/// An unknown id is a normal answer here (`teacher: null`), not an error.
fn handle_teachers_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let s = session(state)?;
    let teacher_id = required_str(req, "teacherId")?;
    Ok(json!({ "teacher": s.teachers.get(teacher_id) }))
}

fn handle_teachers_create(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let new: NewTeacher = typed_param(req, "teacher")?;
    let s = session_mut(state)?;
    let teacher = s.teachers.add(new)?;
    Ok(json!({ "teacherId": teacher.id, "teacher": teacher }))
}

fn handle_teachers_update(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let teacher_id = required_str(req, "teacherId")?;
    let patch: TeacherPatch = typed_param(req, "patch")?;
    let s = session_mut(state)?;
    let teacher = s.teachers.update(teacher_id, patch, &mut s.payments)?;
    Ok(json!({ "teacher": teacher }))
}

fn handle_teachers_delete(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let teacher_id = required_str(req, "teacherId")?;
    let delete_payments = optional_bool(req, "deletePayments")?;
    let s = session_mut(state)?;
    let removed = s.teachers.delete(teacher_id)?;
    let payments_deleted = if delete_payments {
        // The teacher is already gone at this point; say so in the error.
        s.payments
            .delete_all_for_teacher(teacher_id)
            .map_err(|e| HandlerErr {
                code: "store_failed",
                message: e.to_string(),
                details: Some(json!({ "teacherDeleted": true, "teacher": &removed })),
            })?
    } else {
        0
    };
    Ok(json!({
        "teacher": removed,
        "paymentsDeleted": payments_deleted
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "teachers.list" => handle_teachers_list(state, req),
        "teachers.get" => handle_teachers_get(state, req),
        "teachers.create" => handle_teachers_create(state, req),
        "teachers.update" => handle_teachers_update(state, req),
        "teachers.delete" => handle_teachers_delete(state, req),
        _ => return None,
    };
    Some(respond(req, res))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::ipc::types::Session;
    use std::path::PathBuf;

    fn state() -> AppState {
        let conn = db::open_in_memory().expect("open db");
        AppState {
            workspace: Some(PathBuf::from(":memory:")),
            session: Some(Session::open(conn).expect("hydrate")),
        }
    }

    fn req(method: &str, params: serde_json::Value) -> Request {
        Request {
            id: "1".to_string(),
            method: method.to_string(),
            params,
        }
    }

    #[test]
    fn failed_payment_cascade_reports_the_deleted_teacher() {
        let mut state = state();
        let store = state.session.as_ref().expect("session").store.clone();
        store
            .execute_batch(
                "CREATE TRIGGER block_payments BEFORE UPDATE ON snapshots
                 WHEN NEW.key = 'payments'
                 BEGIN SELECT RAISE(ABORT, 'payments locked'); END;",
            )
            .expect("trigger");

        let resp = try_handle(
            &mut state,
            &req(
                "teachers.delete",
                json!({ "teacherId": "1", "deletePayments": true }),
            ),
        )
        .expect("handled");

        assert_eq!(resp["ok"], json!(false));
        assert_eq!(resp["error"]["code"], json!("store_failed"));
        assert_eq!(resp["error"]["details"]["teacherDeleted"], json!(true));
        assert_eq!(resp["error"]["details"]["teacher"]["id"], json!("1"));

        let s = state.session.as_ref().expect("session");
        assert!(s.teachers.get("1").is_none());
        assert_eq!(s.payments.list_by_teacher("1").len(), 2);
    }
}
