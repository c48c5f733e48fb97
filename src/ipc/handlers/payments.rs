use crate::ipc::helpers::{
    object_param, required_str, respond, session, session_mut, typed_param, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewPayment, PaymentPatch};
use crate::registry::{PaymentFilter, PaymentSummary};
use serde_json::json;

fn handle_payments_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let s = session(state)?;
    let filter: PaymentFilter = if req.params.is_null() {
        PaymentFilter::default()
    } else {
        serde_json::from_value(req.params.clone())
            .map_err(|e| HandlerErr::bad_params(format!("invalid filter: {e}")))?
    };
    let rows = s.payments.search(&filter);
    let summary = PaymentSummary::of(rows.iter().copied());
    Ok(json!({ "payments": rows, "summary": summary }))
}

fn handle_payments_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let s = session(state)?;
    let payment_id = required_str(req, "paymentId")?;
    Ok(json!({ "payment": s.payments.get(payment_id) }))
}

/// `teacherName` may be omitted; it is then copied from the teacher record,
/// which must exist.
fn handle_payments_create(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let mut raw = object_param(req, "payment")?;
    let s = session_mut(state)?;
    if !raw.contains_key("teacherName") {
        let teacher_id = raw
            .get("teacherId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| HandlerErr::bad_params("missing payment.teacherId"))?;
        let Some(teacher) = s.teachers.get(teacher_id) else {
            return Err(HandlerErr {
                code: "not_found",
                message: format!("teacher not found: {teacher_id}"),
                details: Some(json!({ "kind": "teacher", "id": teacher_id })),
            });
        };
        let name = teacher.name.clone();
        raw.insert("teacherName".into(), json!(name));
    }
    let new: NewPayment = serde_json::from_value(serde_json::Value::Object(raw))
        .map_err(|e| HandlerErr::bad_params(format!("invalid payment: {e}")))?;
    let payment = s.payments.add(new)?;
    Ok(json!({ "paymentId": payment.id, "payment": payment }))
}

fn handle_payments_update(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let payment_id = required_str(req, "paymentId")?;
    let patch: PaymentPatch = typed_param(req, "patch")?;
    let s = session_mut(state)?;
    let payment = s.payments.update(payment_id, patch)?;
    Ok(json!({ "payment": payment }))
}

fn handle_payments_delete(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let payment_id = required_str(req, "paymentId")?;
    let s = session_mut(state)?;
    let removed = s.payments.delete(payment_id)?;
    Ok(json!({ "payment": removed }))
}

fn handle_payments_by_teacher(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let s = session(state)?;
    let teacher_id = required_str(req, "teacherId")?;
    let rows = s.payments.list_by_teacher(teacher_id);
    let summary = PaymentSummary::of(rows.iter().copied());
    Ok(json!({ "payments": rows, "summary": summary }))
}

fn handle_payments_delete_by_teacher(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let teacher_id = required_str(req, "teacherId")?;
    let s = session_mut(state)?;
    let deleted = s.payments.delete_all_for_teacher(teacher_id)?;
    Ok(json!({ "deleted": deleted }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "payments.list" => handle_payments_list(state, req),
        "payments.get" => handle_payments_get(state, req),
        "payments.create" => handle_payments_create(state, req),
        "payments.update" => handle_payments_update(state, req),
        "payments.delete" => handle_payments_delete(state, req),
        "payments.byTeacher" => handle_payments_by_teacher(state, req),
        "payments.deleteByTeacher" => handle_payments_delete_by_teacher(state, req),
        _ => return None,
    };
    Some(respond(req, res))
}
