use crate::ipc::helpers::{respond, session, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{PaymentStatus, TeacherStatus};
use serde_json::json;

// Counters for the dashboard cards. Chart series stay static in the UI.
fn handle_dashboard_stats(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let s = session(state)?;
    let teachers = s.teachers.list();
    let payments = s.payments.list();

    let active: Vec<_> = teachers
        .iter()
        .filter(|t| t.status == TeacherStatus::Active)
        .collect();
    let monthly_expense: f64 = active.iter().map(|t| t.salary).sum();
    let pending = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending)
        .count();

    Ok(json!({
        "totalTeachers": teachers.len(),
        "activeTeachers": active.len(),
        "totalPayments": payments.len(),
        "pendingPayments": pending,
        "monthlyExpense": monthly_expense
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.stats" => Some(respond(req, handle_dashboard_stats(state, req))),
        _ => None,
    }
}
