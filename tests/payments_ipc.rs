use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_teacherhubd");
    let mut child = Command::new(exe)
        .env_remove("TEACHERHUB_WORKSPACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn teacherhubd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn request_err(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded",
        method
    );
    value.get("error").cloned().unwrap_or_else(|| json!({}))
}

fn open_workspace(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    workspace: &Path,
) {
    let _ = request_ok(
        stdin,
        reader,
        "open",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
}

fn ids(rows: &serde_json::Value) -> Vec<String> {
    rows.as_array()
        .map(|a| {
            a.iter()
                .filter_map(|p| p["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn payment_create_resolves_teacher_name() {
    let workspace = temp_dir("teacherhub-payments-create");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    open_workspace(&mut stdin, &mut reader, &workspace);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "payments.create",
        json!({ "payment": {
            "teacherId": "2",
            "amount": 250.5,
            "date": "2024-03-15",
            "status": "pending",
            "type": "overtime",
            "description": "Weekend lab supervision"
        }}),
    );
    let payment_id = created["paymentId"].as_str().expect("paymentId").to_string();
    assert_eq!(created["payment"]["teacherName"], json!("Michael Chen"));
    assert_eq!(created["payment"]["type"], json!("overtime"));

    let got = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "payments.get",
        json!({ "paymentId": payment_id }),
    );
    assert_eq!(got["payment"]["amount"], json!(250.5));

    let explicit = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "payments.create",
        json!({ "payment": {
            "teacherId": "4",
            "teacherName": "D. Wilson",
            "amount": 100,
            "date": "2024-03-20",
            "status": "paid",
            "type": "allowance"
        }}),
    );
    assert_eq!(explicit["payment"]["teacherName"], json!("D. Wilson"));
    assert!(explicit["payment"].get("description").is_none());

    let err = request_err(
        &mut stdin,
        &mut reader,
        "4",
        "payments.create",
        json!({ "payment": {
            "teacherId": "nonexistent",
            "amount": 10,
            "date": "2024-03-20",
            "status": "paid",
            "type": "bonus"
        }}),
    );
    assert_eq!(err["code"], json!("not_found"));

    let err = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "payments.create",
        json!({ "payment": {
            "teacherId": "1",
            "amount": -10,
            "date": "2024-03-20",
            "status": "paid",
            "type": "bonus"
        }}),
    );
    assert_eq!(err["code"], json!("bad_params"));

    let list = request_ok(&mut stdin, &mut reader, "6", "payments.list", json!({}));
    assert_eq!(list["summary"]["count"], json!(6));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn payment_filters_and_summaries() {
    let workspace = temp_dir("teacherhub-payments-filter");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    open_workspace(&mut stdin, &mut reader, &workspace);

    let all = request_ok(&mut stdin, &mut reader, "1", "payments.list", json!({}));
    assert_eq!(ids(&all["payments"]), vec!["1", "2", "3", "4"]);
    assert_eq!(all["summary"]["pendingAmount"], json!(4833.33));

    let pending = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "payments.list",
        json!({ "status": "pending" }),
    );
    assert_eq!(ids(&pending["payments"]), vec!["3"]);

    let bonus = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "payments.list",
        json!({ "type": "bonus" }),
    );
    assert_eq!(ids(&bonus["payments"]), vec!["4"]);

    let search = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "payments.list",
        json!({ "search": "SARAH" }),
    );
    assert_eq!(ids(&search["payments"]), vec!["1", "4"]);

    let by_desc = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "payments.list",
        json!({ "search": "february", "status": "paid" }),
    );
    assert!(ids(&by_desc["payments"]).is_empty());
    assert_eq!(by_desc["summary"]["count"], json!(0));

    let by_teacher = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "payments.byTeacher",
        json!({ "teacherId": "1" }),
    );
    assert_eq!(ids(&by_teacher["payments"]), vec!["1", "4"]);
    assert_eq!(by_teacher["summary"]["paidAmount"], json!(5416.67));
    assert_eq!(by_teacher["summary"]["pendingAmount"], json!(0.0));

    let none = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "payments.byTeacher",
        json!({ "teacherId": "nonexistent" }),
    );
    assert!(ids(&none["payments"]).is_empty());

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn payment_update_and_delete() {
    let workspace = temp_dir("teacherhub-payments-mutate");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    open_workspace(&mut stdin, &mut reader, &workspace);

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "payments.update",
        json!({ "paymentId": "3", "patch": { "status": "paid" } }),
    );
    assert_eq!(updated["payment"]["status"], json!("paid"));
    assert_eq!(updated["payment"]["amount"], json!(4833.33));
    assert_eq!(
        updated["payment"]["description"],
        json!("February 2024 Salary")
    );

    let cleared = request_ok(
        &mut stdin,
        &mut reader,
        "1b",
        "payments.update",
        json!({ "paymentId": "3", "patch": { "description": null } }),
    );
    assert!(cleared["payment"].get("description").is_none());
    assert_eq!(cleared["payment"]["status"], json!("paid"));

    let err = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "payments.update",
        json!({ "paymentId": "nonexistent", "patch": { "status": "paid" } }),
    );
    assert_eq!(err["code"], json!("not_found"));
    assert_eq!(err["details"]["kind"], json!("payment"));

    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "payments.delete",
        json!({ "paymentId": "2" }),
    );
    assert_eq!(removed["payment"]["teacherName"], json!("Michael Chen"));

    let err = request_err(
        &mut stdin,
        &mut reader,
        "4",
        "payments.delete",
        json!({ "paymentId": "2" }),
    );
    assert_eq!(err["code"], json!("not_found"));

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "payments.deleteByTeacher",
        json!({ "teacherId": "1" }),
    );
    assert_eq!(deleted["deleted"], json!(2));

    let list = request_ok(&mut stdin, &mut reader, "6", "payments.list", json!({}));
    assert_eq!(ids(&list["payments"]), vec!["3"]);

    let stats = request_ok(&mut stdin, &mut reader, "7", "dashboard.stats", json!({}));
    assert_eq!(stats["totalPayments"], json!(1));
    assert_eq!(stats["pendingPayments"], json!(0));
    assert_eq!(stats["totalTeachers"], json!(4));
    assert_eq!(stats["activeTeachers"], json!(3));
    assert_eq!(stats["monthlyExpense"], json!(215000.0));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
