mod backup;
mod config;
mod db;
mod ipc;
mod logging;
mod model;
mod registry;
mod seed;
mod settings;
mod store;

use std::io::{self, BufRead, Write};

use anyhow::anyhow;
use clap::Parser;
use tracing::{debug, info, warn};

fn main() -> anyhow::Result<()> {
    let args = config::CliArgs::parse();
    logging::init_logging(&args.log)?;

    let mut state = ipc::AppState {
        workspace: None,
        session: None,
    };
    if let Some(path) = args.workspace.as_deref() {
        ipc::open_workspace(&mut state, path)
            .map_err(|e| anyhow!("{}: {}", e.code, e.message))?;
    }
    info!(version = env!("CARGO_PKG_VERSION"), "sidecar ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "stdin read failed; shutting down");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to echo back.
                warn!(error = %e, "unparseable request line");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{resp}");
                let _ = stdout.flush();
                continue;
            }
        };

        debug!(id = %req.id, method = %req.method, "request");
        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    info!("stdin closed; exiting");
    Ok(())
}
