use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "teacherhubd",
    about = "Teacher and payment records sidecar speaking JSON lines on stdin/stdout",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        env = "TEACHERHUB_WORKSPACE",
        value_name = "DIR",
        help = "Workspace folder to open at startup"
    )]
    pub workspace: Option<PathBuf>,

    #[arg(
        long,
        env = "TEACHERHUB_LOG",
        value_name = "FILTER",
        default_value = "info",
        help = "tracing filter directive for stderr logs"
    )]
    pub log: String,
}
