use std::path::{Path, PathBuf};
use std::process::Command;

use camino::Utf8Path;

use crate::error::GrmError;

pub trait TransferBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn copy(&self, src: &str, dst: &Utf8Path, show_progress: bool) -> Result<(), GrmError>;
    fn sync(&self, src: &str, dst: &Utf8Path, show_progress: bool) -> Result<(), GrmError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSelection {
    S5cmd(PathBuf),
    AwsCli(PathBuf),
    None,
}

impl BackendSelection {
    pub fn into_backend(self) -> Option<Box<dyn TransferBackend>> {
        match self {
            BackendSelection::S5cmd(program) => Some(Box::new(S5cmdBackend::new(program))),
            BackendSelection::AwsCli(program) => Some(Box::new(AwsCliBackend::new(program))),
            BackendSelection::None => None,
        }
    }
}

pub fn select_backend() -> BackendSelection {
    select_backend_with(find_in_path)
}

pub fn select_backend_with(probe: impl Fn(&str) -> Option<PathBuf>) -> BackendSelection {
    if let Some(program) = probe("s5cmd") {
        return BackendSelection::S5cmd(program);
    }
    if let Some(program) = probe("aws") {
        return BackendSelection::AwsCli(program);
    }
    BackendSelection::None
}

#[derive(Debug, Clone)]
pub struct S5cmdBackend {
    program: PathBuf,
}

impl S5cmdBackend {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl TransferBackend for S5cmdBackend {
    fn name(&self) -> &'static str {
        "s5cmd"
    }

    fn copy(&self, src: &str, dst: &Utf8Path, _show_progress: bool) -> Result<(), GrmError> {
        // s5cmd has no progress toggle
        run_transfer("s5cmd", &self.program, &s5cmd_cp_args(src, dst))
    }

    fn sync(&self, src: &str, dst: &Utf8Path, _show_progress: bool) -> Result<(), GrmError> {
        run_transfer("s5cmd", &self.program, &s5cmd_sync_args(src, dst))
    }
}

#[derive(Debug, Clone)]
pub struct AwsCliBackend {
    program: PathBuf,
}

impl AwsCliBackend {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl TransferBackend for AwsCliBackend {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn copy(&self, src: &str, dst: &Utf8Path, show_progress: bool) -> Result<(), GrmError> {
        run_transfer("aws", &self.program, &aws_s3_args("cp", src, dst, show_progress))
    }

    fn sync(&self, src: &str, dst: &Utf8Path, show_progress: bool) -> Result<(), GrmError> {
        run_transfer("aws", &self.program, &aws_s3_args("sync", src, dst, show_progress))
    }
}

fn s5cmd_cp_args(src: &str, dst: &Utf8Path) -> Vec<String> {
    vec!["cp".to_string(), src.to_string(), dst.to_string()]
}

fn s5cmd_sync_args(src: &str, dst: &Utf8Path) -> Vec<String> {
    vec!["sync".to_string(), format!("{src}*"), dst.to_string()]
}

fn aws_s3_args(op: &str, src: &str, dst: &Utf8Path, show_progress: bool) -> Vec<String> {
    let mut args = vec![
        "s3".to_string(),
        op.to_string(),
        src.to_string(),
        dst.to_string(),
    ];
    if !show_progress {
        args.push("--no-progress".to_string());
    }
    args
}

fn run_transfer(tool: &str, program: &Path, args: &[String]) -> Result<(), GrmError> {
    tracing::info!("running '{} {}'", program.display(), args.join(" "));
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|err| GrmError::TransferFailed {
            tool: tool.to_string(),
            output: err.to_string(),
        })?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let message = if !stderr.is_empty() {
        stderr
    } else if !stdout.is_empty() {
        stdout
    } else {
        format!("{} exited with {}", program.display(), output.status)
    };
    Err(GrmError::TransferFailed {
        tool: tool.to_string(),
        output: message,
    })
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.exists() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.exists() {
            return Some(plain);
        }
    }
    None
}
