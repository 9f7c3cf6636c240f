use std::path::PathBuf;

use async_trait::async_trait;
use stacked_errors::{Result, StackableErr};
use tracing::info;

use crate::{acquire_file_path, Command};

/// Everything needed to run the command in the chosen container. It is built
/// only after the operator confirmed, and used once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub identity_file: PathBuf,
    pub user: String,
    pub address: String,
    pub container: String,
    pub command: String,
}

/// Opens a session on a host and runs a command in one of its containers
#[async_trait]
pub trait RemoteShell {
    /// Runs the request with the standard streams attached, returning the exit
    /// code of the remote command
    async fn exec(&self, request: &ExecutionRequest) -> Result<i32>;
}

/// The script run on the host. The container is found with the first running
/// container whose name contains `-<container>-`, which is how the agent names
/// them. Note that other containers with the dashed name inside their own
/// name also match.
pub fn remote_command(container: &str, command: &str) -> String {
    format!(
        "bash -c \"docker exec -it $(docker ps -q -f name=-{container}- | head -n 1) {command}\""
    )
}

/// Builds the `ssh` invocation for `request`, `program` is usually "ssh"
pub fn ssh_command(program: &str, request: &ExecutionRequest) -> Command {
    Command::new_os_str(program)
        .arg("-i")
        .arg(&request.identity_file)
        .arg(format!("{}@{}", request.user, request.address))
        .arg("-t")
        .arg(remote_command(&request.container, &request.command))
}

/// Implements [RemoteShell] with the `ssh` program
#[derive(Debug, Clone)]
pub struct SshShell {
    pub program: String,
}

impl Default for SshShell {
    fn default() -> Self {
        Self {
            program: "ssh".to_owned(),
        }
    }
}

impl SshShell {
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_owned(),
        }
    }
}

#[async_trait]
impl RemoteShell for SshShell {
    async fn exec(&self, request: &ExecutionRequest) -> Result<i32> {
        let identity_file = acquire_file_path(&request.identity_file)
            .await
            .stack_err("SshShell::exec -> could not use the identity file")?;
        let request = ExecutionRequest {
            identity_file,
            ..request.clone()
        };
        let command = ssh_command(&self.program, &request);
        info!("running {}", command.get_unified_command());
        let comres = command
            .run_interactive()
            .await
            .stack_err_with(|| format!("SshShell::exec -> could not run `{}`", self.program))?;
        Ok(comres.exit_code())
    }
}
