use std::path::PathBuf;

use stacked_errors::{bail, Result, StackableErr};
use tracing::info;

use crate::{
    resolve, ClusterApi, Console, ExecutionRequest, InventoryApi, RemoteShell, Resolution, Stage,
};

/// What the operator asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecParams {
    pub cluster: String,
    pub service: String,
    pub container: String,
    pub user: String,
    pub identity_file: PathBuf,
    /// The command words joined with single spaces
    pub command: String,
}

impl ExecParams {
    /// The request for running on the chosen `address`
    pub fn request(&self, address: impl Into<String>) -> ExecutionRequest {
        ExecutionRequest {
            identity_file: self.identity_file.clone(),
            user: self.user.clone(),
            address: address.into(),
            container: self.container.clone(),
            command: self.command.clone(),
        }
    }
}

/// How a run ended, when nothing failed along the way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// A resolution stage came up empty
    NotFound(Stage),
    /// The operator declined at the confirmation
    Aborted,
    /// The remote command ran and exited with this code
    Finished(i32),
}

impl ExecOutcome {
    /// The exit status for the whole process
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecOutcome::NotFound(_) => 1,
            ExecOutcome::Aborted => 0,
            ExecOutcome::Finished(code) => *code,
        }
    }
}

/// Asks the operator to pick one of `addresses`
pub fn select_target(
    console: &mut (impl Console + ?Sized),
    addresses: &[String],
) -> Result<String> {
    let address = console
        .select("Choose EC2 instance to connect to", addresses)
        .stack_err("select_target")?;
    if !addresses.contains(&address) {
        bail!("select_target -> {address} is not one of the candidates {addresses:?}")
    }
    Ok(address)
}

/// Restates what is about to happen and asks for approval, enter approves
pub fn confirm_execution(
    console: &mut (impl Console + ?Sized),
    command: &str,
    container: &str,
    address: &str,
) -> Result<bool> {
    console
        .confirm(
            &format!(
                "You are about to execute \"{command}\" in the container \"{container}\" running \
                 on the instance \"{address}\". Do you want to continue?"
            ),
            true,
        )
        .stack_err("confirm_execution")
}

/// Runs the whole thing, resolution, selection, confirmation, and the remote
/// command. Errors are transport failures, everything else is an
/// [ExecOutcome].
pub async fn run_exec(
    cluster_api: &(impl ClusterApi + ?Sized),
    inventory_api: &(impl InventoryApi + ?Sized),
    remote_shell: &(impl RemoteShell + ?Sized),
    console: &mut (impl Console + ?Sized),
    params: &ExecParams,
) -> Result<ExecOutcome> {
    info!("running run_exec({params:?})");
    let resolution = resolve(
        cluster_api,
        inventory_api,
        console,
        &params.cluster,
        &params.service,
        &params.container,
    )
    .await?;
    let addresses = match resolution {
        Resolution::Candidates(addresses) => addresses,
        Resolution::NotFound(stage) => {
            console.failure(&format!("\nCould not find {stage}. Exiting!"))?;
            return Ok(ExecOutcome::NotFound(stage))
        }
    };
    let address = select_target(console, &addresses)?;
    if !confirm_execution(console, &params.command, &params.container, &address)? {
        console.failure("\nOperation aborted. Exiting!")?;
        return Ok(ExecOutcome::Aborted)
    }
    console.line("")?;
    let request = params.request(address);
    let code = remote_shell
        .exec(&request)
        .await
        .stack_err_with(|| format!("run_exec -> remote execution on {} failed", request.address))?;
    Ok(ExecOutcome::Finished(code))
}
