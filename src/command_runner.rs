use core::fmt;
use std::{fmt::Debug, process::Stdio};

use stacked_errors::{Result, StackableErr};
use tokio::process::{self, Child};
use tracing::{debug, warn};

use crate::{Command, CommandResult};

// note that most things should use `_locationless`, especially if they are
// expected to be able to error under normal `Command` running circumstances,
// the string info should be enough

/// Spawned `Commands` are represented by this struct.
///
/// If the `tracing` crate is used and a subscriber is active, warnings from
/// bad `Drop`s can be issued
#[must_use]
#[derive(Default)]
pub struct CommandRunner {
    // this information is kept around for failures
    /// The command this runner was started with
    command: Option<Command>,
    /// The handle to the `Child` process. Unless the command is in
    /// `passthrough` mode, the `ChildStdout` and `ChildStderr` are piped and
    /// collected by `wait_with_output`.
    pub child_process: Option<Child>,
}

impl Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner")
            .field("command", &self.command)
            .field("child_process", &self.child_process)
            .finish()
    }
}

impl Drop for CommandRunner {
    fn drop(&mut self) {
        // we purposely parenthesize in this way to avoid calling `panicking` in the
        // normal case
        if self.child_process.is_some() && (!std::thread::panicking()) {
            warn!(
                "A `CommandRunner` was dropped without being properly finished, the command was: \
                 {}",
                self.command
                    .as_ref()
                    .map(|c| c.get_unified_command())
                    .unwrap_or_default()
            )
        }
    }
}

pub(crate) async fn command_runner<C: Into<Stdio>>(
    this: Command,
    stdin_cfg: C,
) -> Result<CommandRunner> {
    let mut cmd = process::Command::new(&this.program);
    cmd.args(&this.args)
        .kill_on_drop(true)
        .stdin(stdin_cfg);
    if this.passthrough {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    } else {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    }
    debug!("spawning {}", this.get_unified_command());
    let child = cmd.spawn().stack_err_with_locationless(|| {
        format!("{this:?}.run() -> failed to spawn child process")
    })?;
    Ok(CommandRunner {
        command: Some(this),
        child_process: Some(child),
    })
}

impl CommandRunner {
    /// Finishes the `CommandResult` (or stalls forever if the OS command does).
    /// Note: If this function succeeds, it only means that the OS calls all
    /// succeeded, it does not mean that the command itself had a successful
    /// return status, use `assert_success` or check the `status` on the
    /// `CommandResult`.
    pub async fn wait_with_output(mut self) -> Result<CommandResult> {
        let child = self.child_process.take().stack_err_locationless(
            "`CommandRunner` has already had some termination method called",
        )?;
        let output = child
            .wait_with_output()
            .await
            .stack_err_with_locationless(|| {
                format!("{self:?}.wait_with_output() -> failed when waiting on child process")
            })?;
        Ok(CommandResult {
            command: self.command.take().unwrap_or_default(),
            status: Some(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
