use core::fmt;
use std::{
    borrow::Cow,
    ffi::{OsStr, OsString},
    fmt::{Debug, Display},
    process::{ExitStatus, Stdio},
    str::Utf8Error,
};

use stacked_errors::{bail_locationless, Result, StackableErr};

use crate::{command_runner, CommandRunner};

/// An OS Command, this is `tokio::process::Command` wrapped in the bits of
/// helping functionality needed for calling out to `aws` and `ssh`.
#[derive(Clone, Default)]
pub struct Command {
    /// The program to run.
    pub program: OsString,
    /// All the arguments that will be passed to the program
    pub args: Vec<OsString>,
    /// If set, the stdout and stderr of the process are inherited from this
    /// process instead of being recorded. This is what interactive sessions
    /// need, the `CommandResult` will have empty `stdout` and `stderr`.
    pub passthrough: bool,
}

impl Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "Command {{ program: {:?},",
            self.get_unified_command(),
        ))?;
        if self.passthrough {
            f.write_fmt(format_args!(" passthrough: true,"))?;
        }
        f.write_fmt(format_args!(" }}"))
    }
}

impl Command {
    /// Creates a new `Command` for launching the `program` with no
    /// preprocessing, for programs whose path may contain spaces.
    pub fn new_os_str(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().into(),
            ..Default::default()
        }
    }

    /// Adds an argument
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().into());
        self
    }

    /// Adds arguments to be passed to the program
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().into()));
        self
    }

    /// Sets `passthrough`
    pub fn passthrough(mut self, passthrough: bool) -> Self {
        self.passthrough = passthrough;
        self
    }

    /// Gets the program and args interspersed with spaces
    pub fn get_unified_command(&self) -> String {
        let mut command = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            command += " ";
            command += arg.to_string_lossy().as_ref();
        }
        command
    }

    /// Runs the command with a standard input, returning a `CommandRunner`
    pub async fn run_with_stdin<C: Into<Stdio>>(self, stdin_cfg: C) -> Result<CommandRunner> {
        command_runner(self, stdin_cfg).await
    }

    /// Calls [Command::run_with_stdin] with `Stdio::null()`
    pub async fn run(self) -> Result<CommandRunner> {
        self.run_with_stdin(Stdio::null()).await
    }

    /// Calls [Command::run] and waits for it to complete, returning the command
    /// result
    pub async fn run_to_completion(self) -> Result<CommandResult> {
        self.run()
            .await
            .stack_err_locationless("Command::run_to_completion")?
            .wait_with_output()
            .await
    }

    /// Runs the command with all three standard streams inherited from this
    /// process and waits for it, which may be indefinitely for an interactive
    /// session.
    pub async fn run_interactive(self) -> Result<CommandResult> {
        self.passthrough(true)
            .run_with_stdin(Stdio::inherit())
            .await
            .stack_err_locationless("Command::run_interactive")?
            .wait_with_output()
            .await
    }
}

/// The result of a [Command](crate::Command)
#[must_use]
#[derive(Clone, Default)]
pub struct CommandResult {
    // the command information is kept around for failures
    pub command: Command,
    pub status: Option<ExitStatus>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Debug for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "CommandResult {{\ncommand: {:?},\nstatus: {:?},\n",
            self.command, self.status
        ))?;
        // move the commas out of the way of the stdout and stderr
        let stdout = self.stdout_as_utf8_lossy();
        if !stdout.is_empty() {
            f.write_fmt(format_args!("stdout: {}\n,", stdout))?;
        }
        let stderr = self.stderr_as_utf8_lossy();
        if !stderr.is_empty() {
            f.write_fmt(format_args!("stderr: {}\n,", stderr))?;
        }
        f.write_fmt(format_args!("}}"))
    }
}

impl Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:#?}", self))
    }
}

impl CommandResult {
    /// Returns if the command completed with a successful return status
    pub fn successful(&self) -> bool {
        if let Some(status) = self.status.as_ref() {
            status.success()
        } else {
            false
        }
    }

    /// Returns a formatted error with relevant information if the command was
    /// not successful
    pub fn assert_success(&self) -> Result<()> {
        if self.successful() {
            Ok(())
        } else {
            bail_locationless!("{self:#?}.assert_success() -> unsuccessful")
        }
    }

    /// Returns the exit code of the process. Processes killed by a signal
    /// have no code, in which case the shell convention of `128 + signal` is
    /// used on unix, and 1 elsewhere.
    pub fn exit_code(&self) -> i32 {
        let Some(status) = self.status.as_ref() else {
            return 1
        };
        if let Some(code) = status.code() {
            return code
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return 128 + signal
            }
        }
        1
    }

    /// Returns `str::from_utf8(&self.stdout)`
    pub fn stdout_as_utf8(&self) -> std::result::Result<&str, Utf8Error> {
        std::str::from_utf8(&self.stdout)
    }

    /// Returns `String::from_utf8_lossy(&self.stdout)`
    pub fn stdout_as_utf8_lossy(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Returns `String::from_utf8_lossy(&self.stderr)`
    pub fn stderr_as_utf8_lossy(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.stderr)
    }
}
