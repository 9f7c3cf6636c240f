use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{AwsCli, ExecParams, SshShell};

/// Shells into containers running on an ECS cluster
#[derive(Parser, Debug)]
#[command(name = "ecs_exec", about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Finds a host running the container and runs a command inside of it over
    /// ssh, after asking which host to use and for confirmation
    Exec(ExecArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Name of the ECS cluster
    #[arg(long)]
    pub cluster: String,
    /// Name of the ECS service within the cluster
    #[arg(long)]
    pub service: String,
    /// Name of the container, as in the task definition
    #[arg(long)]
    pub container: String,
    /// User to log into the host as
    #[arg(long, default_value = "ec2-user")]
    pub user: String,
    /// Private key used for ssh, a leading `~/` is expanded
    #[arg(short, long, default_value = "~/.ssh/id_rsa")]
    pub identity_file: PathBuf,
    /// AWS region, otherwise the aws cli default is used
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,
    /// AWS profile, otherwise the aws cli default is used
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,
    /// The aws cli program
    #[arg(long, env = "ECS_EXEC_AWS_CLI", default_value = "aws")]
    pub aws_cli: String,
    /// The ssh program
    #[arg(long, env = "ECS_EXEC_SSH", default_value = "ssh")]
    pub ssh: String,
    /// The command to run inside the container
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl ExecArgs {
    pub fn params(&self) -> ExecParams {
        ExecParams {
            cluster: self.cluster.clone(),
            service: self.service.clone(),
            container: self.container.clone(),
            user: self.user.clone(),
            identity_file: self.identity_file.clone(),
            command: self.command.join(" "),
        }
    }

    pub fn aws_cli(&self) -> AwsCli {
        AwsCli::new(&self.aws_cli)
            .region(self.region.clone())
            .profile(self.profile.clone())
    }

    pub fn ssh_shell(&self) -> SshShell {
        SshShell::new(&self.ssh)
    }
}
