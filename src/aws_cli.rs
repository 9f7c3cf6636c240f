use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use stacked_errors::{Result, StackableErr};
use tracing::{debug, warn};

use crate::{
    model::{ContainerInstance, DescribeFailure, Reservation, Task},
    ClusterApi, Command, InventoryApi,
};

/// The most identifiers that the describe calls accept at once
pub const BATCH_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTasksOutput {
    #[serde(default)]
    task_arns: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeTasksOutput {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    failures: Vec<DescribeFailure>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeContainerInstancesOutput {
    #[serde(default)]
    container_instances: Vec<ContainerInstance>,
    #[serde(default)]
    failures: Vec<DescribeFailure>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstancesOutput {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

fn warn_failures(operation: &str, failures: &[DescribeFailure]) {
    for failure in failures {
        warn!(
            "{operation} could not describe {}: {}",
            failure.arn.as_deref().unwrap_or("<unknown>"),
            failure.reason.as_deref().unwrap_or("<no reason given>")
        );
    }
}

/// Implements [ClusterApi] and [InventoryApi] by running the `aws` command
/// line and decoding its JSON output.
#[derive(Debug, Clone)]
pub struct AwsCli {
    /// The program to run, usually "aws"
    pub program: String,
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl Default for AwsCli {
    fn default() -> Self {
        Self {
            program: "aws".to_owned(),
            region: None,
            profile: None,
        }
    }
}

impl AwsCli {
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Sets `region`
    pub fn region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Sets `profile`
    pub fn profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// Builds the base command for `aws <service> <operation>` with the output
    /// format and the region and profile options applied
    pub fn command(&self, service: &str, operation: &str) -> Command {
        let mut command = Command::new_os_str(&self.program)
            .args([service, operation])
            .args(["--output", "json"]);
        if let Some(ref region) = self.region {
            command = command.arg("--region").arg(region);
        }
        if let Some(ref profile) = self.profile {
            command = command.arg("--profile").arg(profile);
        }
        command
    }

    async fn call<T: DeserializeOwned>(&self, command: Command) -> Result<T> {
        let unified = command.get_unified_command();
        debug!("calling `{unified}`");
        let comres = command
            .run_to_completion()
            .await
            .stack_err_with(|| format!("could not run `{unified}`"))?;
        comres
            .assert_success()
            .stack_err_with(|| format!("`{unified}` was not successful"))?;
        serde_json::from_slice(&comres.stdout)
            .stack_err_with(|| format!("could not decode the output of `{unified}`"))
    }
}

#[async_trait]
impl ClusterApi for AwsCli {
    async fn list_running_tasks(&self, cluster: &str, service: &str) -> Result<Vec<String>> {
        let command = self
            .command("ecs", "list-tasks")
            .args(["--cluster", cluster])
            .args(["--service-name", service])
            .args(["--desired-status", "RUNNING"])
            .args(["--launch-type", "EC2"]);
        let output: ListTasksOutput = self.call(command).await?;
        Ok(output.task_arns)
    }

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> Result<Vec<Task>> {
        let mut tasks = vec![];
        for chunk in task_arns.chunks(BATCH_LIMIT) {
            let command = self
                .command("ecs", "describe-tasks")
                .args(["--cluster", cluster])
                .arg("--tasks")
                .args(chunk);
            let output: DescribeTasksOutput = self.call(command).await?;
            warn_failures("describe-tasks", &output.failures);
            tasks.extend(output.tasks);
        }
        Ok(tasks)
    }

    async fn describe_container_instances(
        &self,
        cluster: &str,
        container_instance_arns: &[String],
    ) -> Result<Vec<ContainerInstance>> {
        let mut container_instances = vec![];
        for chunk in container_instance_arns.chunks(BATCH_LIMIT) {
            let command = self
                .command("ecs", "describe-container-instances")
                .args(["--cluster", cluster])
                .arg("--container-instances")
                .args(chunk);
            let output: DescribeContainerInstancesOutput = self.call(command).await?;
            warn_failures("describe-container-instances", &output.failures);
            container_instances.extend(output.container_instances);
        }
        Ok(container_instances)
    }
}

#[async_trait]
impl InventoryApi for AwsCli {
    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<Reservation>> {
        let mut reservations = vec![];
        for chunk in instance_ids.chunks(BATCH_LIMIT) {
            let command = self
                .command("ec2", "describe-instances")
                .arg("--instance-ids")
                .args(chunk);
            let output: DescribeInstancesOutput = self.call(command).await?;
            reservations.extend(output.reservations);
        }
        Ok(reservations)
    }
}
