//! The resolution chain, running tasks -> hosting instances -> compute hosts
//! -> addresses. Every stage maps or filters the output of the previous one,
//! so the sequences never grow, and each echoes what it found.

use std::{collections::HashMap, fmt};

use stacked_errors::{Result, StackableErr};
use tracing::{info, warn};

use crate::{ClusterApi, Console, InventoryApi, Progress};

/// The stages of the resolution chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Tasks,
    Placements,
    HostIds,
    Addresses,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Tasks => "target tasks",
            Stage::Placements => "container instances running the target container",
            Stage::HostIds => "EC2 instances for the container instances",
            Stage::Addresses => "public IP addresses for the EC2 instances",
        })
    }
}

/// The result of running the whole chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The non-empty addresses to pick from
    Candidates(Vec<String>),
    /// The given stage came up empty, later stages were not run
    NotFound(Stage),
}

fn echo_all(console: &mut (impl Console + ?Sized), items: &[String]) -> Result<()> {
    for item in items {
        console.echo(item)?;
    }
    Ok(())
}

/// Lists the running tasks of `service`
pub async fn locate_tasks(
    cluster_api: &(impl ClusterApi + ?Sized),
    console: &mut (impl Console + ?Sized),
    cluster: &str,
    service: &str,
) -> Result<Vec<String>> {
    let progress = Progress::start("Obtaining ARNs of running ECS tasks with EC2 launch type");
    let task_arns = cluster_api
        .list_running_tasks(cluster, service)
        .await
        .stack_err_with(|| format!("locate_tasks(cluster: {cluster}, service: {service})"))?;
    progress.succeed();
    echo_all(console, &task_arns)?;
    Ok(task_arns)
}

/// Keeps the tasks that run a container named exactly `container` and maps
/// them to their hosting instances. Duplicates are kept.
pub async fn resolve_placements(
    cluster_api: &(impl ClusterApi + ?Sized),
    console: &mut (impl Console + ?Sized),
    cluster: &str,
    task_arns: &[String],
    container: &str,
) -> Result<Vec<String>> {
    let progress = Progress::start("Obtaining container instance ARNs");
    let tasks = cluster_api
        .describe_tasks(cluster, task_arns)
        .await
        .stack_err_with(|| format!("resolve_placements(cluster: {cluster})"))?;
    progress.succeed();
    let mut container_instance_arns = vec![];
    for task in tasks.iter().filter(|task| task.runs_container(container)) {
        match task.container_instance_arn {
            Some(ref arn) => container_instance_arns.push(arn.clone()),
            None => warn!(
                "task {} runs container {container} but has no container instance",
                task.task_arn
            ),
        }
    }
    echo_all(console, &container_instance_arns)?;
    Ok(container_instance_arns)
}

/// Maps hosting instances to their compute host ids, in the order given
pub async fn resolve_host_ids(
    cluster_api: &(impl ClusterApi + ?Sized),
    console: &mut (impl Console + ?Sized),
    cluster: &str,
    container_instance_arns: &[String],
) -> Result<Vec<String>> {
    let progress = Progress::start("Obtaining container instance IDs");
    // the same instance may host several matching tasks, only ask once
    let mut unique: Vec<String> = vec![];
    for arn in container_instance_arns {
        if !unique.contains(arn) {
            unique.push(arn.clone());
        }
    }
    let container_instances = cluster_api
        .describe_container_instances(cluster, &unique)
        .await
        .stack_err_with(|| format!("resolve_host_ids(cluster: {cluster})"))?;
    progress.succeed();
    let host_ids: HashMap<&str, &str> = container_instances
        .iter()
        .map(|c| (c.container_instance_arn.as_str(), c.ec2_instance_id.as_str()))
        .collect();
    let mut instance_ids = vec![];
    for arn in container_instance_arns {
        match host_ids.get(arn.as_str()) {
            Some(id) => instance_ids.push((*id).to_owned()),
            None => warn!("container instance {arn} was not described"),
        }
    }
    echo_all(console, &instance_ids)?;
    Ok(instance_ids)
}

/// Looks up the public addresses of the compute hosts. Hosts without one are
/// unreachable and left out.
pub async fn resolve_addresses(
    inventory_api: &(impl InventoryApi + ?Sized),
    console: &mut (impl Console + ?Sized),
    instance_ids: &[String],
) -> Result<Vec<String>> {
    let progress = Progress::start("Obtaining container instance IP addresses");
    let reservations = inventory_api
        .describe_instances(instance_ids)
        .await
        .stack_err("resolve_addresses")?;
    progress.succeed();
    let mut addresses = vec![];
    for instance in reservations.into_iter().flat_map(|r| r.instances) {
        match instance.public_ip_address {
            Some(address) if !address.is_empty() => addresses.push(address),
            _ => info!(
                "instance {} has no public IP address, skipping it",
                instance.instance_id
            ),
        }
    }
    echo_all(console, &addresses)?;
    Ok(addresses)
}

/// Runs the whole chain, stopping at the first stage that comes up empty
pub async fn resolve(
    cluster_api: &(impl ClusterApi + ?Sized),
    inventory_api: &(impl InventoryApi + ?Sized),
    console: &mut (impl Console + ?Sized),
    cluster: &str,
    service: &str,
    container: &str,
) -> Result<Resolution> {
    let task_arns = locate_tasks(cluster_api, console, cluster, service).await?;
    if task_arns.is_empty() {
        return Ok(Resolution::NotFound(Stage::Tasks))
    }
    let container_instance_arns =
        resolve_placements(cluster_api, console, cluster, &task_arns, container).await?;
    if container_instance_arns.is_empty() {
        return Ok(Resolution::NotFound(Stage::Placements))
    }
    let instance_ids =
        resolve_host_ids(cluster_api, console, cluster, &container_instance_arns).await?;
    if instance_ids.is_empty() {
        return Ok(Resolution::NotFound(Stage::HostIds))
    }
    let addresses = resolve_addresses(inventory_api, console, &instance_ids).await?;
    if addresses.is_empty() {
        return Ok(Resolution::NotFound(Stage::Addresses))
    }
    Ok(Resolution::Candidates(addresses))
}
