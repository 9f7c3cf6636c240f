use async_trait::async_trait;
use stacked_errors::Result;

use crate::model::{ContainerInstance, Reservation, Task};

/// The cluster orchestration control plane
#[async_trait]
pub trait ClusterApi {
    /// Lists the identifiers of running tasks with the EC2 launch type that
    /// belong to `service`
    async fn list_running_tasks(&self, cluster: &str, service: &str) -> Result<Vec<String>>;

    /// Describes the given tasks in one logical batch
    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> Result<Vec<Task>>;

    /// Describes the given hosting instances in one logical batch
    async fn describe_container_instances(
        &self,
        cluster: &str,
        container_instance_arns: &[String],
    ) -> Result<Vec<ContainerInstance>>;
}

/// The compute host inventory
#[async_trait]
pub trait InventoryApi {
    /// Describes the given compute hosts, grouped the way the inventory groups
    /// them
    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<Reservation>>;
}
