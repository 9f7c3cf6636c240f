//! Records returned by the cluster control plane and the host inventory. The
//! field names follow the JSON that `aws --output json` produces, so these
//! deserialize directly from it.

use serde::{Deserialize, Serialize};

/// A container within a described task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContainer {
    pub name: String,
}

/// A described task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_arn: String,
    #[serde(default)]
    pub containers: Vec<TaskContainer>,
    /// The hosting instance, absent for tasks not placed on managed instances
    #[serde(default)]
    pub container_instance_arn: Option<String>,
}

impl Task {
    /// Returns if the task has a container named exactly `container_name`
    pub fn runs_container(&self, container_name: &str) -> bool {
        self.containers.iter().any(|c| c.name == container_name)
    }
}

/// The hosting instance that a task is placed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInstance {
    pub container_instance_arn: String,
    pub ec2_instance_id: String,
}

/// An entry of the `failures` arrays returned by batch describe calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeFailure {
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A compute host as the inventory reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub instance_id: String,
    #[serde(default)]
    pub public_ip_address: Option<String>,
}

/// The inventory groups hosts into reservations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    #[serde(default)]
    pub instances: Vec<Instance>,
}
