#![allow(dead_code)]

use std::{collections::VecDeque, path::PathBuf, sync::Mutex};

use async_trait::async_trait;
use ecs_exec::{
    model::{ContainerInstance, Instance, Reservation, Task, TaskContainer},
    stacked_errors::{bail, Result},
    ClusterApi, Console, ExecParams, ExecutionRequest, InventoryApi, RemoteShell,
};

pub fn task(arn: &str, containers: &[&str], instance: Option<&str>) -> Task {
    Task {
        task_arn: arn.to_owned(),
        containers: containers
            .iter()
            .map(|name| TaskContainer {
                name: (*name).to_owned(),
            })
            .collect(),
        container_instance_arn: instance.map(|s| s.to_owned()),
    }
}

pub fn container_instance(arn: &str, instance_id: &str) -> ContainerInstance {
    ContainerInstance {
        container_instance_arn: arn.to_owned(),
        ec2_instance_id: instance_id.to_owned(),
    }
}

pub fn reservation(instances: &[(&str, Option<&str>)]) -> Reservation {
    Reservation {
        instances: instances
            .iter()
            .map(|(id, address)| Instance {
                instance_id: (*id).to_owned(),
                public_ip_address: address.map(|s| s.to_owned()),
            })
            .collect(),
    }
}

pub fn params(container: &str, command: &str) -> ExecParams {
    ExecParams {
        cluster: "main".to_owned(),
        service: "web".to_owned(),
        container: container.to_owned(),
        user: "ec2-user".to_owned(),
        identity_file: PathBuf::from("/keys/id_rsa"),
        command: command.to_owned(),
    }
}

/// Serves canned control plane and inventory responses and records every call
#[derive(Debug, Default)]
pub struct FakeAws {
    pub running: Vec<String>,
    pub tasks: Vec<Task>,
    pub container_instances: Vec<ContainerInstance>,
    pub reservations: Vec<Reservation>,
    /// The name of an operation that fails
    pub failing: Option<&'static str>,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeAws {
    fn record(&self, operation: &'static str, ids: &[String]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_owned(), ids.to_vec()));
        if self.failing == Some(operation) {
            bail!("{operation}: AccessDeniedException")
        }
        Ok(())
    }

    pub fn operations(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(operation, _)| operation.clone())
            .collect()
    }

    pub fn requested(&self, operation: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(o, _)| o == operation)
            .map(|(_, ids)| ids.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ClusterApi for FakeAws {
    async fn list_running_tasks(&self, cluster: &str, service: &str) -> Result<Vec<String>> {
        self.record("list_running_tasks", &[cluster.to_owned(), service.to_owned()])?;
        Ok(self.running.clone())
    }

    async fn describe_tasks(&self, _cluster: &str, task_arns: &[String]) -> Result<Vec<Task>> {
        self.record("describe_tasks", task_arns)?;
        Ok(self
            .tasks
            .iter()
            .filter(|t| task_arns.contains(&t.task_arn))
            .cloned()
            .collect())
    }

    async fn describe_container_instances(
        &self,
        _cluster: &str,
        container_instance_arns: &[String],
    ) -> Result<Vec<ContainerInstance>> {
        self.record("describe_container_instances", container_instance_arns)?;
        Ok(self
            .container_instances
            .iter()
            .filter(|c| container_instance_arns.contains(&c.container_instance_arn))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InventoryApi for FakeAws {
    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<Reservation>> {
        self.record("describe_instances", instance_ids)?;
        Ok(self
            .reservations
            .iter()
            .map(|r| Reservation {
                instances: r
                    .instances
                    .iter()
                    .filter(|i| instance_ids.contains(&i.instance_id))
                    .cloned()
                    .collect(),
            })
            .filter(|r| !r.instances.is_empty())
            .collect())
    }
}

/// Records requests instead of connecting anywhere
#[derive(Debug, Default)]
pub struct RecordingShell {
    pub exit_code: i32,
    pub requests: Mutex<Vec<ExecutionRequest>>,
}

impl RecordingShell {
    pub fn returning(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteShell for RecordingShell {
    async fn exec(&self, request: &ExecutionRequest) -> Result<i32> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.exit_code)
    }
}

/// Answers prompts from a script and records everything shown
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    /// 1 based picks for `select`
    pub picks: VecDeque<usize>,
    pub confirmations: VecDeque<bool>,
    pub echoed: Vec<String>,
    pub lines: Vec<String>,
    pub failures: Vec<String>,
    pub offered: Vec<Vec<String>>,
    pub questions: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(picks: &[usize], confirmations: &[bool]) -> Self {
        Self {
            picks: picks.iter().copied().collect(),
            confirmations: confirmations.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl Console for ScriptedConsole {
    fn echo(&mut self, item: &str) -> Result<()> {
        self.echoed.push(item.to_owned());
        Ok(())
    }

    fn line(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_owned());
        Ok(())
    }

    fn failure(&mut self, message: &str) -> Result<()> {
        self.failures.push(message.to_owned());
        Ok(())
    }

    fn select(&mut self, _message: &str, choices: &[String]) -> Result<String> {
        self.offered.push(choices.to_vec());
        let Some(pick) = self.picks.pop_front() else {
            bail!("no scripted pick left")
        };
        Ok(choices[pick - 1].clone())
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        self.questions.push(message.to_owned());
        Ok(self.confirmations.pop_front().unwrap_or(default))
    }
}
