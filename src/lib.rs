//! Resolves a running ECS container down to the EC2 host it runs on and opens
//! a shell session inside of it.
//!
//! The chain is: running tasks of a service, the tasks running the wanted
//! container, their container instances, the EC2 instance ids, and finally the
//! public IP addresses. The operator picks one address, confirms, and the
//! command is run through `ssh` and `docker exec` on that host.

mod api;
/// The `aws` command line backed control plane and inventory
pub mod aws_cli;
pub mod cli;
mod command;
mod command_runner;
mod console;
mod exec;
pub mod model;
mod paths;
mod progress;
mod remote;
mod resolve;
pub use api::*;
pub use aws_cli::AwsCli;
pub use command::*;
pub use command_runner::*;
pub use console::*;
pub use exec::*;
pub use paths::*;
pub use progress::*;
pub use remote::*;
pub use resolve::*;
/// This reexport helps with dependency wrangling
pub use stacked_errors;
