use clap::Parser;
use ecs_exec::{
    cli::{Cli, CliCommand},
    run_exec, StdConsole,
};
use owo_colors::OwoColorize;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();
    let code = match cli.command {
        CliCommand::Exec(args) => {
            let mut console = StdConsole::stdio();
            let aws = args.aws_cli();
            match run_exec(&aws, &aws, &args.ssh_shell(), &mut console, &args.params()).await {
                Ok(outcome) => outcome.exit_code(),
                Err(e) => {
                    error!("{e:?}");
                    eprintln!("{}", format!("\nFailed: {e}").red().bold());
                    1
                }
            }
        }
    };
    std::process::exit(code)
}
