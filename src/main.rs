use clap::Parser;

use catalog_rs::cli::{self, Cli, CommandOutcome};
use catalog_rs::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    let log_handle = cli::init_logger_from_settings(&settings)?;

    match cli::execute_command(&cli, settings.clone()).await? {
        CommandOutcome::Done => Ok(()),
        CommandOutcome::StartServer => {
            Server::new(settings)
                .with_log_handle(log_handle)
                .with_config_source(cli::ConfigurationMerger::loader_for(&cli)?)
                .run()
                .await
        }
    }
}
