mod commands;
mod terminal;

use commands::{CommandLine, enumerate};
use subscout_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.into_config();

    logging::init_logging(cfg.quiet);
    print::banner(cfg.no_banner, cfg.quiet);

    enumerate::enumerate(&cfg).await
}
