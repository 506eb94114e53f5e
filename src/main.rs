use clap::Parser;
use lightbench::{app::LightbenchApp, config::ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = ViewerConfig::parse();

    log::debug!("starting with {config:?}");
    LightbenchApp::new(config)?.run()
}
