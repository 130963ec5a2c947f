use std::io;

use anyhow::Result;
use clap::Parser;
use gg_core::config::SessionConfig;

pub mod cli;
pub mod prompt;
pub mod session;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis appliquer les overrides CLI
    let config = resolve_config(&cli)?;
    let plan = cli.plan(&config)?;
    log::debug!("Plan de session : {plan:?}");

    // 4. Session interactive sur stdin / stdout, invites sur stderr
    let echo = cli.echo_prompts(&config);
    let mut prompter = prompt::Prompter::new(io::stdin().lock(), io::stderr(), echo);
    let mut stdout = io::stdout().lock();
    let summary = session::run(&plan, &mut prompter, &mut stdout)?;

    log::info!(
        "{} segment(s) lus, {} tracé(s) sur {}x{}",
        summary.segments,
        summary.drawn,
        summary.rows,
        summary.cols
    );
    Ok(())
}

/// The config file is optional: a missing file means defaults.
fn resolve_config(cli: &cli::Cli) -> Result<SessionConfig> {
    if cli.config.exists() {
        gg_core::config::load_config(&cli.config)
    } else {
        log::debug!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(SessionConfig::default())
    }
}
