use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use todolist_cli::cli::open_services;
use todolist_cli::console::GOODBYE;
use todolist_cli::{Cli, Console};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the menu.
    // `LOG_FORMAT=json` switches to structured output.
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(json.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(io::stderr)))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(command) = &cli.command {
        let mut out = io::stdout().lock();
        return cli.run_command(command, &mut out).await;
    }

    let services = open_services(cli.backend).await?;

    // Stdin reads block, so the menu gets its own thread and Ctrl-C is
    // watched from here.
    let handle = tokio::runtime::Handle::current();
    let session = tokio::task::spawn_blocking(move || {
        let mut console = Console::new(services, io::stdin().lock(), io::stdout());
        handle.block_on(console.run())
    });

    tokio::select! {
        joined = session => {
            joined.context("interactive session panicked")??;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nInterrupted. {GOODBYE}");
            // The blocking reader cannot be cancelled; leave without waiting on it.
            std::process::exit(0);
        }
    }
    Ok(())
}
