use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calmonger::{cli, db};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli_opts = cli::Cli::parse();
    let db_path = cli_opts.db.unwrap_or_else(db::default_db_path);
    let conn = db::init(&db_path)?;
    let command = cli_opts
        .command
        .unwrap_or(cli::Command::Show { month: None });

    cli::run(command, &conn)
}
