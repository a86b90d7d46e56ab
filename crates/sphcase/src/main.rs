//! sphcase CLI - SPH case pre-processor
//!
//! Binary name: `sphcase`

use std::process;

use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = resolve_dir(cli.command).and_then(commands::run);

    match result {
        Ok(0) => {}
        Ok(code) => {
            #[allow(clippy::exit)]
            process::exit(code);
        }
        Err(err) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {err:#}");
            }

            let code = err
                .downcast_ref::<sphcase_core::Error>()
                .map_or(1, sphcase_core::Error::exit_code);

            #[allow(clippy::exit)]
            process::exit(code);
        }
    }
}

/// Make the case directory absolute so the saved case records a stable path.
fn resolve_dir(command: Commands) -> anyhow::Result<Commands> {
    Ok(match command {
        Commands::Init {
            dir,
            name,
            two_d,
            dp,
        } => Commands::Init {
            dir: commands::absolute(dir)?,
            name,
            two_d,
            dp,
        },
        Commands::Add {
            dir,
            object,
            kind,
            mk,
        } => Commands::Add {
            dir: commands::absolute(dir)?,
            object,
            kind,
            mk,
        },
        Commands::Inspect { dir, json } => Commands::Inspect {
            dir: commands::absolute(dir)?,
            json,
        },
        Commands::Export { dir, geometry } => Commands::Export {
            dir: commands::absolute(dir)?,
            geometry,
        },
        Commands::Save { dir, geometry } => Commands::Save {
            dir: commands::absolute(dir)?,
            geometry,
        },
    })
}
