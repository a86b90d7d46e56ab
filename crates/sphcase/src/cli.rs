//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sphcase_core::ObjectType;

#[derive(Debug, Parser)]
#[command(name = "sphcase")]
#[command(about = "Create, inspect and export SPH simulation cases")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an empty case in a directory and save it
    Init {
        /// Case directory
        dir: PathBuf,
        /// Case name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
        /// Make the case two-dimensional on the plane y = <Y>
        #[arg(long, value_name = "Y", allow_negative_numbers = true)]
        two_d: Option<f64>,
        /// Particle distance
        #[arg(long)]
        dp: Option<f64>,
    },
    /// Add a host geometry object to a saved case
    Add {
        /// Case directory
        dir: PathBuf,
        /// Host object name
        object: String,
        /// Object kind
        #[arg(short = 't', long = "type", value_enum, default_value = "bound")]
        kind: Kind,
        /// Group tag (defaults to the first unused tag of the kind)
        #[arg(long)]
        mk: Option<u32>,
    },
    /// Print a summary of a saved case
    Inspect {
        /// Case directory
        dir: PathBuf,
        /// Print the full case as JSON
        #[arg(long)]
        json: bool,
    },
    /// Regenerate the case definition document
    Export {
        /// Case directory
        dir: PathBuf,
        /// Geometry document (defaults to geometry.json in the case directory)
        #[arg(short, long)]
        geometry: Option<PathBuf>,
    },
    /// Re-save a case: copy auxiliary files, write snapshot and export
    Save {
        /// Case directory
        dir: PathBuf,
        /// Geometry document (defaults to geometry.json in the case directory)
        #[arg(short, long)]
        geometry: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Fluid,
    Bound,
    Special,
}

impl From<Kind> for ObjectType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Fluid => Self::Fluid,
            Kind::Bound => Self::Bound,
            Kind::Special => Self::Special,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_defaults() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["sphcase", "add", "case", "Tank"])?;
        match cli.command {
            Commands::Add { kind, mk, .. } => {
                assert_eq!(kind, Kind::Bound);
                assert_eq!(mk, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_two_d_negative_plane() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["sphcase", "init", "case", "--two-d", "-0.5"])?;
        assert!(matches!(
            cli.command,
            Commands::Init { two_d: Some(y), .. } if (y + 0.5).abs() < f64::EPSILON
        ));
        Ok(())
    }
}
