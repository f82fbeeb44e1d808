//! Diagnostic logging setup shared by both binaries.
//!
//! Diagnostics go to stderr so stdout carries only the tool's results.

use anyhow::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "skew_sudoku=debug"
    } else {
        "warn"
    }
}

/// Initialize the stderr subscriber; `RUST_LOG` takes precedence over `--verbose`
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(directives)?,
        _ => EnvFilter::try_new(default_directive(verbose))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(default_directive(verbose)).is_ok());
        }
    }

    #[test]
    fn test_bad_level_is_rejected() {
        assert!(EnvFilter::try_new("skew_sudoku=notalevel").is_err());
    }
}
