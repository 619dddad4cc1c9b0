/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod compile;

use crate::catalog::CatalogError;
use crate::cli::OutputCtx;
use crate::cli::args::Command;
use crate::config::Config;

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `CatalogError` on any command failure.
pub fn dispatch(command: &Command, ctx: &OutputCtx, config: &Config) -> Result<(), CatalogError> {
    match command {
        Command::Compile(args) => compile::run(args, ctx, config),
    }
}
