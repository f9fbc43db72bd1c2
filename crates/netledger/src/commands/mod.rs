//! Command dispatch: bridges CLI args -> ledger operations -> output formatting.

pub mod aps;
pub mod clients;
pub mod config_cmd;
pub mod connections;
pub mod logs;
pub mod retention;
pub mod run;
pub mod samples;
pub mod sync;
pub mod util;
pub mod wifi;

use netledger_config::Config;
use netledger_core::{Ledger, LedgerDb, OperationResult};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// What a handler needs: flags, the loaded config, and on demand a
/// database handle or a connected ledger.
pub struct Context {
    pub global: GlobalOpts,
    pub config: Config,
}

impl Context {
    pub fn new(global: GlobalOpts) -> Self {
        Self {
            global,
            config: config::load_config_or_default(),
        }
    }

    /// Local database only; never touches the network.
    pub fn db(&self) -> LedgerDb {
        LedgerDb::new(config::resolve_database_path(&self.global, &self.config))
    }

    /// Resolve the site on the controller and open the database.
    pub async fn ledger(&self) -> Result<Ledger, CliError> {
        let ledger_config = config::build_ledger_config(&self.global, &self.config)?;
        Ok(Ledger::connect(ledger_config).await?)
    }

    pub fn color(&self) -> bool {
        output::should_color(&self.global.color)
    }

    /// Print an operation result; unsuccessful results become errors so the
    /// exit code reflects them.
    pub fn finish(&self, result: &OperationResult) -> Result<(), CliError> {
        if !result.successful {
            return Err(CliError::from_result(result));
        }
        let out = output::render_result(&self.global.output, result, self.color());
        output::print_output(&out, self.global.quiet);
        Ok(())
    }
}

/// Dispatch a ledger-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Sync(args) => sync::handle(ctx, args).await,
        Command::Run(args) => run::handle(ctx, args).await,
        Command::Prune => retention::prune(ctx).await,
        Command::Retention(args) => retention::handle(ctx, args).await,
        Command::Aps(args) => aps::handle(ctx, args).await,
        Command::Clients(args) => clients::handle(ctx, args).await,
        Command::Wifi(args) => wifi::handle(ctx, args).await,
        Command::Connections => connections::handle(ctx).await,
        Command::Logs(args) => logs::handle(ctx, args).await,
        Command::Samples(args) => samples::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
