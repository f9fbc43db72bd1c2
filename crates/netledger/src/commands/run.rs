//! Foreground daemon: reconcile and prune on timers until Ctrl-C.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use netledger_core::Ledger;

use crate::cli::RunArgs;
use crate::config;
use crate::error::CliError;

use super::Context;

pub async fn handle(ctx: &Context, args: RunArgs) -> Result<(), CliError> {
    let mut ledger_config = config::build_ledger_config(&ctx.global, &ctx.config)?;
    if let Some(secs) = args.fetch_interval {
        ledger_config.fetch_interval = Duration::from_secs(secs.max(1));
    }
    if let Some(secs) = args.prune_interval {
        ledger_config.prune_interval = Duration::from_secs(secs.max(1));
    }

    let ledger = Ledger::connect(ledger_config).await?;
    info!(
        site = %ledger.site_id(),
        database = %ledger.db().path().display(),
        "ledger connected"
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("interrupt received, shutting down"),
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C; stopping"),
        }
        on_signal.cancel();
    });

    ledger.run(cancel).await;
    Ok(())
}
