//! One-shot reconciliation.

use tabled::Tabled;

use netledger_core::{EntityKind, PassOutcome};

use crate::cli::SyncArgs;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct PassRow {
    #[tabled(rename = "Pass")]
    kind: String,
    #[tabled(rename = "OK")]
    ok: String,
    #[tabled(rename = "Summary")]
    message: String,
}

impl From<&PassOutcome> for PassRow {
    fn from(o: &PassOutcome) -> Self {
        let mut message = o.result.message.clone();
        for e in &o.result.errors {
            message.push('\n');
            message.push_str(e);
        }
        Self {
            kind: o.kind.to_string(),
            ok: if o.result.successful { "yes" } else { "no" }.into(),
            message,
        }
    }
}

pub async fn handle(ctx: &Context, args: SyncArgs) -> Result<(), CliError> {
    let ledger = ctx.ledger().await?;

    let outcomes = if args.kind.is_empty() {
        ledger.sync_all().await
    } else {
        // Requested kinds still run in dependency order
        let kinds: Vec<EntityKind> = EntityKind::SYNC_ORDER
            .into_iter()
            .filter(|k| args.kind.iter().any(|a| util::entity_kind(*a) == *k))
            .collect();
        ledger.sync(&kinds).await
    };

    let out = output::render_list(&ctx.global.output, &outcomes, |o| PassRow::from(o), |o| {
        format!("{}\t{}", o.kind, o.result.successful)
    });
    output::print_output(&out, ctx.global.quiet);

    let failed: Vec<String> = outcomes
        .iter()
        .filter(|o| !o.result.successful)
        .map(|o| o.kind.to_string())
        .collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::OperationFailed {
            message: format!("{} of {} passes failed", failed.len(), outcomes.len()),
            details: Some(failed.join(", ")),
        })
    }
}
