//! Retention period and pruning. Database only.

use netledger_core::MAX_RETENTION_DAYS;

use crate::cli::{RetentionArgs, RetentionCommand};
use crate::error::CliError;
use crate::output;

use super::Context;

pub async fn prune(ctx: &Context) -> Result<(), CliError> {
    let result = ctx.db().prune().await;
    ctx.finish(&result)
}

pub async fn handle(ctx: &Context, args: RetentionArgs) -> Result<(), CliError> {
    let db = ctx.db();
    match args.command {
        RetentionCommand::Show => {
            let days = db.retention_days().await?;
            let out = output::render_single(
                &ctx.global.output,
                &serde_json::json!({ "retention_days": days }),
                |_| format!("Retention: {days} days"),
                |_| days.to_string(),
            );
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
        RetentionCommand::Set { days } => {
            if !(1..=MAX_RETENTION_DAYS).contains(&days) {
                return Err(CliError::Validation {
                    field: "days".into(),
                    reason: format!("must be between 1 and {MAX_RETENTION_DAYS}"),
                });
            }
            let result = db.set_retention_days(days).await;
            ctx.finish(&result)
        }
    }
}
