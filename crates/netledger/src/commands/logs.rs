//! Audit log viewer.

use tabled::Tabled;

use netledger_store::AuditLogEntry;

use crate::cli::LogsArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    created_at: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Access Point")]
    access_point: String,
}

impl From<&AuditLogEntry> for LogRow {
    fn from(e: &AuditLogEntry) -> Self {
        Self {
            created_at: e.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            message: e.message.clone(),
            client: output::or_dash(e.client_id.map(|id| id.to_string()).as_deref()),
            access_point: output::or_dash(e.access_point_id.map(|id| id.to_string()).as_deref()),
        }
    }
}

pub async fn handle(ctx: &Context, args: LogsArgs) -> Result<(), CliError> {
    let entries = ctx.db().audit_log(args.limit).await?;
    let out = output::render_list(&ctx.global.output, &entries, |e| LogRow::from(e), |e| {
        e.message.clone()
    });
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
