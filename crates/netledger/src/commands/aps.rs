//! Access point command handlers.

use tabled::Tabled;

use netledger_store::AccessPoint;

use crate::cli::{ApsArgs, ApsCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ApRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    hostname: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&AccessPoint> for ApRow {
    fn from(ap: &AccessPoint) -> Self {
        Self {
            id: ap.attributes.id.to_string(),
            hostname: ap.attributes.hostname.clone(),
            ip: output::or_dash(ap.attributes.ip_address.as_deref()),
            mac: output::or_dash(ap.attributes.mac_address.as_deref()),
            state: ap.state.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: ApsArgs) -> Result<(), CliError> {
    match args.command {
        ApsCommand::List => {
            let aps = ctx.db().access_points().await?;
            let out = output::render_list(&ctx.global.output, &aps, |ap| ApRow::from(ap), |ap| {
                ap.attributes.id.to_string()
            });
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        ApsCommand::Restart { id } => {
            let id = util::parse_uuid(&id, "access point")?;
            if !util::confirm(&format!("Restart access point {id}?"), ctx.global.yes)? {
                return Ok(());
            }
            let ledger = ctx.ledger().await?;
            let result = ledger.restart_access_point(&id).await;
            util::admin_outcome(&result)?;
            ctx.finish(&result)
        }
    }
}
