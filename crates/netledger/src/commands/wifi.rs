//! WiFi broadcast command handlers.

use tabled::Tabled;

use netledger_store::WifiBroadcast;

use crate::cli::{WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WifiRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Broadcasting")]
    broadcasting: String,
}

impl From<&WifiBroadcast> for WifiRow {
    fn from(w: &WifiBroadcast) -> Self {
        Self {
            id: w.id.to_string(),
            ssid: w.ssid.clone(),
            active: if w.active { "yes" } else { "no" }.into(),
            broadcasting: if w.hide_name { "hidden" } else { "visible" }.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: WifiArgs) -> Result<(), CliError> {
    match args.command {
        WifiCommand::List => {
            let broadcasts = ctx.db().wifi_broadcasts().await?;
            let out = output::render_list(&ctx.global.output, &broadcasts, |w| WifiRow::from(w), |w| {
                w.id.to_string()
            });
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        WifiCommand::Toggle { id } => {
            let id = util::parse_uuid(&id, "wifi broadcast")?;
            if !util::confirm(&format!("Toggle SSID broadcasting for {id}?"), ctx.global.yes)? {
                return Ok(());
            }
            let ledger = ctx.ledger().await?;
            let result = ledger.toggle_broadcast(&id).await;
            util::admin_outcome(&result)?;
            ctx.finish(&result)
        }
    }
}
