//! Client listing.

use tabled::Tabled;

use netledger_store::Client;

use crate::cli::{ClientsArgs, ClientsCommand};
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    hostname: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            id: c.attributes.id.to_string(),
            hostname: c.attributes.hostname.clone(),
            ip: output::or_dash(c.attributes.ip_address.as_deref()),
            mac: output::or_dash(c.attributes.mac_address.as_deref()),
            active: if c.active { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(ctx: &Context, args: ClientsArgs) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List { active } => {
            let mut clients = ctx.db().clients().await?;
            if active {
                clients.retain(|c| c.active);
            }
            clients.sort_by(|a, b| {
                b.active
                    .cmp(&a.active)
                    .then_with(|| a.attributes.hostname.cmp(&b.attributes.hostname))
            });
            let out = output::render_list(&ctx.global.output, &clients, |c| ClientRow::from(c), |c| {
                c.attributes.id.to_string()
            });
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}
