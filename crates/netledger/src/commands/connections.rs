//! Client uplinks.

use tabled::Tabled;

use netledger_store::ClientConnection;

use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Tabled)]
struct ConnectionRow {
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Access Point")]
    access_point: String,
    #[tabled(rename = "Since")]
    updated_at: String,
}

impl From<&ClientConnection> for ConnectionRow {
    fn from(c: &ClientConnection) -> Self {
        Self {
            client: c.client_id.to_string(),
            access_point: c.access_point_id.to_string(),
            updated_at: c.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub async fn handle(ctx: &Context) -> Result<(), CliError> {
    let connections = ctx.db().connections().await?;
    let out = output::render_list(
        &ctx.global.output,
        &connections,
        |c| ConnectionRow::from(c),
        |c| format!("{}\t{}", c.client_id, c.access_point_id),
    );
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
