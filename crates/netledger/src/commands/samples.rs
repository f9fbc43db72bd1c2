//! Traffic samples for one access point.

use tabled::Tabled;

use netledger_store::TrafficSample;

use crate::cli::SamplesArgs;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "Time")]
    created_at: String,
    #[tabled(rename = "Uptime (s)")]
    uptime: i64,
    #[tabled(rename = "TX Retries %")]
    tx_retries: String,
    #[tabled(rename = "TX bps")]
    tx_rate: i64,
    #[tabled(rename = "RX bps")]
    rx_rate: i64,
}

impl From<&TrafficSample> for SampleRow {
    fn from(s: &TrafficSample) -> Self {
        Self {
            created_at: s.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            uptime: s.sample.uptime_sec,
            tx_retries: format!("{:.1}", s.sample.tx_retries_pct),
            tx_rate: s.sample.tx_rate_bps,
            rx_rate: s.sample.rx_rate_bps,
        }
    }
}

pub async fn handle(ctx: &Context, args: SamplesArgs) -> Result<(), CliError> {
    let id = util::parse_uuid(&args.id, "access point")?;
    let samples = ctx.db().traffic_samples(id, args.limit).await?;
    let out = output::render_list(&ctx.global.output, &samples, |s| SampleRow::from(s), |s| {
        s.id.to_string()
    });
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
