//! `hours-stat web`: report from the remote time-tracking service.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use hs_api::Client;
use hs_core::ReportAggregator;

use crate::config::Config;
use crate::render::{RenderOptions, render};

/// Fetches the signed-in user's months and prints the report as of `today`.
///
/// The current month and later months are left out, as the service only
/// knows their required hours once they are over.
pub fn run<W: Write, D: Write>(
    out: &mut W,
    diag: &mut D,
    config: &Config,
    today: NaiveDate,
    color: bool,
) -> Result<()> {
    let Some(session) = config.session.as_deref() else {
        bail!("missing session cookie; pass --session or set HOURS_STAT_SESSION");
    };
    let Some(server) = config.server.as_deref() else {
        bail!("missing server url; pass --server or set HOURS_STAT_SERVER");
    };

    let client = Client::new(server, session).context("failed to create API client")?;
    tracing::debug!(base_url = client.base_url(), "fetching remote hours");

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let snapshot = runtime
        .block_on(client.fetch_snapshot())
        .context("failed to fetch hours")?;

    let registry = snapshot.registry();
    let ledger = snapshot.ledger()?;
    let required = snapshot.required_hours(today)?;
    let years = ReportAggregator::new(&registry, &required).build(&ledger);

    let options = RenderOptions {
        language: config.report_settings().language,
        show_diff: true,
        color,
    };
    render(out, diag, &years, &options)?;
    Ok(())
}
