use crate::output::Output;
use crate::{AlarmService, CliContext, SubscriptionService};
use alarm_models::{report_rows, ActionField, Tally};
use anyhow::Context;
use std::io::Write;

#[derive(Debug, clap::Args)]
#[clap(rename_all = "kebab-case")]
pub struct Report {
    /// Maximum number of alarms, and of subscriptions, to list.
    #[clap(long, default_value_t = 1000)]
    max_items: usize,
    #[clap(flatten)]
    output: Output,
}

impl Report {
    pub async fn run(&self, ctx: &mut CliContext) -> anyhow::Result<()> {
        let client = ctx.aws_client().await;

        let tally = write_report(
            &client,
            &client,
            self.max_items,
            &self.output,
            std::io::stdout().lock(),
        )
        .await?;

        if ctx.config().verbose {
            tracing::debug!(
                alarm_actions = tally.count(ActionField::Alarm),
                insufficient_data_actions = tally.count(ActionField::InsufficientData),
                ok_actions = tally.count(ActionField::Ok),
                total = tally.total(),
                "distinct SNS actions reported"
            );
        }
        Ok(())
    }
}

/// List alarms and subscriptions, and write a row for every subscription
/// notified by an alarm action.
pub async fn write_report(
    alarms: &dyn AlarmService,
    subscriptions: &dyn SubscriptionService,
    max_items: usize,
    output: &Output,
    out: impl Write,
) -> anyhow::Result<Tally> {
    tracing::debug!(max_items, "listing metric alarms");
    let alarms = alarms
        .list_alarms(max_items)
        .await
        .context("failed to list alarms")?;

    tracing::debug!(max_items, "listing SNS subscriptions");
    let subscriptions = subscriptions
        .list_subscriptions(max_items)
        .await
        .context("failed to list subscriptions")?;

    tracing::debug!(alarms = alarms.len(), "alarms returned");

    let mut tally = Tally::default();
    let rows = report_rows(&alarms, &subscriptions).inspect(|row| tally.record(row));
    output.write_all(out, rows)?;

    Ok(tally)
}
