use crate::{pipeline, AlarmService, CliContext};
use alarm_models::{AlarmOperation, PropertySet, Rewrite};
use std::io::Write;

#[derive(Debug, clap::Args)]
#[clap(rename_all = "kebab-case")]
pub struct Alarm {
    /// How the alarm is written back.
    #[clap(long, value_enum)]
    action: AlarmOperation,
    /// Name of the existing alarm.
    #[clap(long)]
    alarm_name: String,
    /// Name of the alarm to create. Required for copy and recreate.
    #[clap(long)]
    new_name: Option<String>,
    /// Properties to set, as KEY=VALUE. Keys are case sensitive.
    ///
    /// Integer and decimal values are sent as numbers, and `[a, b]` is sent
    /// as a list of strings. Everything else is sent as a string.
    #[clap(long, num_args = 1.., value_name = "KEY=VALUE")]
    set: Vec<String>,
}

impl Alarm {
    pub async fn run(&self, ctx: &mut CliContext) -> anyhow::Result<()> {
        // Arguments are fully validated before any AWS configuration is loaded.
        let rewrite = Rewrite::new(self.action, self.alarm_name.clone(), self.new_name.clone())?;
        let properties = PropertySet::parse(&self.set)?;

        let client = ctx.aws_client().await;
        rewrite_alarm(&client, &rewrite, &properties, &mut std::io::stdout()).await
    }
}

/// Fetch the source alarm, apply `properties`, and write it to its
/// destination. A recreated alarm's source is deleted only after the
/// destination was written successfully.
pub async fn rewrite_alarm(
    service: &dyn AlarmService,
    rewrite: &Rewrite,
    properties: &PropertySet,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let described = pipeline::fetch_alarm(service, rewrite.source()).await?;
    let mut doc = rewrite.prepare(described);

    for key in properties.apply(&mut doc) {
        tracing::warn!(
            %key,
            alarm = rewrite.source(),
            "key was not found in the current alarm; keys are case sensitive, so this is only expected for a property which wasn't previously set"
        );
    }
    for assignment in properties.iter() {
        tracing::debug!(key = %assignment.key, value = %assignment.value, "property will be set");
    }

    pipeline::put_alarm(service, &doc).await?;
    writeln!(
        out,
        "Successfully completed {} for alarm '{}'",
        rewrite.operation(),
        rewrite.destination()
    )?;

    if rewrite.deletes_source() {
        pipeline::delete_alarm(service, rewrite.source()).await?;
        writeln!(out, "Alarm '{}' successfully deleted", rewrite.source())?;
    }
    Ok(())
}
