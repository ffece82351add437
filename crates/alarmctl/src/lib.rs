use clap::Parser;

mod actions;
mod alarm;
mod aws;
mod config;
mod logging;
mod output;
mod pipeline;
mod report;
mod service;
#[cfg(test)]
mod testing;

pub use aws::AwsClient;
pub use config::Config;
pub use logging::{init_logging, LogArgs, LogFormat, LogLevel};
pub use pipeline::Error;
pub use service::{AlarmService, SubscriptionService};

/// A command-line tool for editing CloudWatch alarms and their actions.
#[derive(Debug, Parser)]
#[clap(author, about, version)]
pub struct Cli {
    /// AWS region to use, e.g. eu-west-1.
    ///
    /// Defaults to the region of the selected profile, or `AWS_REGION`.
    #[clap(long, global = true)]
    region: Option<String>,

    /// AWS shared-config profile to use.
    ///
    /// Otherwise the default credential chain is used, which honors `AWS_PROFILE`.
    #[clap(long, global = true)]
    profile: Option<String>,

    /// Log diagnostic messages, such as the document which is about to be submitted.
    #[clap(long, global = true)]
    verbose: bool,

    #[clap(flatten)]
    log: LogArgs,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Add, remove, or replace one action of an alarm.
    ///
    /// The alarm is described, its action lists selected by --event are edited,
    /// and the result is submitted with PutMetricAlarm. Only one action
    /// reference is changed per invocation.
    Actions(actions::Actions),
    /// Update, copy, or recreate an alarm, optionally setting properties.
    ///
    /// Properties are given as KEY=VALUE using the field names of
    /// `aws cloudwatch describe-alarms` output, e.g. `Threshold=80` or
    /// `InsufficientDataActions=[arn:a, arn:b]`. Alarms can't be renamed in
    /// place: recreate copies the alarm to its new name and then deletes the
    /// original.
    Alarm(alarm::Alarm),
    /// List alarms and the SNS subscriptions notified by their actions.
    ///
    /// Only SNS actions are shown; scaling and EC2 actions are ignored.
    Report(report::Report),
}

#[derive(Debug)]
pub struct CliContext {
    config: Config,
    aws_client: Option<AwsClient>,
}

impl CliContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            aws_client: None,
        }
    }

    /// Returns a client of the AWS services, creating one if necessary.
    pub async fn aws_client(&mut self) -> AwsClient {
        match &self.aws_client {
            Some(client) => client.clone(),
            None => {
                let client = AwsClient::new(&self.config).await;
                self.aws_client = Some(client.clone());
                client
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            region: self.region.clone(),
            profile: self.profile.clone(),
            verbose: self.verbose,
        }
    }

    pub fn init_logging(&self) -> anyhow::Result<()> {
        init_logging(&self.log, self.verbose)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let mut context = CliContext::new(self.config());

        match &self.cmd {
            Command::Actions(actions) => actions.run(&mut context).await,
            Command::Alarm(alarm) => alarm.run(&mut context).await,
            Command::Report(report) => report.run(&mut context).await,
        }
    }
}

// new_table builds a comfy_table with UTF8 styling. Empty headers are omitted.
fn new_table(headers: Vec<&str>) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .apply_modifier(comfy_table::modifiers::UTF8_SOLID_INNER_BORDERS);

    if !headers.is_empty() {
        table.set_header(headers);
    }
    table
}
