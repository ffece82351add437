use crate::{pipeline, AlarmService, CliContext};
use alarm_models::{ActionEdit, ChangeKind, EventScope, Sanitize};
use itertools::Itertools;

#[derive(Debug, clap::Args)]
#[clap(rename_all = "kebab-case")]
pub struct Actions {
    /// The kind of change to make.
    #[clap(long, value_enum)]
    change: ChangeKind,
    /// Which of the alarm's action lists to change.
    #[clap(long, value_enum)]
    event: EventScope,
    /// Name of the alarm to change.
    #[clap(long)]
    alarm_name: String,
    /// Action reference to remove or replace. Required for remove and replace.
    #[clap(long, visible_alias = "current-action-arn")]
    current_action_ref: Option<String>,
    /// Action reference to add, or to replace the current one with.
    /// Required for add and replace.
    #[clap(long, visible_alias = "new-action-arn")]
    new_action_ref: Option<String>,
}

impl Actions {
    pub async fn run(&self, ctx: &mut CliContext) -> anyhow::Result<()> {
        do_actions(ctx, self).await
    }
}

async fn do_actions(
    ctx: &mut CliContext,
    Actions {
        change,
        event,
        alarm_name,
        current_action_ref,
        new_action_ref,
    }: &Actions,
) -> anyhow::Result<()> {
    // Validate before any AWS configuration is loaded.
    let edit = ActionEdit::new(
        *change,
        *event,
        current_action_ref.clone(),
        new_action_ref.clone(),
    )?;

    let client = ctx.aws_client().await;
    edit_actions(&client, alarm_name, &edit).await?;

    println!("Successfully completed {change} for alarm actions '{event}' alarm '{alarm_name}'");
    Ok(())
}

/// Fetch the alarm, apply `edit` to its action lists, and write it back.
pub async fn edit_actions(
    service: &dyn AlarmService,
    alarm_name: &str,
    edit: &ActionEdit,
) -> Result<(), pipeline::Error> {
    let mut doc = pipeline::fetch_alarm(service, alarm_name)
        .await?
        .sanitize(Sanitize::KeepName);

    for change in edit.apply(&mut doc)? {
        tracing::debug!(
            field = %change.field,
            actions = %change.actions.iter().join(", "),
            "action list will be set"
        );
    }

    pipeline::put_alarm(service, &doc).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::FakeAlarms;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn edit(
        kind: ChangeKind,
        scope: EventScope,
        current: Option<&str>,
        new: Option<&str>,
    ) -> ActionEdit {
        ActionEdit::new(
            kind,
            scope,
            current.map(str::to_string),
            new.map(str::to_string),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_action() {
        let fake = FakeAlarms::with(vec![json!({
            "AlarmName": "X",
            "AlarmArn": "arn:aws:cloudwatch:eu-west-1:123456789012:alarm:X",
            "StateValue": "ALARM",
            "AlarmActions": ["arn:a"],
            "Threshold": 5,
        })]);

        edit_actions(
            &fake,
            "X",
            &edit(ChangeKind::Add, EventScope::Alarm, None, Some("arn:b")),
        )
        .await
        .unwrap();

        insta::assert_json_snapshot!(fake.puts(), @r###"
        [
          {
            "AlarmActions": [
              "arn:a",
              "arn:b"
            ],
            "AlarmName": "X",
            "Threshold": 5
          }
        ]
        "###);
        assert!(fake.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_replace_across_lists() {
        let fake = FakeAlarms::with(vec![json!({
            "AlarmName": "X",
            "OKActions": ["arn:old", "arn:keep"],
            "AlarmActions": ["arn:keep"],
            "InsufficientDataActions": ["arn:old"],
        })]);

        edit_actions(
            &fake,
            "X",
            &edit(
                ChangeKind::Replace,
                EventScope::AlarmAndOk,
                Some("arn:old"),
                Some("arn:new"),
            ),
        )
        .await
        .unwrap();

        let put = &fake.puts()[0];
        assert_eq!(put.get("OKActions"), Some(&json!(["arn:keep", "arn:new"])));
        assert_eq!(put.get("AlarmActions"), Some(&json!(["arn:keep"])));
        assert_eq!(put.get("InsufficientDataActions"), Some(&json!(["arn:old"])));
    }

    #[tokio::test]
    async fn test_empty_result_skips_put() {
        let fake = FakeAlarms::with(vec![json!({"AlarmName": "other"})]);

        let err = edit_actions(
            &fake,
            "X",
            &edit(ChangeKind::Remove, EventScope::All, Some("arn:a"), None),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, pipeline::Error::EmptyResult { .. }));
        assert!(fake.puts().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_action_list_skips_put() {
        let fake = FakeAlarms::with(vec![json!({"AlarmName": "X", "OKActions": "arn:a"})]);

        let err = edit_actions(
            &fake,
            "X",
            &edit(ChangeKind::Add, EventScope::Ok, None, Some("arn:b")),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "OKActions of alarm 'X' is not a list of action references"
        );
        assert!(fake.puts().is_empty());
    }
}
