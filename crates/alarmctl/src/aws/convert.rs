//! Conversion between CloudWatch SDK types and [`AlarmDocument`].
//!
//! Documents use the field names of the DescribeAlarms response so that
//! `--set` keys match what `aws cloudwatch describe-alarms` prints.

use alarm_models::AlarmDocument;
use aws_sdk_cloudwatch::operation::put_metric_alarm::builders::PutMetricAlarmInputBuilder;
use aws_sdk_cloudwatch::primitives::{DateTime, DateTimeFormat};
use aws_sdk_cloudwatch::types::{
    ComparisonOperator, Dimension, Metric, MetricAlarm, MetricDataQuery, MetricStat,
    StandardUnit, Statistic,
};
use serde_json::{json, Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("'{0}' is not a writable alarm field")]
    Unsupported(String),
    #[error("'{key}' must be {expected}")]
    WrongType { key: String, expected: &'static str },
}

fn wrong_type(key: &str, expected: &'static str) -> ConvertError {
    ConvertError::WrongType {
        key: key.to_string(),
        expected,
    }
}

/// Map a described alarm into a document. Only populated fields are emitted,
/// except for the three action lists and `Dimensions` which are always present.
pub fn to_document(alarm: &MetricAlarm) -> AlarmDocument {
    let mut doc = Map::new();

    put_str(&mut doc, "AlarmName", alarm.alarm_name());
    put_str(&mut doc, "AlarmArn", alarm.alarm_arn());
    put_str(&mut doc, "AlarmDescription", alarm.alarm_description());
    put_str(
        &mut doc,
        "AlarmConfigurationUpdatedTimestamp",
        timestamp(alarm.alarm_configuration_updated_timestamp()).as_deref(),
    );
    if let Some(enabled) = alarm.actions_enabled() {
        doc.insert("ActionsEnabled".to_string(), Value::Bool(enabled));
    }
    doc.insert("OKActions".to_string(), json!(alarm.ok_actions()));
    doc.insert("AlarmActions".to_string(), json!(alarm.alarm_actions()));
    doc.insert(
        "InsufficientDataActions".to_string(),
        json!(alarm.insufficient_data_actions()),
    );
    put_str(&mut doc, "StateValue", alarm.state_value().map(|s| s.as_str()));
    put_str(&mut doc, "StateReason", alarm.state_reason());
    put_str(&mut doc, "StateReasonData", alarm.state_reason_data());
    put_str(
        &mut doc,
        "StateUpdatedTimestamp",
        timestamp(alarm.state_updated_timestamp()).as_deref(),
    );
    put_str(&mut doc, "MetricName", alarm.metric_name());
    put_str(&mut doc, "Namespace", alarm.namespace());
    put_str(&mut doc, "Statistic", alarm.statistic().map(|s| s.as_str()));
    put_str(&mut doc, "ExtendedStatistic", alarm.extended_statistic());
    doc.insert("Dimensions".to_string(), dimensions_json(alarm.dimensions()));

    for (key, value) in [
        ("Period", alarm.period()),
        ("EvaluationPeriods", alarm.evaluation_periods()),
        ("DatapointsToAlarm", alarm.datapoints_to_alarm()),
    ] {
        if let Some(value) = value {
            doc.insert(key.to_string(), json!(value));
        }
    }
    put_str(&mut doc, "Unit", alarm.unit().map(|u| u.as_str()));
    if let Some(threshold) = alarm.threshold() {
        doc.insert("Threshold".to_string(), json!(threshold));
    }
    put_str(
        &mut doc,
        "ComparisonOperator",
        alarm.comparison_operator().map(|c| c.as_str()),
    );
    put_str(&mut doc, "TreatMissingData", alarm.treat_missing_data());
    put_str(
        &mut doc,
        "EvaluateLowSampleCountPercentile",
        alarm.evaluate_low_sample_count_percentile(),
    );
    if !alarm.metrics().is_empty() {
        let metrics = alarm.metrics().iter().map(query_json).collect();
        doc.insert("Metrics".to_string(), Value::Array(metrics));
    }
    put_str(&mut doc, "ThresholdMetricId", alarm.threshold_metric_id());
    put_str(
        &mut doc,
        "EvaluationState",
        alarm.evaluation_state().map(|s| s.as_str()),
    );
    put_str(
        &mut doc,
        "StateTransitionedTimestamp",
        timestamp(alarm.state_transitioned_timestamp()).as_deref(),
    );

    AlarmDocument::new(doc)
}

fn put_str(doc: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        doc.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn timestamp(ts: Option<&DateTime>) -> Option<String> {
    ts.and_then(|ts| ts.fmt(DateTimeFormat::DateTime).ok())
}

fn dimensions_json(dimensions: &[Dimension]) -> Value {
    dimensions
        .iter()
        .map(|d| json!({"Name": d.name(), "Value": d.value()}))
        .collect()
}

fn query_json(query: &MetricDataQuery) -> Value {
    let mut out = Map::new();
    out.insert("Id".to_string(), json!(query.id()));

    if let Some(stat) = query.metric_stat() {
        let mut stat_out = Map::new();
        if let Some(metric) = stat.metric() {
            let mut metric_out = Map::new();
            if let Some(namespace) = metric.namespace() {
                metric_out.insert("Namespace".to_string(), json!(namespace));
            }
            if let Some(name) = metric.metric_name() {
                metric_out.insert("MetricName".to_string(), json!(name));
            }
            metric_out.insert("Dimensions".to_string(), dimensions_json(metric.dimensions()));
            stat_out.insert("Metric".to_string(), Value::Object(metric_out));
        }
        stat_out.insert("Period".to_string(), json!(stat.period()));
        stat_out.insert("Stat".to_string(), json!(stat.stat()));
        if let Some(unit) = stat.unit() {
            stat_out.insert("Unit".to_string(), json!(unit.as_str()));
        }
        out.insert("MetricStat".to_string(), Value::Object(stat_out));
    }
    if let Some(expression) = query.expression() {
        out.insert("Expression".to_string(), json!(expression));
    }
    if let Some(label) = query.label() {
        out.insert("Label".to_string(), json!(label));
    }
    if let Some(return_data) = query.return_data() {
        out.insert("ReturnData".to_string(), json!(return_data));
    }
    if let Some(period) = query.period() {
        out.insert("Period".to_string(), json!(period));
    }
    if let Some(account_id) = query.account_id() {
        out.insert("AccountId".to_string(), json!(account_id));
    }
    Value::Object(out)
}

/// Build a PutMetricAlarm request from a sanitized document.
///
/// Fields holding `null` are skipped. Any other field which PutMetricAlarm
/// can't carry is an error, so that nothing is silently dropped.
pub fn to_put_input(doc: &AlarmDocument) -> Result<PutMetricAlarmInputBuilder, ConvertError> {
    let mut input = PutMetricAlarmInputBuilder::default();

    for (key, value) in doc.fields() {
        if value.is_null() {
            continue;
        }
        let key = key.as_str();

        input = match key {
            "AlarmName" => input.alarm_name(as_str(key, value)?),
            "AlarmDescription" => input.alarm_description(as_str(key, value)?),
            "ActionsEnabled" => input.actions_enabled(as_bool(key, value)?),
            "OKActions" => input.set_ok_actions(Some(as_strings(key, value)?)),
            "AlarmActions" => input.set_alarm_actions(Some(as_strings(key, value)?)),
            "InsufficientDataActions" => {
                input.set_insufficient_data_actions(Some(as_strings(key, value)?))
            }
            "MetricName" => input.metric_name(as_str(key, value)?),
            "Namespace" => input.namespace(as_str(key, value)?),
            "Statistic" => input.statistic(Statistic::from(as_str(key, value)?)),
            "ExtendedStatistic" => input.extended_statistic(as_str(key, value)?),
            "Dimensions" => input.set_dimensions(Some(as_dimensions(key, value)?)),
            "Period" => input.period(as_i32(key, value)?),
            "Unit" => input.unit(StandardUnit::from(as_str(key, value)?)),
            "EvaluationPeriods" => input.evaluation_periods(as_i32(key, value)?),
            "DatapointsToAlarm" => input.datapoints_to_alarm(as_i32(key, value)?),
            "Threshold" => input.threshold(as_f64(key, value)?),
            "ComparisonOperator" => {
                input.comparison_operator(ComparisonOperator::from(as_str(key, value)?))
            }
            "TreatMissingData" => input.treat_missing_data(as_str(key, value)?),
            "EvaluateLowSampleCountPercentile" => {
                input.evaluate_low_sample_count_percentile(as_str(key, value)?)
            }
            "Metrics" => input.set_metrics(Some(as_queries(key, value)?)),
            "ThresholdMetricId" => input.threshold_metric_id(as_str(key, value)?),
            _ => return Err(ConvertError::Unsupported(key.to_string())),
        };
    }
    Ok(input)
}

fn as_str<'v>(key: &str, value: &'v Value) -> Result<&'v str, ConvertError> {
    value.as_str().ok_or_else(|| wrong_type(key, "a string"))
}

// Booleans set from the command line arrive as strings.
fn as_bool(key: &str, value: &Value) -> Result<bool, ConvertError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(wrong_type(key, "true or false")),
    }
}

fn as_i32(key: &str, value: &Value) -> Result<i32, ConvertError> {
    value
        .as_i64()
        .and_then(|i| i32::try_from(i).ok())
        .ok_or_else(|| wrong_type(key, "a 32-bit integer"))
}

fn as_f64(key: &str, value: &Value) -> Result<f64, ConvertError> {
    value.as_f64().ok_or_else(|| wrong_type(key, "a number"))
}

fn as_strings(key: &str, value: &Value) -> Result<Vec<String>, ConvertError> {
    let expected = "a list of strings";

    value
        .as_array()
        .ok_or_else(|| wrong_type(key, expected))?
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| wrong_type(key, expected))
        })
        .collect()
}

// Dimensions are described as `{"Name": .., "Value": ..}` objects. A list
// given with --set holds `Name=Value` strings instead.
fn as_dimensions(key: &str, value: &Value) -> Result<Vec<Dimension>, ConvertError> {
    let expected = "a list of {Name, Value} objects or Name=Value strings";

    let items = value.as_array().ok_or_else(|| wrong_type(key, expected))?;
    let mut dimensions = Vec::with_capacity(items.len());

    for item in items {
        let (name, value) = match item {
            Value::String(s) => s.split_once('=').ok_or_else(|| wrong_type(key, expected))?,
            Value::Object(obj) => match (obj.get("Name"), obj.get("Value")) {
                (Some(Value::String(name)), Some(Value::String(value))) => {
                    (name.as_str(), value.as_str())
                }
                _ => return Err(wrong_type(key, expected)),
            },
            _ => return Err(wrong_type(key, expected)),
        };
        dimensions.push(Dimension::builder().name(name).value(value).build());
    }
    Ok(dimensions)
}

fn as_queries(key: &str, value: &Value) -> Result<Vec<MetricDataQuery>, ConvertError> {
    let expected = "a list of metric data queries";

    value
        .as_array()
        .ok_or_else(|| wrong_type(key, expected))?
        .iter()
        .map(|item| {
            let obj = item.as_object().ok_or_else(|| wrong_type(key, expected))?;
            as_query(key, obj)
        })
        .collect()
}

fn as_query(key: &str, obj: &Map<String, Value>) -> Result<MetricDataQuery, ConvertError> {
    let field = |name: &str| obj.get(name).filter(|v| !v.is_null());

    // Every query needs an Id for ThresholdMetricId and expressions to refer to.
    let id = field("Id")
        .ok_or_else(|| wrong_type(key, "a list of queries which each have an Id"))?;
    let mut query = MetricDataQuery::builder().id(as_str(key, id)?);

    if let Some(stat) = field("MetricStat") {
        let stat = stat
            .as_object()
            .ok_or_else(|| wrong_type(key, "a MetricStat object"))?;
        query = query.metric_stat(as_metric_stat(key, stat)?);
    }
    if let Some(expression) = field("Expression") {
        query = query.expression(as_str(key, expression)?);
    }
    if let Some(label) = field("Label") {
        query = query.label(as_str(key, label)?);
    }
    if let Some(return_data) = field("ReturnData") {
        query = query.return_data(as_bool(key, return_data)?);
    }
    if let Some(period) = field("Period") {
        query = query.period(as_i32(key, period)?);
    }
    if let Some(account_id) = field("AccountId") {
        query = query.account_id(as_str(key, account_id)?);
    }
    Ok(query.build())
}

fn as_metric_stat(key: &str, obj: &Map<String, Value>) -> Result<MetricStat, ConvertError> {
    let mut stat = MetricStat::builder();

    if let Some(metric) = obj.get("Metric").and_then(Value::as_object) {
        let mut builder = Metric::builder();
        if let Some(namespace) = metric.get("Namespace") {
            builder = builder.namespace(as_str(key, namespace)?);
        }
        if let Some(name) = metric.get("MetricName") {
            builder = builder.metric_name(as_str(key, name)?);
        }
        if let Some(dimensions) = metric.get("Dimensions") {
            builder = builder.set_dimensions(Some(as_dimensions(key, dimensions)?));
        }
        stat = stat.metric(builder.build());
    }
    if let Some(period) = obj.get("Period") {
        stat = stat.period(as_i32(key, period)?);
    }
    if let Some(s) = obj.get("Stat") {
        stat = stat.stat(as_str(key, s)?);
    }
    if let Some(unit) = obj.get("Unit") {
        stat = stat.unit(StandardUnit::from(as_str(key, unit)?));
    }
    Ok(stat.build())
}
