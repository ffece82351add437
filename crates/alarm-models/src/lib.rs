//! Alarm configuration documents and the declarative edits applied to them
//! before they're written back to CloudWatch.
//!
//! Nothing in this crate performs I/O. Documents are fetched and submitted by
//! `alarmctl`, which drives the types here between those two calls.

mod actions;
mod document;
mod error;
mod properties;
mod report;
mod rewrite;

pub use actions::{ActionEdit, ActionField, ChangeKind, EventScope, FieldChange};
pub use document::{AlarmDocument, Sanitize, ALARM_ARN, ALARM_NAME, SERVER_FIELDS};
pub use error::Error;
pub use properties::{Assignment, PropertySet, PropertyValue};
pub use report::{
    is_notification_ref, report_rows, topic_name, ReportRow, SubscriptionRecord, Tally,
    REPORT_FIELDS,
};
pub use rewrite::{AlarmOperation, Rewrite};
