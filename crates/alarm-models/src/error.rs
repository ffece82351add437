use crate::ActionField;

/// Errors raised while building or applying an edit to an alarm document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "invalid key=value pair '{0}': ensure there are no spaces between the key, the equals sign, and the value"
    )]
    InvalidAssignment(String),

    #[error("'{0}' can't be modified with --set; to change the name of an alarm use the recreate action")]
    FixedField(String),

    #[error("{operation} requires {argument}")]
    MissingRequiredArg {
        operation: String,
        argument: &'static str,
    },

    #[error("{field} of alarm '{alarm}' is not a list of action references")]
    InvalidActionList { alarm: String, field: ActionField },

    #[error("a new name was given for an update of alarm '{0}'; an alarm can't be renamed by update, use the recreate action instead")]
    RenameOnUpdate(String),

    #[error("the current and new alarm names are both '{0}'; maybe you want the update action instead?")]
    SameName(String),
}
