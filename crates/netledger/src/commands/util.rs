//! Shared helpers for command handlers.

use std::io::IsTerminal;

use uuid::Uuid;

use netledger_core::{EntityKind, OperationResult, messages};

use crate::cli::KindArg;
use crate::error::CliError;

/// Parse a UUID argument, naming the resource on failure.
pub fn parse_uuid(value: &str, resource: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(value.trim()).map_err(|_| CliError::Validation {
        field: format!("{resource} id"),
        reason: format!("'{value}' is not a UUID"),
    })
}

pub fn entity_kind(kind: KindArg) -> EntityKind {
    match kind {
        KindArg::AccessPoints => EntityKind::AccessPoints,
        KindArg::WifiBroadcasts => EntityKind::WifiBroadcasts,
        KindArg::Clients => EntityKind::Clients,
        KindArg::Connections => EntityKind::Connections,
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Remote change applied but not recorded locally.
pub fn is_partial(result: &OperationResult) -> bool {
    !result.successful
        && (result.message == messages::RESTART_NOT_RECORDED
            || result.message == messages::TOGGLE_NOT_RECORDED)
}

/// Turn an admin action result into the CLI outcome, keeping the
/// partial-success exit code distinct.
pub fn admin_outcome(result: &OperationResult) -> Result<(), CliError> {
    if is_partial(result) {
        let mut message = result.message.clone();
        for e in &result.errors {
            message.push_str("\n  ");
            message.push_str(e);
        }
        return Err(CliError::PartialSuccess { message });
    }
    Ok(())
}
