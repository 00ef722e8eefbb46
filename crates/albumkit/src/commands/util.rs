//! Shared helpers for command handlers.

use chrono::{NaiveDate, NaiveTime};

use albumkit_core::{DateRange, EntityId, PhotoFilterUpdate, Session, ToggleState};

use crate::cli::PhotoFilterArgs;
use crate::error::CliError;

/// Resolve an album identifier (ID or exact name) against a fresh album list.
pub async fn resolve_album_id(session: &Session, identifier: &str) -> Result<EntityId, CliError> {
    session.load_albums().await?;
    let albums = session.albums();
    albums
        .albums()
        .find(|a| a.id.to_string() == identifier)
        .or_else(|| albums.albums().find(|a| a.name == identifier))
        .map(|a| a.id.clone())
        .ok_or_else(|| not_found("album", identifier))
}

pub fn not_found(resource_type: &str, identifier: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.into(),
        list_command: format!("{resource_type}s list"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|_| CliError::NonInteractiveRequiresYes {
            action: action.into(),
        })
}

/// Turn a finished favorite toggle into a command result.
///
/// `Idle` means the entity was never in the store.
pub fn toggle_result(
    state: ToggleState,
    resource_type: &str,
    identifier: &str,
    store_error: Option<&str>,
) -> Result<(), CliError> {
    match state {
        ToggleState::Idle => Err(not_found(resource_type, identifier)),
        ToggleState::RolledBack => Err(CliError::FavoriteFailed {
            id: identifier.into(),
            message: store_error.unwrap_or("request failed").into(),
        }),
        ToggleState::Optimistic | ToggleState::Confirmed => Ok(()),
    }
}

// ── Photo filters ────────────────────────────────────────────────────

/// Translate filter flags into a filter update. Unset flags leave the
/// store's filters alone; dates cover whole UTC days.
pub fn filter_update(args: PhotoFilterArgs) -> PhotoFilterUpdate {
    let date_range = (args.from.is_some() || args.to.is_some()).then(|| {
        Some(DateRange::new(
            args.from.map(start_of_day),
            args.to.and_then(end_of_day),
        ))
    });

    PhotoFilterUpdate {
        tags: (!args.tags.is_empty()).then_some(args.tags),
        date_range,
        search: args.search,
        favorites_only: args.favorites.then_some(true),
    }
}

fn start_of_day(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> Option<chrono::DateTime<chrono::Utc>> {
    date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc())
}
