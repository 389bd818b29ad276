//! Shared helpers for command handlers.

use chrono::NaiveDate;

use staffdesk_core::present::{DetailView, Domain, ScreenView};
use staffdesk_core::{
    AppContext, DetailController, EntityId, ListController, LoadOutcome, PageSource, Record,
    RecordSource, RemoteSource, Submitted, WriteOp, WriteOutcome,
};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

/// Drive a list controller through the requested pages and return what
/// the screen would show.
pub async fn fetch_list<T>(
    ctx: &AppContext,
    args: &ListArgs,
    domain: Domain,
    global: &GlobalOpts,
) -> Result<Vec<T>, CliError>
where
    T: Record,
    RemoteSource: PageSource<T>,
{
    let page_size = args.limit.unwrap_or(ctx.config().page_size);
    let list: ListController<T, _> = ListController::with_page_size(ctx.source(), page_size);

    let mut outcome = list.refresh().await;
    let mut pages = 1;
    while matches!(outcome, LoadOutcome::Applied { .. }) && (args.all || pages < args.pages) {
        outcome = list.load_more().await;
        if outcome == LoadOutcome::Skipped {
            break;
        }
        pages += 1;
    }
    tracing::debug!(%domain, pages, "list fetch finished");

    list.with_state(|state| match ScreenView::from_list(state, domain.empty_copy()) {
        ScreenView::Content {
            items, stale_error, ..
        } => {
            if let Some(message) = stale_error {
                output::note(&format!("warning: {message}"), global.quiet);
            }
            Ok(items.into_iter().cloned().collect())
        }
        ScreenView::Empty(copy) => {
            output::note(&format!("{}. {}", copy.title, copy.hint), global.quiet);
            Ok(Vec::new())
        }
        ScreenView::Error { .. } | ScreenView::Loading => match state.last_error.clone() {
            Some(err) => Err(err.into()),
            None => Ok(Vec::new()),
        },
    })
}

/// Load one record through a detail controller.
pub async fn fetch_detail<T>(ctx: &AppContext, id: &str, resource: &str) -> Result<T, CliError>
where
    T: Record,
    RemoteSource: RecordSource<T>,
{
    let detail: DetailController<T, _> = ctx.detail();
    detail.load(EntityId::from(id)).await;

    let state = detail.snapshot();
    match DetailView::from_detail(&state) {
        DetailView::Ready { value, .. } => Ok(value.clone()),
        DetailView::Missing => Err(CliError::NotFound {
            resource_type: resource.into(),
            identifier: id.into(),
            list_command: format!("{resource} list"),
        }),
        DetailView::Error { .. } | DetailView::Loading => Err(state
            .last_error
            .clone()
            .map_or_else(
                || CliError::Offline {
                    message: "no response".into(),
                },
                CliError::from,
            )),
    }
}

/// Send a write now or queue it, and tell the user which happened.
pub async fn submit(
    ctx: &AppContext,
    op: WriteOp,
    global: &GlobalOpts,
) -> Result<Option<WriteOutcome>, CliError> {
    let label = op.kind().label();
    match ctx.submit(op).await? {
        Submitted::Applied(outcome) => Ok(Some(outcome)),
        Submitted::Queued(id) => {
            output::note(
                &format!("Queued {label} ({id}); it will be sent by `staffdesk queue drain`"),
                global.quiet,
            );
            Ok(None)
        }
    }
}

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}

/// `-` for missing optional values in detail blocks.
pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_must_be_iso() {
        assert!(parse_date("from", "2024-07-01").is_ok());
        assert!(matches!(
            parse_date("from", "01/07/2024"),
            Err(CliError::Validation { ref field, .. }) if field == "from"
        ));
    }
}
