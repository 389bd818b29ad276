//! Offline queue handlers: inspect, replay and discard pending writes.

use chrono::Utc;
use tabled::Tabled;
use uuid::Uuid;

use staffdesk_core::present::time_ago;
use staffdesk_core::{AppContext, DrainReport, DrainStop, QueuedWrite};

use crate::cli::{GlobalOpts, QueueArgs, QueueCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Queued")]
    queued: String,
    #[tabled(rename = "Retries")]
    retries: u32,
}

fn summary(report: &DrainReport) -> String {
    format!(
        "Sent {}, dropped {}, {} still pending",
        report.applied, report.discarded, report.remaining
    )
}

/// Turn a halted drain into an error carrying the reason; a clean or
/// contended drain is not a failure.
fn halt_error(report: DrainReport) -> Option<CliError> {
    let reason = match report.stopped {
        DrainStop::Completed | DrainStop::AlreadyDraining => return None,
        DrainStop::Offline => "the backend is unreachable".to_owned(),
        DrainStop::Unauthorized => "the session expired; sign in again".to_owned(),
        DrainStop::Rejected { id, error } => format!("write {id} was rejected: {error}"),
        DrainStop::ServerError { id, error } => format!("write {id} failed: {error}"),
        DrainStop::Storage(error) => return Some(error.into()),
    };
    Some(CliError::QueueHalted {
        reason,
        remaining: report.remaining,
    })
}

fn parse_id(raw: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(raw).map_err(|_| CliError::Validation {
        field: "id".into(),
        reason: format!("'{raw}' is not a queued write ID"),
    })
}

pub async fn handle(ctx: &AppContext, args: QueueArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        QueueCommand::Status => {
            let pending: Vec<QueuedWrite> = ctx.queue().pending().await;
            if pending.is_empty() {
                output::note("No pending writes", global.quiet);
                return Ok(());
            }
            let now = Utc::now();
            let out = output::render_list(
                global.output,
                &pending,
                |w| QueueRow {
                    id: w.id.to_string(),
                    kind: w.kind.label().to_owned(),
                    queued: time_ago(w.created_at, now),
                    retries: w.retry_count,
                },
                |w| w.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QueueCommand::Drain => {
            if ctx.queue().is_empty() {
                output::note("No pending writes", global.quiet);
                return Ok(());
            }
            let report = ctx.drain().await;
            tracing::info!(
                applied = report.applied,
                discarded = report.discarded,
                remaining = report.remaining,
                "queue drain finished"
            );
            output::note(&summary(&report), global.quiet);
            if report.stopped == DrainStop::AlreadyDraining {
                output::note("Another drain is already running", global.quiet);
            }
            halt_error(report).map_or(Ok(()), Err)
        }

        QueueCommand::Discard { id } => {
            let id = parse_id(&id)?;
            if !util::confirm(&format!("Discard queued write {id}?"), global.yes)? {
                return Ok(());
            }
            match ctx.queue().discard(id).await? {
                Some(write) => {
                    output::note(
                        &format!("Discarded {} ({})", write.kind.label(), write.id),
                        global.quiet,
                    );
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "queued write".into(),
                    identifier: id.to_string(),
                    list_command: "queue status".into(),
                }),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use staffdesk_core::CoreError;

    fn report(stopped: DrainStop) -> DrainReport {
        DrainReport {
            applied: 1,
            discarded: 0,
            remaining: 2,
            stopped,
        }
    }

    #[test]
    fn completed_drain_is_not_an_error() {
        assert!(halt_error(report(DrainStop::Completed)).is_none());
        assert!(halt_error(report(DrainStop::AlreadyDraining)).is_none());
    }

    #[test]
    fn rejected_head_halts_with_remaining_count() {
        let err = halt_error(report(DrainStop::Rejected {
            id: Uuid::nil(),
            error: CoreError::Validation {
                message: "end date is before start date".into(),
                fields: std::collections::BTreeMap::new(),
            },
        }))
        .unwrap();
        assert!(matches!(err, CliError::QueueHalted { remaining: 2, .. }));
        assert_eq!(err.exit_code(), crate::error::exit_code::QUEUE);
    }

    #[test]
    fn ids_must_be_uuids() {
        assert!(parse_id("not-a-uuid").is_err());
        assert_eq!(parse_id(&Uuid::nil().to_string()).unwrap(), Uuid::nil());
    }
}
