//! Leave handlers: requests, balances, cancellation and approvals.

use tabled::Tabled;

use staffdesk_core::present::{Domain, status_badge};
use staffdesk_core::{
    AppContext, EntityId, LeaveBalance, LeaveRequest, RangeSelection, StatusUpdate, WriteOp,
    WriteOutcome,
};

use crate::cli::{DecisionArgs, GlobalOpts, LeaveArgs, LeaveCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, or_dash};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LeaveRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    leave_type: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "To")]
    end: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn row(l: &LeaveRequest, color: bool) -> LeaveRow {
    LeaveRow {
        id: l.id.to_string(),
        leave_type: l.leave_type.clone(),
        start: l.start_date.to_string(),
        end: l.end_date.to_string(),
        days: format!("{}", l.days),
        status: output::paint_badge(status_badge(l.status), color),
    }
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Type")]
    leave_type: String,
    #[tabled(rename = "Entitled")]
    entitled: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

impl From<&LeaveBalance> for BalanceRow {
    fn from(b: &LeaveBalance) -> Self {
        Self {
            leave_type: b.leave_type.clone(),
            entitled: format!("{}", b.entitled),
            used: format!("{}", b.used),
            remaining: format!("{}", b.remaining),
        }
    }
}

fn detail(l: &LeaveRequest) -> String {
    let mut lines = vec![
        format!("ID:      {}", l.id),
        format!("Type:    {}", l.leave_type),
        format!("Dates:   {} to {} ({} day(s))", l.start_date, l.end_date, l.days),
        format!("Reason:  {}", or_dash(l.reason.as_deref())),
        format!("Status:  {}", status_badge(l.status).label),
    ];
    if l.can_cancel() {
        lines.push(format!("Cancel:  staffdesk leave cancel {}", l.id));
    }
    lines.join("\n")
}

fn print_request(outcome: Option<WriteOutcome>, done: &str, global: &GlobalOpts) {
    match outcome {
        Some(WriteOutcome::LeaveRequest(request)) => {
            let out = output::render_single(global.output, &request, detail, |l| l.id.to_string());
            output::print_output(&out, global.quiet);
        }
        Some(_) => output::note(done, global.quiet),
        None => {}
    }
}

async fn decide(
    ctx: &AppContext,
    args: DecisionArgs,
    status: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let op = WriteOp::UpdateLeaveStatus {
        id: EntityId::from(args.id),
        update: StatusUpdate {
            status: status.into(),
            note: args.note,
        },
    };
    let outcome = util::submit(ctx, op, global).await?;
    print_request(outcome, &format!("Leave request {status}"), global);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &AppContext, args: LeaveArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LeaveCommand::List(list) => {
            let requests: Vec<LeaveRequest> =
                util::fetch_list(ctx, &list, Domain::LeaveRequests, global).await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &requests,
                |l| row(l, color),
                |l| l.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LeaveCommand::Show(target) => {
            let request: LeaveRequest = util::fetch_detail(ctx, &target.id, "leave").await?;
            let out = output::render_single(global.output, &request, detail, |l| l.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LeaveCommand::Balances => {
            let balances = ctx.leave_balances().await?;
            let out = output::render_list(
                global.output,
                &balances,
                |b| BalanceRow::from(b),
                |b| b.leave_type.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LeaveCommand::Request {
            leave_type,
            from,
            to,
            reason,
        } => {
            let start = util::parse_date("from", &from)?;
            let end = to
                .as_deref()
                .map(|raw| util::parse_date("to", raw))
                .transpose()?
                .unwrap_or(start);

            let selection = RangeSelection::default().tap(start).tap(end);
            let request = selection
                .to_leave_request(leave_type, reason)
                .ok_or_else(|| CliError::Validation {
                    field: "to".into(),
                    reason: format!("end date {end} is before start date {start}"),
                })?;

            output::note(
                &format!(
                    "Requesting {} day(s), {} working",
                    selection.day_count(),
                    selection.working_days()
                ),
                global.quiet,
            );
            let outcome = util::submit(ctx, WriteOp::CreateLeaveRequest(request), global).await?;
            print_request(outcome, "Leave request submitted", global);
            Ok(())
        }

        LeaveCommand::Cancel(target) => {
            if !util::confirm(&format!("Cancel leave request {}?", target.id), global.yes)? {
                return Ok(());
            }
            let op = WriteOp::CancelLeaveRequest {
                id: EntityId::from(target.id),
            };
            let outcome = util::submit(ctx, op, global).await?;
            print_request(outcome, "Leave request cancelled", global);
            Ok(())
        }

        LeaveCommand::Approve(args) => decide(ctx, args, "approved", global).await,
        LeaveCommand::Reject(args) => decide(ctx, args, "rejected", global).await,
    }
}
