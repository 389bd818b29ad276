//! Attendance handlers: history, detail, check-in and check-out.

use chrono::{DateTime, Local, Utc};
use tabled::Tabled;

use staffdesk_core::present::{Domain, format_hours, status_badge};
use staffdesk_core::{AppContext, AttendanceMark, AttendanceRecord, WriteOp, WriteOutcome};

use crate::cli::{AttendanceArgs, AttendanceCommand, GlobalOpts, MarkArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AttendanceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "In")]
    check_in: String,
    #[tabled(rename = "Out")]
    check_out: String,
    #[tabled(rename = "Worked")]
    worked: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn clock(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "-".into(),
        |t| t.with_timezone(&Local).format("%H:%M").to_string(),
    )
}

fn row(a: &AttendanceRecord, color: bool) -> AttendanceRow {
    AttendanceRow {
        id: a.id.to_string(),
        date: a.date.to_string(),
        check_in: clock(a.check_in),
        check_out: clock(a.check_out),
        worked: a.hours().map(format_hours).unwrap_or_default(),
        status: output::paint_badge(status_badge(a.status), color),
    }
}

fn detail(a: &AttendanceRecord) -> String {
    let mut lines = vec![
        format!("ID:        {}", a.id),
        format!("Date:      {}", a.date),
        format!("Check-in:  {}", clock(a.check_in)),
        format!("Check-out: {}", clock(a.check_out)),
        format!("Status:    {}", status_badge(a.status).label),
    ];
    if let Some(hours) = a.hours() {
        lines.push(format!("Worked:    {}", format_hours(hours)));
    }
    if a.is_open() {
        lines.push("Open:      still checked in".into());
    }
    lines.join("\n")
}

fn mark(args: MarkArgs) -> AttendanceMark {
    AttendanceMark {
        timestamp: Utc::now(),
        latitude: args.latitude,
        longitude: args.longitude,
        note: args.note,
    }
}

async fn record_mark(
    ctx: &AppContext,
    op: WriteOp,
    verb: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match util::submit(ctx, op, global).await? {
        Some(WriteOutcome::Attendance(record)) => {
            let out = output::render_single(global.output, &record, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
        }
        Some(_) => output::note(&format!("{verb} recorded"), global.quiet),
        None => {}
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: AttendanceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AttendanceCommand::List(list) => {
            let records: Vec<AttendanceRecord> =
                util::fetch_list(ctx, &list, Domain::Attendance, global).await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &records,
                |a| row(a, color),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AttendanceCommand::Show(target) => {
            let record: AttendanceRecord =
                util::fetch_detail(ctx, &target.id, "attendance").await?;
            let out = output::render_single(global.output, &record, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AttendanceCommand::CheckIn(args) => {
            record_mark(ctx, WriteOp::CheckIn(mark(args)), "Check-in", global).await
        }

        AttendanceCommand::CheckOut(args) => {
            record_mark(ctx, WriteOp::CheckOut(mark(args)), "Check-out", global).await
        }
    }
}
