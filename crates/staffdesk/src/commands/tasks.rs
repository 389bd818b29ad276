//! Task handlers. Status changes are applied optimistically through a
//! detail controller when online, and queued otherwise.

use chrono::Local;
use tabled::Tabled;

use staffdesk_core::present::{Domain, priority_badge, status_badge};
use staffdesk_core::{
    AppContext, CoreError, DetailController, EntityId, MutationOutcome, StatusTag, StatusUpdate,
    Submitted, Task, WriteOp, WriteOutcome,
};

use crate::cli::{GlobalOpts, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, or_dash};

const SETTABLE: &[StatusTag] = &[
    StatusTag::Todo,
    StatusTag::InProgress,
    StatusTag::Done,
    StatusTag::Blocked,
];

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn row(t: &Task, color: bool) -> TaskRow {
    let today = Local::now().date_naive();
    let due = t.due_date.map(|d| d.to_string()).unwrap_or_default();
    TaskRow {
        id: t.id.to_string(),
        title: t.title.clone(),
        due: if t.is_overdue(today) {
            format!("{due} (overdue)")
        } else {
            due
        },
        priority: output::paint_badge(priority_badge(t.priority), color),
        status: output::paint_badge(status_badge(t.status), color),
    }
}

fn detail(t: &Task) -> String {
    [
        format!("ID:        {}", t.id),
        format!("Title:     {}", t.title),
        format!("Due:       {}", t.due_date.map_or_else(|| "-".into(), |d| d.to_string())),
        format!("Priority:  {}", priority_badge(t.priority).label),
        format!("Status:    {}", status_badge(t.status).label),
        format!("Details:   {}", or_dash(t.description.as_deref())),
    ]
    .join("\n")
}

fn parse_status(raw: &str) -> Result<StatusTag, CliError> {
    let tag = StatusTag::parse(raw);
    if SETTABLE.contains(&tag) {
        Ok(tag)
    } else {
        Err(CliError::Validation {
            field: "status".into(),
            reason: format!("'{raw}' is not one of todo, in_progress, done, blocked"),
        })
    }
}

/// Load the task, flip its status locally, and settle on the backend's
/// answer. A write that ends up queued keeps the local edit.
async fn update_online(
    ctx: &AppContext,
    id: EntityId,
    op: WriteOp,
    tag: StatusTag,
    global: &GlobalOpts,
) -> Result<Task, CliError> {
    let detail: DetailController<Task, _> = ctx.detail();
    detail.load(id).await;
    let loaded = detail.snapshot();
    let Some(mut optimistic) = loaded.value else {
        return Err(match loaded.last_error {
            Some(err) => err.into(),
            None => CliError::Offline {
                message: "no response".into(),
            },
        });
    };
    optimistic.status = tag;

    let confirm = async {
        match ctx.submit(op).await? {
            Submitted::Applied(WriteOutcome::Task(task)) => Ok(task),
            Submitted::Applied(_) => Ok(optimistic.clone()),
            Submitted::Queued(queued) => {
                output::note(&format!("Queued task update ({queued})"), global.quiet);
                Ok::<_, CoreError>(optimistic.clone())
            }
        }
    };

    match detail.mutate(|t| t.status = tag, confirm).await {
        MutationOutcome::Committed | MutationOutcome::Superseded => detail
            .snapshot()
            .value
            .ok_or_else(|| CliError::Offline {
                message: "task disappeared during update".into(),
            }),
        MutationOutcome::RolledBack(err) => Err(err.into()),
        MutationOutcome::NoValue => Err(CliError::NotFound {
            resource_type: "task".into(),
            identifier: optimistic.id.to_string(),
            list_command: "tasks list".into(),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &AppContext, args: TasksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List(list) => {
            let tasks: Vec<Task> = util::fetch_list(ctx, &list, Domain::Tasks, global).await?;
            let color = output::should_color(global.color);
            let out =
                output::render_list(global.output, &tasks, |t| row(t, color), |t| t.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Show(target) => {
            let task: Task = util::fetch_detail(ctx, &target.id, "tasks").await?;
            let out = output::render_single(global.output, &task, detail, |t| t.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Status { id, status, note } => {
            let tag = parse_status(&status)?;
            let id = EntityId::from(id);
            let op = WriteOp::UpdateTaskStatus {
                id: id.clone(),
                update: StatusUpdate {
                    status: tag.to_string(),
                    note,
                },
            };

            // Offline or behind queued writes: keep order, no local preview.
            if !ctx.connectivity().is_online() || !ctx.queue().is_empty() {
                util::submit(ctx, op, global).await?;
                return Ok(());
            }

            let task = update_online(ctx, id, op, tag, global).await?;
            let out = output::render_single(global.output, &task, detail, |t| t.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
