//! Notification handlers, including a polling watch loop.

use std::time::Duration;

use chrono::{Local, Utc};
use tabled::Tabled;

use staffdesk_core::present::{Domain, time_ago};
use staffdesk_core::{AppContext, EntityId, Notification, WriteOp};

use crate::cli::{GlobalOpts, NotificationsArgs, NotificationsCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    unread: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "When")]
    when: String,
}

/// One line per arrival in `watch`. JSON formats emit one object per line.
fn watch_line(n: &Notification, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            serde_json::to_string(n).expect("serialization should not fail")
        }
        _ => {
            let at = n.created_at.with_timezone(&Local).format("%H:%M");
            match n.body.as_deref() {
                Some(body) => format!("[{at}] {}: {body}", n.title),
                None => format!("[{at}] {}", n.title),
            }
        }
    }
}

async fn watch(ctx: &AppContext, interval: u64, global: &GlobalOpts) -> Result<(), CliError> {
    // Prime the seen set so only arrivals after startup are printed.
    let primed = ctx.poll_notifications().await?;
    tracing::debug!(primed, "notification watch primed");

    let format = global.output;
    let _subscription = ctx
        .notifications()
        .subscribe(move |n| println!("{}", watch_line(n, format)));

    output::note(
        &format!("Watching for notifications every {interval}s (Ctrl-C to stop)"),
        global.quiet,
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => match ctx.poll_notifications().await {
                Ok(0) => {}
                Ok(fresh) => tracing::debug!(fresh, "new notifications"),
                Err(err) if err.is_transient() => {
                    tracing::warn!(error = %err, "notification poll failed, retrying");
                }
                Err(err) => return Err(err.into()),
            },
        }
    }
    Ok(())
}

pub async fn handle(
    ctx: &AppContext,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NotificationsCommand::List { list, unread } => {
            let mut items: Vec<Notification> =
                util::fetch_list(ctx, &list, Domain::Notifications, global).await?;
            if unread {
                items.retain(|n| !n.read);
            }
            let now = Utc::now();
            let out = output::render_list(
                global.output,
                &items,
                |n| NotificationRow {
                    id: n.id.to_string(),
                    unread: if n.read { String::new() } else { "•".into() },
                    title: n.title.clone(),
                    kind: n.kind.clone().unwrap_or_default(),
                    when: time_ago(n.created_at, now),
                },
                |n| n.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NotificationsCommand::Read(target) => {
            let op = WriteOp::MarkNotificationRead {
                id: EntityId::from(target.id.clone()),
            };
            if util::submit(ctx, op, global).await?.is_some() {
                output::note(&format!("Marked {} as read", target.id), global.quiet);
            }
            Ok(())
        }

        NotificationsCommand::Watch { interval } => watch(ctx, interval, global).await,
    }
}
