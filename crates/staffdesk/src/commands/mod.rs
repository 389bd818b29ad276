//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod attendance;
pub mod config_cmd;
pub mod employees;
pub mod leave;
pub mod news;
pub mod notifications;
pub mod payslips;
pub mod queue;
pub mod tasks;
pub mod util;

use staffdesk_core::AppContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Employees(args) => employees::handle(ctx, args, global).await,
        Command::Attendance(args) => attendance::handle(ctx, args, global).await,
        Command::Leave(args) => leave::handle(ctx, args, global).await,
        Command::Tasks(args) => tasks::handle(ctx, args, global).await,
        Command::News(args) => news::handle(ctx, args, global).await,
        Command::Notifications(args) => notifications::handle(ctx, args, global).await,
        Command::Payslips(args) => payslips::handle(ctx, args, global).await,
        Command::Queue(args) => queue::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
