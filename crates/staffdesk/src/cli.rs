//! Clap derive structures for the `staffdesk` CLI.
//!
//! Also compiled by `build.rs` for man pages, so nothing here may
//! depend on crates other than clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// staffdesk -- attendance, leave, tasks and payslips from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "staffdesk",
    version,
    about = "Your HR companion from the command line",
    long_about = "Browse colleagues, attendance, leave, tasks, news and payslips.\n\n\
        Writes made with --offline (or while the backend is unreachable) are\n\
        kept in a local queue and replayed in order by `staffdesk queue drain`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "STAFFDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "STAFFDESK_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "STAFFDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STAFFDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Queue writes locally instead of sending them
    #[arg(long, global = true)]
    pub offline: bool,

    /// Also write logs to this file
    #[arg(long, env = "STAFFDESK_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the employee directory
    #[command(alias = "emp")]
    Employees(EmployeesArgs),

    /// View attendance and check in or out
    #[command(alias = "att")]
    Attendance(AttendanceArgs),

    /// Request, cancel and review leave
    Leave(LeaveArgs),

    /// View and update tasks
    Tasks(TasksArgs),

    /// Read company news
    News(NewsArgs),

    /// View notifications
    #[command(alias = "notif")]
    Notifications(NotificationsArgs),

    /// View payslips
    Payslips(PayslipsArgs),

    /// Inspect and replay the offline write queue
    Queue(QueueArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Pagination arguments shared by every list command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Records per page (defaults to the profile's page size)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Number of pages to fetch
    #[arg(long, default_value = "1", conflicts_with = "all")]
    pub pages: u32,

    /// Keep fetching until the last page
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// A record identifier.
#[derive(Debug, Args)]
pub struct IdArg {
    /// Record ID
    pub id: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EMPLOYEES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EmployeesArgs {
    #[command(subcommand)]
    pub command: EmployeesCommand,
}

#[derive(Debug, Subcommand)]
pub enum EmployeesCommand {
    /// List colleagues
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one colleague
    Show(IdArg),

    /// Show your own profile
    Me,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ATTENDANCE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    pub command: AttendanceCommand,
}

#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    /// List attendance records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one attendance record
    Show(IdArg),

    /// Check in now
    CheckIn(MarkArgs),

    /// Check out now
    CheckOut(MarkArgs),
}

#[derive(Debug, Args)]
pub struct MarkArgs {
    /// Free-text note attached to the mark
    #[arg(long)]
    pub note: Option<String>,

    /// Latitude of the mark
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Longitude of the mark
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    pub longitude: Option<f64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LEAVE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LeaveArgs {
    #[command(subcommand)]
    pub command: LeaveCommand,
}

#[derive(Debug, Subcommand)]
pub enum LeaveCommand {
    /// List leave requests
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one leave request
    Show(IdArg),

    /// Show remaining leave per type
    Balances,

    /// Request time off
    Request {
        /// Leave type (e.g., annual, sick)
        #[arg(long = "type", short = 't')]
        leave_type: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last day (YYYY-MM-DD); defaults to the first day
        #[arg(long)]
        to: Option<String>,

        /// Reason shown to the approver
        #[arg(long)]
        reason: Option<String>,
    },

    /// Cancel one of your pending requests
    Cancel(IdArg),

    /// Approve a request (managers)
    Approve(DecisionArgs),

    /// Reject a request (managers)
    Reject(DecisionArgs),
}

#[derive(Debug, Args)]
pub struct DecisionArgs {
    /// Leave request ID
    pub id: String,

    /// Note for the requester
    #[arg(long)]
    pub note: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TASKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List tasks
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one task
    Show(IdArg),

    /// Move a task to a new status
    Status {
        /// Task ID
        id: String,

        /// New status (todo, in_progress, done, blocked)
        status: String,

        /// Note recorded with the change
        #[arg(long)]
        note: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NEWS & NOTIFICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NewsArgs {
    #[command(subcommand)]
    pub command: NewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NewsCommand {
    /// List news items
    #[command(alias = "ls")]
    List(ListArgs),

    /// Read one news item
    Show(IdArg),
}

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark a notification as read
    Read(IdArg),

    /// Poll for new notifications and print each one as it arrives
    Watch {
        /// Seconds between polls
        #[arg(long, default_value = "30")]
        interval: u64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PAYSLIPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PayslipsArgs {
    #[command(subcommand)]
    pub command: PayslipsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PayslipsCommand {
    /// List payslips
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one payslip with its line items
    Show(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  QUEUE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// List writes waiting to be sent
    #[command(alias = "ls")]
    Status,

    /// Send queued writes in order, stopping at the first failure
    Drain,

    /// Drop one queued write without sending it
    Discard {
        /// Queued write ID (UUID)
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g., base_url, page_size, insecure)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,

        /// Remove the stored token instead of prompting for a new one
        #[arg(long)]
        clear: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
