//! Employee directory handlers.

use tabled::Tabled;

use staffdesk_core::present::{Domain, initials, status_badge};
use staffdesk_core::{AppContext, Employee};

use crate::cli::{EmployeesArgs, EmployeesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::{self, or_dash};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    initials: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn row(e: &Employee, color: bool) -> EmployeeRow {
    EmployeeRow {
        id: e.id.to_string(),
        initials: initials(&e.name),
        name: e.name.clone(),
        department: e.department.clone().unwrap_or_default(),
        position: e.position.clone().unwrap_or_default(),
        status: output::paint_badge(status_badge(e.status), color),
    }
}

fn detail(e: &Employee) -> String {
    [
        format!("ID:          {}", e.id),
        format!("Name:        {} ({})", e.name, initials(&e.name)),
        format!("Email:       {}", or_dash(e.email.as_deref())),
        format!("Phone:       {}", or_dash(e.phone.as_deref())),
        format!("Department:  {}", or_dash(e.department.as_deref())),
        format!("Position:    {}", or_dash(e.position.as_deref())),
        format!("Status:      {}", status_badge(e.status).label),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: EmployeesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EmployeesCommand::List(list) => {
            let employees: Vec<Employee> =
                util::fetch_list(ctx, &list, Domain::Employees, global).await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &employees,
                |e| row(e, color),
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EmployeesCommand::Show(target) => {
            let employee: Employee = util::fetch_detail(ctx, &target.id, "employees").await?;
            let out = output::render_single(global.output, &employee, detail, |e| e.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EmployeesCommand::Me => {
            let me = ctx.current_employee().await?;
            let out = output::render_single(global.output, &me, detail, |e| e.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
