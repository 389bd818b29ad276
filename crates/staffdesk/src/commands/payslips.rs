//! Payslip handlers.

use tabled::Tabled;

use staffdesk_core::present::{Domain, format_money};
use staffdesk_core::{AppContext, Payslip};

use crate::cli::{GlobalOpts, PayslipsArgs, PayslipsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PayslipRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Deductions")]
    deductions: String,
    #[tabled(rename = "Net")]
    net: String,
}

impl From<&Payslip> for PayslipRow {
    fn from(p: &Payslip) -> Self {
        Self {
            id: p.id.to_string(),
            period: p.period.to_string(),
            gross: format_money(p.gross, &p.currency),
            deductions: format_money(p.deductions, &p.currency),
            net: format_money(p.net, &p.currency),
        }
    }
}

fn detail(p: &Payslip) -> String {
    let mut lines = vec![format!("Payslip {} ({})", p.period, p.id)];
    if let Some(issued) = p.issued_at {
        lines.push(format!("Issued {issued}"));
    }
    lines.push(String::new());

    let width = p.lines.iter().map(|l| l.label.len()).max().unwrap_or(0).max(10);
    for line in &p.lines {
        let amount = if line.deduction { -line.amount.abs() } else { line.amount };
        lines.push(format!(
            "  {:<width$}  {:>14}",
            line.label,
            format_money(amount, &p.currency)
        ));
    }
    if !p.lines.is_empty() {
        lines.push(String::new());
    }

    for (label, amount) in [
        ("Gross", p.gross),
        ("Deductions", -p.deductions.abs()),
        ("Net pay", p.net),
    ] {
        lines.push(format!(
            "  {label:<width$}  {:>14}",
            format_money(amount, &p.currency)
        ));
    }
    lines.join("\n")
}

pub async fn handle(
    ctx: &AppContext,
    args: PayslipsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PayslipsCommand::List(list) => {
            let payslips: Vec<Payslip> =
                util::fetch_list(ctx, &list, Domain::Payslips, global).await?;
            let out = output::render_list(
                global.output,
                &payslips,
                |p| PayslipRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PayslipsCommand::Show(target) => {
            let payslip: Payslip = util::fetch_detail(ctx, &target.id, "payslips").await?;
            let out = output::render_single(global.output, &payslip, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
