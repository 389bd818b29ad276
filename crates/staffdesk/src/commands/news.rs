//! Company news handlers.

use chrono::Utc;
use tabled::Tabled;

use staffdesk_core::present::{Domain, time_ago};
use staffdesk_core::{AppContext, NewsItem};

use crate::cli::{GlobalOpts, NewsArgs, NewsCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, or_dash};

#[derive(Tabled)]
struct NewsRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Published")]
    published: String,
}

fn detail(n: &NewsItem) -> String {
    let mut lines = vec![
        n.title.clone(),
        format!(
            "{} · {}",
            or_dash(n.author.as_deref()),
            n.published_at.format("%Y-%m-%d %H:%M UTC")
        ),
        String::new(),
    ];
    if let Some(body) = n.body.as_deref().or(n.summary.as_deref()) {
        lines.push(body.to_owned());
    }
    lines.join("\n")
}

pub async fn handle(ctx: &AppContext, args: NewsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        NewsCommand::List(list) => {
            let items: Vec<NewsItem> = util::fetch_list(ctx, &list, Domain::News, global).await?;
            let now = Utc::now();
            let out = output::render_list(
                global.output,
                &items,
                |n| NewsRow {
                    id: n.id.to_string(),
                    title: n.title.clone(),
                    author: n.author.clone().unwrap_or_default(),
                    published: time_ago(n.published_at, now),
                },
                |n| n.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NewsCommand::Show(target) => {
            let item: NewsItem = util::fetch_detail(ctx, &target.id, "news").await?;
            let out = output::render_single(global.output, &item, detail, |n| n.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
