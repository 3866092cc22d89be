use kanal::AsyncReceiver;
use notedeck_core::{Filter, MarkingStore, MarkingTag, PageSize, TableViewController, ViewError};
use tokio_util::sync::CancellationToken;

use crate::render;

pub const HELP: &str = "\
commands:
  search <text>     filter rows by text (empty clears)
  filter <mark>     all, or a marking name
  page <n>          jump to page
  next | prev       move one page
  per-page <n>      10, 25, 50 or 100
  click <row>       advance the marking of row number <row>
  show              print the current page
  quit";

/// User intent on an open table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Search(String),
    Filter(String),
    Page(usize),
    NextPage,
    PrevPage,
    PerPage(usize),
    /// 1-based row number as printed in the `#` column
    Click(usize),
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> anyhow::Result<TableEvent> {
    let line = line.trim();
    let (command, arg) = line
        .split_once(char::is_whitespace)
        .map(|(c, a)| (c, a.trim()))
        .unwrap_or((line, ""));

    let number = |what: &str| -> anyhow::Result<usize> {
        arg.parse::<usize>()
            .map_err(|_| anyhow::anyhow!("{what} expects a number, got '{arg}'"))
    };

    let event = match command.to_lowercase().as_str() {
        "search" | "s" => TableEvent::Search(arg.to_string()),
        "filter" | "f" => TableEvent::Filter(if arg.is_empty() { "all" } else { arg }.to_string()),
        "page" | "p" => TableEvent::Page(number("page")?),
        "next" | "n" => TableEvent::NextPage,
        "prev" => TableEvent::PrevPage,
        "per-page" => TableEvent::PerPage(number("per-page")?),
        "click" | "c" => match number("click")? {
            0 => anyhow::bail!("rows are numbered from 1"),
            row => TableEvent::Click(row),
        },
        "show" | "" => TableEvent::Show,
        "help" | "?" => TableEvent::Help,
        "quit" | "q" | "exit" => TableEvent::Quit,
        other => anyhow::bail!("unknown command '{other}', type 'help'"),
    };

    Ok(event)
}

fn print_view<M: MarkingTag, S: MarkingStore<M>>(controller: &TableViewController<M, S>) {
    let view = controller.view();
    println!(
        "{}",
        render::render_table(&view, &controller.state().search_query)
    );
}

/// Apply one event to the controller. Returns a message for the user when the
/// event could not be applied.
pub async fn handle_event<M: MarkingTag, S: MarkingStore<M>>(
    controller: &mut TableViewController<M, S>,
    event: TableEvent,
) -> Option<String> {
    tracing::debug!("Table event: {:?}", event);

    match event {
        TableEvent::Search(query) => controller.on_search_change(query),
        TableEvent::Filter(name) => match Filter::parse(&name) {
            Ok(filter) => controller.on_filter_change(filter),
            Err(e) => return Some(e.to_string()),
        },
        TableEvent::PerPage(n) => match PageSize::try_from(n) {
            Ok(size) => controller.on_items_per_page_change(size),
            Err(e) => return Some(e.to_string()),
        },
        TableEvent::Page(page) => {
            let last = controller.total_pages().max(1);
            if page == 0 || page > last {
                return Some(format!("page must be between 1 and {last}"));
            }
            controller.on_page_change(page);
        }
        TableEvent::NextPage => {
            let current = controller.state().current_page;
            if current >= controller.total_pages() {
                return Some("already on the last page".to_string());
            }
            controller.on_page_change(current + 1);
        }
        TableEvent::PrevPage => {
            let current = controller.state().current_page;
            if current <= 1 {
                return Some("already on the first page".to_string());
            }
            controller.on_page_change(current - 1);
        }
        TableEvent::Click(row) => {
            let Some(index) = row.checked_sub(1) else {
                return Some("rows are numbered from 1".to_string());
            };
            match controller.on_row_click(index).await {
                Ok(_) => {}
                Err(ViewError::RowOutOfRange(_)) => return Some(format!("no row {row}")),
                Err(ViewError::Store(e)) => return Some(format!("could not save marking: {e}")),
            }
        }
        TableEvent::Show => {}
        TableEvent::Help => return Some(HELP.to_string()),
        TableEvent::Quit => {}
    }

    None
}

/// Table loop: render, apply events, re-render until quit or cancel
pub async fn event_loop<M: MarkingTag, S: MarkingStore<M>>(
    mut controller: TableViewController<M, S>,
    events_rx: AsyncReceiver<TableEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    print_view(&controller);

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        if event == TableEvent::Quit {
            cancel.cancel();
            break;
        }

        let redraw = !matches!(event, TableEvent::Help);
        if let Some(message) = handle_event(&mut controller, event).await {
            println!("{message}");
        } else if redraw {
            print_view(&controller);
        }
    }

    tracing::debug!("Table loop finished");
    Ok(())
}
