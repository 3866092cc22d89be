use std::sync::Arc;

use anyhow::Context;
use notedeck_api::{ApiClient, HttpMarkingStore};
use notedeck_config::MarkSet;
use notedeck_core::markdown::{self, FileKind};
use notedeck_core::{
    Filter, MarkingStore, MarkingTag, PageSize, StudyMark, TableViewController, VocabMark, groups,
    paginate, table,
};
use notedeck_types::{FileContent, Group};
use tokio::task::JoinSet;

use crate::render;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub group: Group,
    pub file_count: usize,
}

/// Options of a one-shot table render
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub search: Option<String>,
    pub filter: Option<String>,
    pub page: usize,
    pub per_page: Option<usize>,
    pub raw: bool,
}

pub async fn resolve_group(client: &ApiClient, slug: &str) -> anyhow::Result<Group> {
    let groups = client.groups().await.context("Failed to fetch groups")?;
    groups::find_by_slug(&groups, slug)
        .cloned()
        .with_context(|| format!("Group '{slug}' not found"))
}

/// Groups matching `search`, each with its file count. A group whose tree
/// cannot be fetched is listed with zero files.
pub async fn list_groups(
    client: &ApiClient,
    search: Option<&str>,
) -> anyhow::Result<Vec<GroupSummary>> {
    let all = client.groups().await.context("Failed to fetch groups")?;
    let matching: Vec<Group> = groups::search_groups(&all, search.unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();

    let mut tasks = JoinSet::new();
    for (position, group) in matching.into_iter().enumerate() {
        let client = client.clone();
        tasks.spawn(async move {
            let file_count = match client.group_structure(&group.name).await {
                Ok(structure) => groups::count_files(&structure),
                Err(e) => {
                    tracing::error!("Failed to fetch count for {}: {}", group.name, e);
                    0
                }
            };
            (position, GroupSummary { group, file_count })
        });
    }

    let mut summaries = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        summaries.push(joined.context("Group count task panicked")?);
    }
    summaries.sort_by_key(|(position, _)| *position);

    Ok(summaries.into_iter().map(|(_, summary)| summary).collect())
}

pub async fn show_tree(state: &AppState, slug: &str) -> anyhow::Result<()> {
    let group = resolve_group(&state.client, slug).await?;
    let structure = state
        .client
        .group_structure(&group.name)
        .await
        .context("Failed to fetch group structure")?;

    println!("{}", render::render_tree(&structure));
    Ok(())
}

pub async fn fetch_file(
    state: &AppState,
    slug: &str,
    path: &str,
) -> anyhow::Result<(Group, FileContent)> {
    let group = resolve_group(&state.client, slug).await?;
    let file = state
        .client
        .file(&group.name, path)
        .await
        .with_context(|| format!("Failed to fetch {path}"))?;
    Ok((group, file))
}

pub async fn show_file(
    state: &AppState,
    slug: &str,
    path: &str,
    options: ShowOptions,
) -> anyhow::Result<()> {
    let (group, file) = fetch_file(state, slug, path).await?;

    if options.raw {
        println!("{}", file.content);
        return Ok(());
    }

    match FileKind::of(&file.name) {
        FileKind::Csv => match state.config.table.mark_set {
            MarkSet::Study => show_table::<StudyMark>(state, &group, &file, options).await,
            MarkSet::Vocab => show_table::<VocabMark>(state, &group, &file, options).await,
        },
        FileKind::Audio => {
            println!("{}: {}", file.name, state.client.asset_url(&file.name));
            Ok(())
        }
        FileKind::Markdown => {
            let processed = markdown::preprocess(&file.content);
            println!("{processed}");

            let assets = markdown::local_assets(&processed);
            if !assets.is_empty() {
                println!();
                for asset in assets {
                    let kind = if asset.is_audio { "audio" } else { "image" };
                    println!(
                        "[{kind}] {}: {}",
                        asset.alt,
                        state.client.asset_url(&asset.filename)
                    );
                }
            }
            Ok(())
        }
    }
}

/// Controller over a CSV file, or `None` when it has no records.
///
/// Markings are keyed by the file name the server reports, so they match the
/// ones recorded by the web client for the same file.
pub fn table_controller<M: MarkingTag, S: MarkingStore<M>>(
    group: &Group,
    file: &FileContent,
    store: Arc<S>,
    page_size: PageSize,
) -> Option<TableViewController<M, S>> {
    let table = table::parse(&file.content);
    if table.is_empty() {
        return None;
    }

    Some(
        TableViewController::new(table, group.name.clone(), file.name.clone(), store)
            .with_page_size(page_size),
    )
}

/// Build a controller for a CSV file and load its markings
pub async fn open_controller<M: MarkingTag>(
    state: &AppState,
    group: &Group,
    file: &FileContent,
) -> Option<TableViewController<M, HttpMarkingStore<M>>> {
    let page_size = PageSize::try_from(state.config.table.items_per_page).unwrap_or_default();
    let store = Arc::new(HttpMarkingStore::new(state.client.clone()));

    let Some(mut controller) = table_controller(group, file, store, page_size) else {
        println!("No data to display");
        return None;
    };

    controller.load_markings().await;
    Some(controller)
}

async fn show_table<M: MarkingTag>(
    state: &AppState,
    group: &Group,
    file: &FileContent,
    options: ShowOptions,
) -> anyhow::Result<()> {
    let Some(mut controller) = open_controller::<M>(state, group, file).await else {
        return Ok(());
    };

    if let Some(per_page) = options.per_page {
        controller.on_items_per_page_change(PageSize::try_from(per_page)?);
    }
    if let Some(filter) = options.filter.as_deref() {
        controller.on_filter_change(Filter::parse(filter)?);
    }
    if let Some(search) = options.search {
        controller.on_search_change(search);
    }

    let last = paginate::last_valid_page(controller.total_pages());
    if options.page == 0 || options.page > last {
        anyhow::bail!("Page must be between 1 and {last}");
    }
    controller.on_page_change(options.page);

    let view = controller.view();
    println!(
        "{}",
        render::render_table(&view, &controller.state().search_query)
    );
    Ok(())
}
