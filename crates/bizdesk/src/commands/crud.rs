//! List/get/create/update/delete for any entity, driven through a
//! `PageContainer` the same way a dashboard screen would be.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tabled::Tabled;

use bizdesk_core::{Dashboard, EntityId, PageContainer, Resource};

use crate::cli::{EntityCommand, GlobalOpts, ListArgs, OutputFormat, PayloadArgs};
use crate::error::CliError;
use crate::output;

use super::{on_failure, require_session, util};

/// How an entity is shown on the terminal.
pub trait TableView: Resource {
    type Row: Tabled;

    /// Dashboard route the guard checks before any request.
    const ROUTE: &'static str;
    /// Subcommand that lists this entity.
    const COMMAND: &'static str;

    fn row(&self) -> Self::Row;

    fn detail(&self) -> String;
}

pub async fn handle<R>(
    dash: &Dashboard,
    command: EntityCommand,
    scope: Option<EntityId>,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: TableView,
    R::Create: DeserializeOwned,
    R::Update: DeserializeOwned,
{
    require_session(dash, R::ROUTE, global).await?;

    match command {
        EntityCommand::List(args) => list::<R>(dash, args, scope, global).await,
        EntityCommand::Get { id } => get::<R>(dash, &id, global).await,
        EntityCommand::Create(payload) => create::<R>(dash, &payload, scope, global).await,
        EntityCommand::Update { id, payload } => {
            update::<R>(dash, &id, &payload, scope, global).await
        }
        EntityCommand::Delete { id } => delete::<R>(dash, &id, scope, global).await,
    }
}

/// Page container positioned on the client scope, if any.
async fn open_page<R: TableView>(
    dash: &Dashboard,
    limit: Option<u32>,
    scope: Option<EntityId>,
) -> Result<PageContainer<R>, CliError> {
    let mut page = match limit {
        Some(limit) => PageContainer::with_limit(Arc::clone(R::slice(dash.store())), limit),
        None => dash.page::<R>(),
    };
    if let Some(scope) = scope {
        page.select_client(scope)
            .await
            .map_err(|e| on_failure(dash, R::ROUTE, e))?;
    }
    Ok(page)
}

async fn list<R: TableView>(
    dash: &Dashboard,
    args: ListArgs,
    scope: Option<EntityId>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = output::spinner(&format!("Loading {}…", R::COMMAND), global.quiet);
    let scoped = scope.is_some();
    let opened = open_page::<R>(dash, args.limit, scope).await;
    let mut page = match opened {
        Ok(page) => page,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };
    if let Some(term) = args.search {
        page.set_search(term);
    }
    let fetched = if scoped {
        Ok(())
    } else {
        page.set_page(args.page).await.map(|_| ())
    };
    spinner.finish_and_clear();
    fetched.map_err(|e| on_failure(dash, R::ROUTE, e))?;

    let rows = page.visible_rows();
    let out = output::render_list(global.output, &rows, R::row, |r| r.id().to_string())?;
    output::print_output(&out, global.quiet);

    if global.output == OutputFormat::Table && !global.quiet {
        if let Some(footer) = output::page_footer(&page.state(), rows.len(), global.color) {
            eprintln!("{footer}");
        }
    }
    page.unmount();
    Ok(())
}

async fn get<R: TableView>(dash: &Dashboard, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let id = EntityId::from(id);
    let spinner = output::spinner(&format!("Loading {} {id}…", R::LABEL), global.quiet);
    let fetched = R::slice(dash.store()).fetch_one(&id).await;
    spinner.finish_and_clear();
    let record = fetched.map_err(|e| on_failure(dash, R::ROUTE, e))?;

    let out = output::render_single(global.output, &record, R::detail, |r| r.id().to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn create<R>(
    dash: &Dashboard,
    payload: &PayloadArgs,
    scope: Option<EntityId>,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: TableView,
    R::Create: DeserializeOwned,
{
    let mut body = util::read_payload(payload)?;
    if let (Some(param), Some(scope)) = (R::SCOPE_PARAM, &scope) {
        util::default_field(&mut body, param, scope.to_string());
    }
    let data: R::Create = serde_json::from_value(body)?;

    let mut page = open_page::<R>(dash, None, scope).await?;
    page.open_create();
    let record = page
        .submit_create(&data)
        .await
        .map_err(|e| on_failure(dash, R::ROUTE, e))?;

    let out = output::render_single(global.output, &record, R::detail, |r| r.id().to_string())?;
    output::print_output(&out, global.quiet);
    output::success(
        &format!("Created {} {}", R::LABEL, record.id()),
        global.color,
        global.quiet,
    );
    Ok(())
}

async fn update<R>(
    dash: &Dashboard,
    id: &str,
    payload: &PayloadArgs,
    scope: Option<EntityId>,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: TableView,
    R::Update: DeserializeOwned,
{
    let data: R::Update = serde_json::from_value(util::read_payload(payload)?)?;
    let id = EntityId::from(id);

    let mut page = open_page::<R>(dash, None, scope).await?;
    page.open_edit(&id)
        .await
        .map_err(|e| on_failure(dash, R::ROUTE, e))?;
    let record = page
        .submit_update(&data)
        .await
        .map_err(|e| on_failure(dash, R::ROUTE, e))?;

    let out = output::render_single(global.output, &record, R::detail, |r| r.id().to_string())?;
    output::print_output(&out, global.quiet);
    output::success(
        &format!("Updated {} {id}", R::LABEL),
        global.color,
        global.quiet,
    );
    Ok(())
}

async fn delete<R: TableView>(
    dash: &Dashboard,
    id: &str,
    scope: Option<EntityId>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = EntityId::from(id);

    let mut page = open_page::<R>(dash, None, scope).await?;
    page.open_delete(&id)
        .await
        .map_err(|e| on_failure(dash, R::ROUTE, e))?;

    if !util::confirm(
        &format!("Delete {} {id}? This cannot be undone.", R::LABEL),
        global.yes,
    )? {
        page.close_dialog();
        return Ok(());
    }

    page.confirm_delete()
        .await
        .map_err(|e| on_failure(dash, R::ROUTE, e))?;
    output::success(
        &format!("Deleted {} {id}", R::LABEL),
        global.color,
        global.quiet,
    );
    Ok(())
}
