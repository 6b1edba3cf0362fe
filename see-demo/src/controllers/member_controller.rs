use axum::extract::{Query as Params, RawQuery, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use see_core::HttpError;
use see_data::{EntityProvider, PageRequest, PagedList, Query, Repository};

use crate::models::Member;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_index: Option<u64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct IdParam {
    pub id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Collect `ids` from `ids=1&ids=2` and `ids=1,2` forms (mixed is fine).
fn parse_ids(raw: Option<&str>) -> Result<Vec<i64>, HttpError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let mut ids = Vec::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        if key != "ids" {
            continue;
        }
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id: i64 = part
                .parse()
                .map_err(|_| HttpError::BadRequest(format!("invalid id '{part}'")))?;
            ids.push(id);
        }
    }
    Ok(ids)
}

async fn all_members<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
) -> Result<Json<Vec<Member>>, HttpError> {
    Ok(Json(state.members.get_all(None).await?))
}

/// Same result as `all_members`, read from the table view directly.
async fn all_members_from_table<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
) -> Result<Json<Vec<Member>>, HttpError> {
    Ok(Json(state.members.table().to_list().await?))
}

async fn members<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
    Params(params): Params<PageParams>,
) -> Result<Json<PagedList<Member>>, HttpError> {
    let page = PageRequest::new(
        params.page_index.unwrap_or(0),
        params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    );
    let ordered = Query::new().order_by("id", true);
    Ok(Json(state.members.get_all_paged(Some(ordered), page).await?))
}

async fn view<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
    Params(params): Params<IdParam>,
) -> Result<Json<Member>, HttpError> {
    state
        .members
        .get_by_id(params.id)
        .await?
        .map(Json)
        .ok_or_else(|| HttpError::NotFound("member not found".into()))
}

async fn list<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Member>>, HttpError> {
    let ids = parse_ids(raw.as_deref())?;
    Ok(Json(state.members.get_by_ids(Some(ids.as_slice())).await?))
}

async fn insert<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
) -> Result<Json<Member>, HttpError> {
    let member = state.members.insert(Member::new("Success Go")).await?;
    tracing::info!(id = member.id, "member inserted");
    Ok(Json(member))
}

async fn batch_insert<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
) -> Result<Json<Vec<Member>>, HttpError> {
    let batch = vec![Member::new("Success Go 1"), Member::new("Success Go 2")];
    Ok(Json(state.members.insert_many(batch).await?))
}

async fn update<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
    Params(params): Params<UpdateParams>,
) -> Result<Json<Member>, HttpError> {
    let name = params
        .name
        .ok_or_else(|| HttpError::BadRequest("name is required".into()))?;
    let mut member = state
        .members
        .get_by_id(params.id)
        .await?
        .ok_or_else(|| HttpError::NotFound("member not found".into()))?;
    member.name = name;
    state.members.update(&member).await?;
    Ok(Json(member))
}

async fn delete_one<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
    Params(params): Params<IdParam>,
) -> Result<Json<JsonValue>, HttpError> {
    let member = state
        .members
        .get_by_id(params.id)
        .await?
        .ok_or_else(|| HttpError::NotFound("member not found".into()))?;
    let deleted = state.members.delete(&member).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

async fn delete_multi<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<JsonValue>, HttpError> {
    let ids = parse_ids(raw.as_deref())?;
    let members = state.members.get_by_ids(Some(ids.as_slice())).await?;
    if members.is_empty() {
        return Err(HttpError::NotFound("no members found".into()));
    }
    let deleted = state.members.delete_many(&members).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

async fn delete_all<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
) -> Result<Json<JsonValue>, HttpError> {
    let deleted = state.members.delete_where(Query::all()).await?;
    tracing::info!(deleted, "all members deleted");
    Ok(Json(json!({ "deleted": deleted })))
}

pub fn routes<P: EntityProvider<Member>>() -> Router<AppState<P>> {
    Router::new()
        .route("/member/allmembers", get(all_members::<P>))
        .route("/member/allmembers2", get(all_members_from_table::<P>))
        .route("/member/members", get(members::<P>))
        .route("/member/view", get(view::<P>))
        .route("/member/list", get(list::<P>))
        .route("/member/insert", post(insert::<P>))
        .route("/member/batchinsert", post(batch_insert::<P>))
        .route("/member/update", post(update::<P>))
        .route("/member/deleteone", post(delete_one::<P>))
        .route("/member/deletemulti", post(delete_multi::<P>))
        .route("/member/deleteall", post(delete_all::<P>))
}
