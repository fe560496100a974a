//! Items endpoints
//!
//! One resource, `/itens`, dispatched on method:
//! GET lists, POST creates, PUT updates, DELETE removes (hard or soft).
//! Bodies go through [`JsonObject`] so bad JSON ends up as a field error;
//! query strings go through [`QueryParams`], first value per key.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::extractors::{JsonObject, QueryParams};
use crate::http::server::AppState;
use crate::models::{
    is_on_token, normalize_search, IdList, Item, ItemPatch, ListMeta, NewItem, Paginated,
    Pagination, PaginationParams,
};

/// Item as returned to clients
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id_item: u64,
    pub nome_item: String,
    /// 0 or 1, matching the column
    pub ativo: u8,
    pub criado_em: String,
    pub atualizado_em: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id_item: item.id_item.get(),
            nome_item: item.nome_item,
            ativo: u8::from(item.ativo),
            criado_em: item.criado_em.to_rfc3339(),
            atualizado_em: item.atualizado_em.to_rfc3339(),
        }
    }
}

/// DELETE response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub count: u64,
    pub soft: bool,
}

/// GET /itens - one page plus whole-table metadata
async fn list_items(
    State(state): State<Arc<AppState>>,
    query: QueryParams,
) -> Result<Json<Paginated<ItemResponse>>, ApiError> {
    let page = Pagination::from(&PaginationParams {
        limit: query.get("limit").map(str::to_owned),
        offset: query.get("offset").map(str::to_owned),
    });
    let search = query.get("q").and_then(normalize_search);

    let (items, meta) = tokio::try_join!(
        state.store.list(search.as_deref(), page),
        state.store.meta()
    )?;

    Ok(Json(Paginated {
        items: items.into_iter().map(ItemResponse::from).collect(),
        meta: ListMeta {
            total: meta.total,
            limit: page.limit(),
            offset: page.offset(),
            last_updated: meta.last_updated.map(|t| t.to_rfc3339()),
        },
    }))
}

/// POST /itens - create an item
async fn create_item(
    State(state): State<Arc<AppState>>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let item = NewItem::from_body(&body)?;
    let id = state.store.create(&item).await?;

    tracing::info!(id_item = id.get(), nome_item = item.nome_item.as_str(), "item created");
    Ok((StatusCode::CREATED, Json(json!({ "id_item": id }))))
}

/// PUT /itens - partial update by `id_item`
async fn update_item(
    State(state): State<Arc<AppState>>,
    JsonObject(body): JsonObject,
) -> Result<Json<Value>, ApiError> {
    let patch = ItemPatch::from_body(&body)?;
    let affected = state.store.update(&patch).await?;

    if affected == 0 {
        tracing::debug!(id_item = patch.id_item.get(), "update matched no row");
    }
    Ok(Json(json!({ "updated": affected > 0 })))
}

/// DELETE /itens?id=1,2,3&soft=1
async fn delete_items(
    State(state): State<Arc<AppState>>,
    query: QueryParams,
) -> Result<Json<DeleteResponse>, ApiError> {
    let ids = IdList::parse(query.get("id").unwrap_or_default())?;
    let soft = query.get("soft").is_some_and(is_on_token);

    let count = if soft {
        state.store.soft_delete(&ids).await?
    } else {
        state.store.hard_delete(&ids).await?
    };

    tracing::info!(requested = ids.len(), count, soft, "items deleted");
    Ok(Json(DeleteResponse {
        deleted: count > 0,
        count,
        soft,
    }))
}

/// OPTIONS /itens - preflight, headers come from the router layers
async fn preflight() -> Json<Value> {
    Json(json!({}))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/itens",
        get(list_items)
            .post(create_item)
            .put(update_item)
            .delete(delete_items)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::models::ItemId;

    #[test]
    fn item_response_uses_numeric_flag_and_rfc3339() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let response = ItemResponse::from(Item {
            id_item: ItemId::new(3),
            nome_item: "Feijão".into(),
            ativo: false,
            criado_em: at,
            atualizado_em: at,
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id_item"], 3);
        assert_eq!(value["ativo"], 0);
        assert_eq!(value["criado_em"], "2024-03-01T12:00:00+00:00");
    }
}
