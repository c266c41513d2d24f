use axum::{extract::State, response::IntoResponse, Json};
use chrono::Local;
use crate::state::AppState;
use crate::api::dtos::{
    requests::{parse_date, parse_time, BlockInput, BlockSlotRequest, DeleteBlocksRequest, SaveBlocksRequest},
    responses::BlocksSavedResponse,
};
use crate::api::extractors::shop::ShopId;
use crate::domain::models::block::{BlockDraft, BlockRange};
use crate::domain::services::blocks::single_slot_range;
use crate::sync::{publish, ChangeKind};
use std::sync::Arc;
use crate::error::AppError;
use tracing::info;

fn to_draft(input: BlockInput) -> Result<BlockDraft, AppError> {
    Ok(BlockDraft {
        id: input.id,
        barber: input.barber,
        range: BlockRange {
            date_start: parse_date(&input.date_start, "date_start")?,
            time_start: parse_time(&input.time_start, "time_start")?,
            date_end: parse_date(&input.date_end, "date_end")?,
            time_end: parse_time(&input.time_end, "time_end")?,
        },
        reason: input.reason,
    })
}

pub async fn list_blocks(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
) -> Result<impl IntoResponse, AppError> {
    let blocks = state.block_repo.list_by_shop(&shop_id).await?;
    Ok(Json(blocks))
}

pub async fn save_blocks(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Json(payload): Json<SaveBlocksRequest>,
) -> Result<impl IntoResponse, AppError> {
    let drafts = payload.blocks.into_iter().map(to_draft).collect::<Result<Vec<_>, _>>()?;
    let today = Local::now().date_naive();

    let inserted = state.block_service.save(&shop_id, &drafts, &payload.deleted_ids, today).await?;
    publish(&state, &shop_id, ChangeKind::Blocks);

    Ok(Json(BlocksSavedResponse { inserted: inserted.len(), blocks: inserted }))
}

pub async fn block_slot(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Json(payload): Json<BlockSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let shop = state.shop_repo.find_by_id(&shop_id).await?
        .ok_or(AppError::NotFound("Shop not found".into()))?;

    let date = parse_date(&payload.date, "date")?;
    let time = parse_time(&payload.time, "time")?;
    let minutes = shop
        .slot_interval_minutes
        .filter(|m| *m > 0)
        .unwrap_or(state.config.default_block_minutes);

    let today = Local::now().date_naive();
    let inserted = state.block_service
        .block_slot(&shop_id, &payload.barber_id, single_slot_range(date, time, minutes), payload.reason, today)
        .await?;

    info!("Blocked {} {} for barber {} ({} min)", date, time, payload.barber_id, minutes);
    publish(&state, &shop_id, ChangeKind::Blocks);

    Ok(Json(BlocksSavedResponse { inserted: inserted.len(), blocks: inserted }))
}

pub async fn delete_blocks(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Json(payload): Json<DeleteBlocksRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.block_service.delete(&shop_id, &payload.ids).await?;
    info!("Deleted {} blocks for shop {}", payload.ids.len(), shop_id);
    publish(&state, &shop_id, ChangeKind::Blocks);

    Ok(Json(serde_json::json!({"status": "deleted"})))
}
