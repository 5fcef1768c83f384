//! Human-readable codes such as `AUC-202501-00001`, numbered per tenant, entity and prefix.

// region:    --- Imports
use crate::error::{AppError, AppResult};
use crate::ids::TenantId;
use crate::repository::AuctionRepository;
use chrono::{NaiveDate, Utc};
use self::mask::{RenderedMask, DEFAULT_MASK};
use self::model::EntityType;
use tracing::info;

// endregion: --- Imports

pub mod mask;
pub mod model;

/// Next code for `entity` in `tenant`, dated today (UTC).
pub async fn generate_next_code(
    repo: &dyn AuctionRepository,
    entity: EntityType,
    tenant: TenantId,
) -> AppResult<String> {
    generate_next_code_on(repo, entity, tenant, Utc::now().date_naive()).await
}

pub async fn generate_next_code_on(
    repo: &dyn AuctionRepository,
    entity: EntityType,
    tenant: TenantId,
    date: NaiveDate,
) -> AppResult<String> {
    let settings = repo.platform_settings(tenant).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "platform settings not configured for tenant {}",
            tenant
        ))
    })?;
    let mask = settings.mask_for(entity).unwrap_or(DEFAULT_MASK);

    let rendered = RenderedMask::render(mask, entity.code_prefix(), date)
        .map_err(|e| AppError::Validation(format!("invalid mask: {e}")))?;

    let sequence = repo.next_sequence(tenant, entity, &rendered.prefix).await?;
    let code = rendered.format(sequence);

    info!(
        "{:<12} --> {} code {} for tenant {}",
        "BusinessCode", entity, code, tenant
    );
    Ok(code)
}
