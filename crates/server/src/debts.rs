//! Customer debt ("fiado") API endpoints

use api_types::debt::{DebtNew, DebtStatus as ApiStatus, DebtUpdate, DebtView, PaymentNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, utc_offset};
use engine::{NewDebtCmd, UpdateDebtCmd, users};

fn map_status(status: engine::DebtStatus) -> ApiStatus {
    match status {
        engine::DebtStatus::Pending => ApiStatus::Pending,
        engine::DebtStatus::Partial => ApiStatus::Partial,
        engine::DebtStatus::Paid => ApiStatus::Paid,
    }
}

fn debt_view(debt: engine::CustomerDebt) -> Result<DebtView, ServerError> {
    let utc = utc_offset()?;
    Ok(DebtView {
        id: debt.id,
        document_number: debt.document_number,
        first_name: debt.first_name,
        last_name: debt.last_name,
        phone: debt.phone,
        total_minor: debt.total_minor,
        paid_minor: debt.paid_minor,
        remaining_minor: debt.remaining_minor,
        status: map_status(debt.status),
        created_at: debt.created_at.with_timezone(&utc),
    })
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DebtNew>,
) -> Result<(StatusCode, Json<DebtView>), ServerError> {
    let mut cmd = NewDebtCmd {
        user_id: user.username.clone(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        document_number: payload.document_number,
        total_minor: payload.total_minor,
        paid_minor: None,
    };
    if let Some(paid_minor) = payload.paid_minor {
        cmd = cmd.paid_minor(paid_minor);
    }

    let debt = state.engine.new_debt(cmd).await?;
    Ok((StatusCode::CREATED, Json(debt_view(debt)?)))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DebtView>, ServerError> {
    let debt = state.engine.debt(&user.username, id).await?;
    Ok(Json(debt_view(debt)?))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DebtView>>, ServerError> {
    let debts = state.engine.debts(&user.username).await?;
    debts
        .into_iter()
        .map(debt_view)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DebtUpdate>,
) -> Result<Json<DebtView>, ServerError> {
    let cmd = UpdateDebtCmd {
        user_id: user.username.clone(),
        debt_id: id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        document_number: payload.document_number,
        total_minor: payload.total_minor,
        paid_minor: payload.paid_minor,
    };

    let debt = state.engine.update_debt(cmd).await?;
    Ok(Json(debt_view(debt)?))
}

pub async fn register_payment(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentNew>,
) -> Result<Json<DebtView>, ServerError> {
    let debt = state
        .engine
        .register_payment(&user.username, id, payload.amount_minor)
        .await?;
    Ok(Json(debt_view(debt)?))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_debt(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
