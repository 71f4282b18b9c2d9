//! Transaction API endpoints

use api_types::transaction::{
    CounterpartyView, CreditNew, CreditUpdate, ItemView, TransactionNew, TransactionUpdate,
    TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, utc_offset};
use engine::{
    CreateTransactionCmd, CreditDirective, CreditSale, CustomerDraft, ItemDraft, ItemPatch,
    TransactionKind, UpdateTransactionCmd, users,
};

fn parse_kind(kind: Option<&str>) -> Result<Option<TransactionKind>, ServerError> {
    kind.map(TransactionKind::try_from)
        .transpose()
        .map_err(Into::into)
}

fn map_credit_sale(credit: CreditNew) -> CreditSale {
    let customer = match (
        credit.customer_first_name,
        credit.customer_last_name,
        credit.customer_phone,
        credit.customer_document_number,
    ) {
        (None, None, None, None) => None,
        (first_name, last_name, phone, document_number) => Some(CustomerDraft::new(
            first_name.unwrap_or_default(),
            last_name.unwrap_or_default(),
            phone.unwrap_or_default(),
            document_number.unwrap_or_default(),
        )),
    };

    CreditSale {
        debt_id: credit.debt_id,
        debt_amount_minor: credit.debt_amount_minor,
        customer,
    }
}

fn map_credit_directive(credit: Option<CreditUpdate>) -> CreditDirective {
    match credit {
        None => CreditDirective::Unchanged,
        Some(credit) if !credit.enabled => CreditDirective::Cash,
        Some(credit) => CreditDirective::Credit(map_credit_sale(CreditNew {
            debt_id: credit.debt_id,
            debt_amount_minor: credit.debt_amount_minor,
            customer_first_name: credit.customer_first_name,
            customer_last_name: credit.customer_last_name,
            customer_phone: credit.customer_phone,
            customer_document_number: credit.customer_document_number,
        })),
    }
}

async fn transaction_view(
    state: &ServerState,
    user_id: &str,
    tx: engine::Transaction,
) -> Result<TransactionView, ServerError> {
    let utc = utc_offset()?;

    let counterparty = match tx.customer_debt_id {
        Some(debt_id) => {
            let debt = state.engine.debt(user_id, debt_id).await?;
            Some(CounterpartyView {
                debt_id: debt.id,
                first_name: debt.first_name,
                last_name: debt.last_name,
                phone: debt.phone,
                document_number: debt.document_number,
            })
        }
        None => None,
    };

    let items = tx
        .items
        .into_iter()
        .map(|item| ItemView {
            id: item.id,
            category_id: item.category_id,
            amount_minor: item.amount_minor,
            created_at: item.created_at.with_timezone(&utc),
        })
        .collect();

    Ok(TransactionView {
        id: tx.id,
        kind: tx.kind.as_str().to_string(),
        description: tx.description,
        occurred_at: tx.occurred_at.with_timezone(&utc),
        amount_minor: tx.amount_minor,
        debt_amount_minor: tx.debt_amount_minor,
        counterparty,
        created_at: tx.created_at.with_timezone(&utc),
        items,
    })
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let kind = parse_kind(payload.kind.as_deref())?;
    let items = payload
        .items
        .into_iter()
        .map(|item| ItemDraft::new(item.category_id, item.amount_minor))
        .collect();

    let mut cmd = CreateTransactionCmd::new(user.username.clone(), items);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(kind) = kind {
        cmd = cmd.kind(kind);
    }
    if let Some(occurred_at) = payload.occurred_at {
        cmd = cmd.occurred_at(occurred_at.with_timezone(&Utc));
    }
    if let Some(credit) = payload.credit {
        cmd = cmd.credit(map_credit_sale(credit));
    }

    let tx = state.engine.create_transaction(cmd).await?;
    let view = transaction_view(&state, &user.username, tx).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(&user.username, id).await?;
    let view = transaction_view(&state, &user.username, tx).await?;
    Ok(Json(view))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state.engine.transactions(&user.username).await?;

    let mut views = Vec::with_capacity(txs.len());
    for tx in txs {
        views.push(transaction_view(&state, &user.username, tx).await?);
    }
    Ok(Json(views))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let kind = parse_kind(payload.kind.as_deref())?;

    let mut cmd = UpdateTransactionCmd::new(user.username.clone(), id)
        .credit(map_credit_directive(payload.credit));
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(kind) = kind {
        cmd = cmd.kind(kind);
    }
    if let Some(occurred_at) = payload.occurred_at {
        cmd = cmd.occurred_at(occurred_at.with_timezone(&Utc));
    }
    if let Some(items) = payload.items {
        cmd = cmd.items(
            items
                .into_iter()
                .map(|item| ItemPatch {
                    id: item.id,
                    category_id: item.category_id,
                    amount_minor: item.amount_minor,
                })
                .collect(),
        );
    }
    if let Some(remove_item_ids) = payload.remove_item_ids {
        cmd = cmd.remove_item_ids(remove_item_ids);
    }

    let tx = state.engine.update_transaction(cmd).await?;
    let view = transaction_view(&state, &user.username, tx).await?;
    Ok(Json(view))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
