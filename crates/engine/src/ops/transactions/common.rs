use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    CreditSale, CustomerDebt, EngineError, ItemDraft, ItemPatch, ResultEngine, Transaction,
    TransactionItem, customer_debts, transaction_items,
    util::{normalize_required, validate_document_number, validate_phone},
};

use super::super::Engine;

/// Outcome of resolving a credit sale against the debt ledger.
pub(super) struct CreditResolution {
    pub(super) debt_id: Uuid,
    pub(super) debt_amount_minor: i64,
}

impl Engine {
    /// Resolves the counterparty debt for a credit sale and applies the
    /// credited amount to it.
    ///
    /// The deferred amount defaults to the full transaction amount when the
    /// caller gives none (or a non-positive one), and may never exceed it.
    /// The counterparty is an existing debt when an id is supplied;
    /// otherwise full customer details are required and the customer is
    /// matched by document number, with a fresh debt created on a miss.
    pub(super) async fn attach_credit(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        sale: &CreditSale,
        amount_minor: i64,
        now: DateTime<Utc>,
    ) -> ResultEngine<CreditResolution> {
        let debt_amount_minor = sale
            .debt_amount_minor
            .filter(|amount| *amount > 0)
            .unwrap_or(amount_minor);
        if debt_amount_minor > amount_minor {
            return Err(EngineError::InvalidAmount(
                "credit amount must not exceed the transaction amount".to_string(),
            ));
        }

        if let Some(debt_id) = sale.debt_id {
            let model = self.require_debt_owned(db_tx, user_id, debt_id).await?;
            return self.credit_existing(db_tx, model, debt_amount_minor).await;
        }

        let Some(customer) = sale.customer.as_ref() else {
            return Err(EngineError::InvalidCustomer(
                "a credit sale needs an existing debt id or full customer details \
                 (first name, last name, phone, document number)"
                    .to_string(),
            ));
        };
        let first_name = normalize_required(&customer.first_name, "first name")?;
        let last_name = normalize_required(&customer.last_name, "last name")?;
        let phone = validate_phone(&customer.phone)?;
        let document_number = validate_document_number(&customer.document_number)?;

        if let Some(model) = self
            .find_debt_by_document(db_tx, user_id, &document_number)
            .await?
        {
            return self.credit_existing(db_tx, model, debt_amount_minor).await;
        }

        let debt = CustomerDebt::new(
            user_id.to_string(),
            document_number,
            first_name,
            last_name,
            phone,
            debt_amount_minor,
            0,
            now,
        );
        customer_debts::ActiveModel::from(&debt).insert(db_tx).await?;
        Ok(CreditResolution {
            debt_id: debt.id,
            debt_amount_minor,
        })
    }

    async fn credit_existing(
        &self,
        db_tx: &DatabaseTransaction,
        model: customer_debts::Model,
        debt_amount_minor: i64,
    ) -> ResultEngine<CreditResolution> {
        let mut debt = CustomerDebt::try_from(model)?;
        debt.add_credit(debt_amount_minor);
        self.save_debt(db_tx, &debt).await?;
        Ok(CreditResolution {
            debt_id: debt.id,
            debt_amount_minor,
        })
    }

    /// Reverses a transaction's contribution from its linked debt.
    pub(super) async fn detach_credit(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        debt_id: Uuid,
        debt_amount_minor: i64,
    ) -> ResultEngine<()> {
        let model = self.require_debt_owned(db_tx, user_id, debt_id).await?;
        let mut debt = CustomerDebt::try_from(model)?;
        debt.reverse_credit(debt_amount_minor);
        self.save_debt(db_tx, &debt).await
    }

    /// Validates item drafts (positive amounts, owner-scoped categories) and
    /// builds the item set without touching the store yet.
    pub(super) async fn validated_items(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        drafts: &[ItemDraft],
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<TransactionItem>> {
        let mut items = Vec::with_capacity(drafts.len());
        for draft in drafts {
            require_positive_item_amount(draft.amount_minor)?;
            self.require_category_owned(db_tx, user_id, draft.category_id)
                .await?;
            items.push(TransactionItem {
                id: Uuid::new_v4(),
                category_id: draft.category_id,
                amount_minor: draft.amount_minor,
                created_at: now,
            });
        }
        Ok(items)
    }

    /// Applies a batch of item edits to a transaction: removals first, then
    /// replacements and appends. The batch must leave at least one item;
    /// dropping them all is only possible by deleting the transaction.
    pub(super) async fn apply_item_edits(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        tx: &mut Transaction,
        patches: &[ItemPatch],
        remove_item_ids: &[Uuid],
    ) -> ResultEngine<()> {
        for item_id in remove_item_ids {
            let position = tx
                .items
                .iter()
                .position(|item| item.id == *item_id)
                .ok_or_else(|| {
                    EngineError::KeyNotFound("transaction item not exists".to_string())
                })?;
            transaction_items::Entity::delete_by_id(item_id.to_string())
                .exec(db_tx)
                .await?;
            tx.items.remove(position);
        }

        for patch in patches {
            require_positive_item_amount(patch.amount_minor)?;
            self.require_category_owned(db_tx, user_id, patch.category_id)
                .await?;

            match patch.id {
                Some(item_id) => {
                    let item = tx
                        .items
                        .iter_mut()
                        .find(|item| item.id == item_id)
                        .ok_or_else(|| {
                            EngineError::KeyNotFound("transaction item not exists".to_string())
                        })?;
                    item.category_id = patch.category_id;
                    item.amount_minor = patch.amount_minor;
                    let item_active = transaction_items::ActiveModel {
                        id: ActiveValue::Set(item_id.to_string()),
                        category_id: ActiveValue::Set(patch.category_id.to_string()),
                        amount_minor: ActiveValue::Set(patch.amount_minor),
                        ..Default::default()
                    };
                    item_active.update(db_tx).await?;
                }
                None => {
                    let item = TransactionItem {
                        id: Uuid::new_v4(),
                        category_id: patch.category_id,
                        amount_minor: patch.amount_minor,
                        created_at: Utc::now(),
                    };
                    item.to_active_model(tx.id).insert(db_tx).await?;
                    tx.items.push(item);
                }
            }
        }

        if tx.items.is_empty() {
            return Err(EngineError::InvalidAmount(
                "a transaction must keep at least one item; delete the transaction instead"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Loads a transaction's items, oldest first.
    pub(super) async fn load_items(
        &self,
        db_tx: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> ResultEngine<Vec<TransactionItem>> {
        let models = transaction_items::Entity::find()
            .filter(transaction_items::Column::TransactionId.eq(transaction_id.to_string()))
            .order_by_asc(transaction_items::Column::CreatedAt)
            .all(db_tx)
            .await?;
        models.into_iter().map(TransactionItem::try_from).collect()
    }
}

fn require_positive_item_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "all items must have an amount greater than zero".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn item_sum_minor(items: &[TransactionItem]) -> i64 {
    items.iter().map(|item| item.amount_minor).sum()
}
