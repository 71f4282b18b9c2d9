use chrono::Utc;
use sea_orm::{TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CreateTransactionCmd, EngineError, ResultEngine, Transaction, TransactionKind, transactions,
};

use super::common::item_sum_minor;
use super::super::{Engine, with_tx};

impl Engine {
    /// Creates a transaction from its item drafts, optionally as a credit
    /// sale.
    ///
    /// The amount is the sum of the items. For a credit sale the
    /// counterparty debt is resolved (existing id, document match, or a
    /// fresh record) and credited before the transaction is persisted with
    /// its link; everything happens in one DB transaction, so a failure at
    /// any step leaves no trace.
    pub async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultEngine<Transaction> {
        let user_id = cmd.user_id.as_str();
        if cmd.items.is_empty() {
            return Err(EngineError::InvalidAmount(
                "a transaction must have at least one item".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let items = self.validated_items(&db_tx, user_id, &cmd.items, now).await?;
            let amount_minor = item_sum_minor(&items);

            let credit = match cmd.credit.as_ref() {
                Some(sale) => Some(
                    self.attach_credit(&db_tx, user_id, sale, amount_minor, now)
                        .await?,
                ),
                None => None,
            };

            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                kind: cmd.kind.unwrap_or(TransactionKind::Income),
                description: cmd.description.clone(),
                occurred_at: cmd.occurred_at.unwrap_or(now),
                amount_minor,
                customer_debt_id: credit.as_ref().map(|c| c.debt_id),
                debt_amount_minor: credit.as_ref().map(|c| c.debt_amount_minor),
                created_at: now,
                items,
            };

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            for item in &tx.items {
                item.to_active_model(tx.id).insert(&db_tx).await?;
            }

            Ok(tx)
        })
    }
}
