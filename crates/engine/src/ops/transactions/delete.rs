use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, transaction_items, transactions, util::parse_uuid};

use super::super::{Engine, with_tx};

impl Engine {
    /// Deletes a transaction and its items.
    ///
    /// A credit-linked transaction first reverses its contribution from the
    /// debt ledger; unlinked transactions delete with no ledger side effect.
    /// The debt record itself always survives.
    pub async fn delete_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let tx_model = self
                .require_transaction_owned(&db_tx, user_id, transaction_id)
                .await?;

            if let (Some(debt_id), Some(debt_amount_minor)) = (
                tx_model.customer_debt_id.as_deref(),
                tx_model.debt_amount_minor,
            ) {
                let debt_id = parse_uuid(debt_id, "customer debt")?;
                self.detach_credit(&db_tx, user_id, debt_id, debt_amount_minor)
                    .await?;
            }

            transaction_items::Entity::delete_many()
                .filter(transaction_items::Column::TransactionId.eq(transaction_id.to_string()))
                .exec(&db_tx)
                .await?;
            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
