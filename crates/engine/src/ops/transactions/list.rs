use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, Transaction, transactions};

use super::super::{Engine, with_tx};

impl Engine {
    /// Returns one transaction of a user, items included.
    pub async fn transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction_owned(&db_tx, user_id, transaction_id)
                .await?;
            let mut tx = Transaction::try_from(model)?;
            tx.items = self.load_items(&db_tx, tx.id).await?;
            Ok(tx)
        })
    }

    /// Lists a user's transactions, newest first, items included.
    pub async fn transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .order_by_desc(transactions::Column::OccurredAt)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                let mut tx = Transaction::try_from(model)?;
                tx.items = self.load_items(&db_tx, tx.id).await?;
                out.push(tx);
            }
            Ok(out)
        })
    }
}
