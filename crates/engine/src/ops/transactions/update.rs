use chrono::Utc;
use sea_orm::{TransactionTrait, prelude::*};

use crate::{
    CreditDirective, CustomerDebt, ResultEngine, Transaction, UpdateTransactionCmd, transactions,
};

use super::common::item_sum_minor;
use super::super::{Engine, with_tx};

impl Engine {
    /// Updates a transaction, keeping any linked debt consistent.
    ///
    /// Three axes can change independently and are applied in a fixed order
    /// so the ledger is adjusted exactly once, against the transaction's
    /// final state:
    ///
    /// 1. item edits recompute the cached amount;
    /// 2. an explicit credit directive first reverses the previous link (if
    ///    any), then for [`CreditDirective::Credit`] resolves and attaches
    ///    the new counterparty using the updated amount as the default
    ///    basis;
    /// 3. with [`CreditDirective::Unchanged`], a linked transaction whose
    ///    amount changed keeps its debt but contributes at most the new
    ///    amount: `min(old debt amount, new amount)`, reversing and
    ///    re-adding only when the contribution actually changes.
    ///
    /// The whole update runs in one DB transaction; no intermediate ledger
    /// state is ever persisted.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        let user_id = cmd.user_id.as_str();
        with_tx!(self, |db_tx| {
            let tx_model = self
                .require_transaction_owned(&db_tx, user_id, cmd.transaction_id)
                .await?;
            let mut tx = Transaction::try_from(tx_model)?;
            tx.items = self.load_items(&db_tx, tx.id).await?;

            let previous_link = tx.customer_debt_id.zip(tx.debt_amount_minor);

            if let Some(description) = cmd.description.clone() {
                tx.description = Some(description);
            }
            if let Some(kind) = cmd.kind {
                tx.kind = kind;
            }
            if let Some(occurred_at) = cmd.occurred_at {
                tx.occurred_at = occurred_at;
            }

            let items_changed = cmd.items.is_some() || !cmd.remove_item_ids.is_empty();
            if items_changed {
                self.apply_item_edits(
                    &db_tx,
                    user_id,
                    &mut tx,
                    cmd.items.as_deref().unwrap_or(&[]),
                    &cmd.remove_item_ids,
                )
                .await?;
                tx.amount_minor = item_sum_minor(&tx.items);
            }

            match &cmd.credit {
                CreditDirective::Unchanged => {
                    if items_changed && let Some((debt_id, old_debt_amount)) = previous_link {
                        let new_debt_amount = old_debt_amount.min(tx.amount_minor);
                        if new_debt_amount != old_debt_amount {
                            let model =
                                self.require_debt_owned(&db_tx, user_id, debt_id).await?;
                            let mut debt = CustomerDebt::try_from(model)?;
                            debt.reverse_credit(old_debt_amount);
                            debt.add_credit(new_debt_amount);
                            self.save_debt(&db_tx, &debt).await?;
                            tx.debt_amount_minor = Some(new_debt_amount);
                        }
                    }
                }
                CreditDirective::Cash | CreditDirective::Credit(_) => {
                    if let Some((debt_id, old_debt_amount)) = previous_link {
                        self.detach_credit(&db_tx, user_id, debt_id, old_debt_amount)
                            .await?;
                    }
                    tx.customer_debt_id = None;
                    tx.debt_amount_minor = None;

                    if let CreditDirective::Credit(sale) = &cmd.credit {
                        let resolution = self
                            .attach_credit(&db_tx, user_id, sale, tx.amount_minor, Utc::now())
                            .await?;
                        tx.customer_debt_id = Some(resolution.debt_id);
                        tx.debt_amount_minor = Some(resolution.debt_amount_minor);
                    }
                }
            }

            transactions::ActiveModel::from(&tx).update(&db_tx).await?;
            Ok(tx)
        })
    }
}
