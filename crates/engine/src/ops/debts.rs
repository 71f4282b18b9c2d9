use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    CustomerDebt, EngineError, NewDebtCmd, ResultEngine, UpdateDebtCmd, customer_debts,
    transactions,
    util::{normalize_required, validate_document_number, validate_phone},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a debt record directly (manual ledger entry).
    ///
    /// The document number is the per-owner dedup key; creating a second
    /// debt with the same document is rejected.
    pub async fn new_debt(&self, cmd: NewDebtCmd) -> ResultEngine<CustomerDebt> {
        let user_id = cmd.user_id.as_str();
        let first_name = normalize_required(&cmd.first_name, "first name")?;
        let last_name = normalize_required(&cmd.last_name, "last name")?;
        let phone = validate_phone(&cmd.phone)?;
        let document_number = validate_document_number(&cmd.document_number)?;

        if cmd.total_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "total amount must be > 0".to_string(),
            ));
        }
        let paid_minor = cmd.paid_minor.unwrap_or(0);
        if paid_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "paid amount must not be negative".to_string(),
            ));
        }
        if paid_minor > cmd.total_minor {
            return Err(EngineError::InvalidAmount(
                "paid amount must not exceed the total amount".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if self
                .find_debt_by_document(&db_tx, user_id, &document_number)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(document_number));
            }

            let debt = CustomerDebt::new(
                user_id.to_string(),
                document_number,
                first_name,
                last_name,
                phone,
                cmd.total_minor,
                paid_minor,
                Utc::now(),
            );
            customer_debts::ActiveModel::from(&debt).insert(&db_tx).await?;
            Ok(debt)
        })
    }

    /// Returns one debt of a user.
    pub async fn debt(&self, user_id: &str, debt_id: Uuid) -> ResultEngine<CustomerDebt> {
        with_tx!(self, |db_tx| {
            let model = self.require_debt_owned(&db_tx, user_id, debt_id).await?;
            CustomerDebt::try_from(model)
        })
    }

    /// Lists a user's debts, newest first.
    pub async fn debts(&self, user_id: &str) -> ResultEngine<Vec<CustomerDebt>> {
        with_tx!(self, |db_tx| {
            let models = customer_debts::Entity::find()
                .filter(customer_debts::Column::UserId.eq(user_id))
                .order_by_desc(customer_debts::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(CustomerDebt::try_from).collect()
        })
    }

    /// Applies a partial edit to a debt record.
    ///
    /// A document change re-checks per-owner uniqueness against the user's
    /// other debts. Amount changes re-derive the remaining amount and
    /// status; a shrunken total clamps the paid amount, while an explicit
    /// paid amount beyond the total is rejected.
    pub async fn update_debt(&self, cmd: UpdateDebtCmd) -> ResultEngine<CustomerDebt> {
        let user_id = cmd.user_id.as_str();
        with_tx!(self, |db_tx| {
            let model = self.require_debt_owned(&db_tx, user_id, cmd.debt_id).await?;
            let mut debt = CustomerDebt::try_from(model)?;

            if let Some(first_name) = cmd.first_name.as_deref() {
                debt.first_name = normalize_required(first_name, "first name")?;
            }
            if let Some(last_name) = cmd.last_name.as_deref() {
                debt.last_name = normalize_required(last_name, "last name")?;
            }
            if let Some(phone) = cmd.phone.as_deref() {
                debt.phone = validate_phone(phone)?;
            }
            if let Some(document_number) = cmd.document_number.as_deref() {
                let document_number = validate_document_number(document_number)?;
                let existing = self
                    .find_debt_by_document(&db_tx, user_id, &document_number)
                    .await?;
                if existing.is_some_and(|other| other.id != debt.id.to_string()) {
                    return Err(EngineError::ExistingKey(document_number));
                }
                debt.document_number = document_number;
            }
            if let Some(total_minor) = cmd.total_minor {
                debt.set_total(total_minor)?;
            }
            if let Some(paid_minor) = cmd.paid_minor {
                debt.set_paid(paid_minor)?;
            }

            self.save_debt(&db_tx, &debt).await?;
            Ok(debt)
        })
    }

    /// Registers a payment against a debt. Payments beyond the outstanding
    /// total are absorbed, leaving the debt fully paid.
    pub async fn register_payment(
        &self,
        user_id: &str,
        debt_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<CustomerDebt> {
        with_tx!(self, |db_tx| {
            let model = self.require_debt_owned(&db_tx, user_id, debt_id).await?;
            let mut debt = CustomerDebt::try_from(model)?;
            debt.apply_payment(amount_minor)?;
            self.save_debt(&db_tx, &debt).await?;
            Ok(debt)
        })
    }

    /// Deletes a debt record.
    ///
    /// Transactions that referenced the debt survive with their link
    /// cleared; deletion is never cascaded in either direction.
    pub async fn delete_debt(&self, user_id: &str, debt_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_debt_owned(&db_tx, user_id, debt_id).await?;

            transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::CustomerDebtId,
                    Expr::value(Option::<String>::None),
                )
                .col_expr(
                    transactions::Column::DebtAmountMinor,
                    Expr::value(Option::<i64>::None),
                )
                .filter(transactions::Column::CustomerDebtId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;

            customer_debts::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// The reconciler's idempotency lookup: `(user, document) -> debt`.
    pub(super) async fn find_debt_by_document(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        document_number: &str,
    ) -> ResultEngine<Option<customer_debts::Model>> {
        customer_debts::Entity::find()
            .filter(customer_debts::Column::UserId.eq(user_id))
            .filter(customer_debts::Column::DocumentNumber.eq(document_number))
            .one(db_tx)
            .await
            .map_err(Into::into)
    }

    /// Persists every field of a debt record.
    pub(super) async fn save_debt(
        &self,
        db_tx: &DatabaseTransaction,
        debt: &CustomerDebt,
    ) -> ResultEngine<()> {
        customer_debts::ActiveModel::from(debt).update(db_tx).await?;
        Ok(())
    }
}
