use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, categories, customer_debts, transactions};

use super::Engine;

/// Generates an owner-scoped `require_*_owned` lookup for a target entity.
///
/// A record that exists but belongs to another user yields the same
/// `KeyNotFound` as a record that does not exist at all.
macro_rules! impl_require_owned {
    ($fn_name:ident, $module:ident, $err_msg:literal) => {
        pub(super) async fn $fn_name(
            &self,
            db: &DatabaseTransaction,
            user_id: &str,
            id: Uuid,
        ) -> ResultEngine<$module::Model> {
            $module::Entity::find_by_id(id.to_string())
                .filter($module::Column::UserId.eq(user_id))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_owned!(require_category_owned, categories, "category not exists");

    impl_require_owned!(require_debt_owned, customer_debts, "customer debt not exists");

    impl_require_owned!(
        require_transaction_owned,
        transactions,
        "transaction not exists"
    );
}
