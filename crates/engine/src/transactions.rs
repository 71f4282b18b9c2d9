//! Transaction primitives.
//!
//! A `Transaction` is an income or expense event whose amount is always the
//! sum of its category-tagged items. A transaction may additionally be a
//! credit sale, in which case it carries a link to the customer debt it
//! contributed to and the portion of its amount that was deferred.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, transaction_items::TransactionItem, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    /// Parses a kind, ignoring case and surrounding whitespace.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidKind(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub amount_minor: i64,
    pub customer_debt_id: Option<Uuid>,
    pub debt_amount_minor: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<TransactionItem>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub description: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub amount_minor: i64,
    pub customer_debt_id: Option<String>,
    pub debt_amount_minor: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction_items::Entity")]
    TransactionItems,
    #[sea_orm(
        belongs_to = "super::customer_debts::Entity",
        from = "Column::CustomerDebtId",
        to = "super::customer_debts::Column::Id"
    )]
    CustomerDebts,
}

impl Related<super::transaction_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionItems.def()
    }
}

impl Related<super::customer_debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerDebts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            description: ActiveValue::Set(tx.description.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            customer_debt_id: ActiveValue::Set(tx.customer_debt_id.map(|id| id.to_string())),
            debt_amount_minor: ActiveValue::Set(tx.debt_amount_minor),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let customer_debt_id = model
            .customer_debt_id
            .as_deref()
            .map(|id| parse_uuid(id, "customer debt"))
            .transpose()?;
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            description: model.description,
            occurred_at: model.occurred_at,
            amount_minor: model.amount_minor,
            customer_debt_id,
            debt_amount_minor: model.debt_amount_minor,
            created_at: model.created_at,
            items: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(
            TransactionKind::try_from("INCOME").unwrap(),
            TransactionKind::Income
        );
        assert_eq!(
            TransactionKind::try_from(" Expense ").unwrap(),
            TransactionKind::Expense
        );
        assert_eq!(
            TransactionKind::try_from("income").unwrap(),
            TransactionKind::Income
        );
    }

    #[test]
    fn kind_rejects_unknown_strings() {
        assert!(TransactionKind::try_from("transfer").is_err());
        assert!(TransactionKind::try_from("").is_err());
    }
}
