//! Customer debt records ("fiado" ledger).
//!
//! A `CustomerDebt` is the aggregate balance one customer owes one user.
//! The struct owns the balance invariants:
//!
//! - `remaining_minor = total_minor - paid_minor`, both >= 0
//! - `paid_minor <= total_minor`
//! - `status` is derived, never stored independently of the amounts
//!
//! Every mutation goes through a method that re-derives the remaining amount
//! and status, so a debt read back from the store is always consistent.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Pending,
    Partial,
    Paid,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    /// Derives the status from the paid/total pair.
    ///
    /// An empty debt (`total == 0`) counts as paid, even with `paid == 0`.
    pub fn derive(paid_minor: i64, total_minor: i64) -> Self {
        if total_minor == 0 {
            return Self::Paid;
        }
        if paid_minor == 0 {
            return Self::Pending;
        }
        if paid_minor >= total_minor {
            return Self::Paid;
        }
        Self::Partial
    }
}

impl TryFrom<&str> for DebtStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid debt status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDebt {
    pub id: Uuid,
    pub user_id: String,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub total_minor: i64,
    pub paid_minor: i64,
    pub remaining_minor: i64,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
}

impl CustomerDebt {
    /// Creates a debt record with a derived remaining amount and status.
    ///
    /// The caller validates the customer fields; amounts must already satisfy
    /// `total_minor >= 0` and `0 <= paid_minor <= total_minor`.
    pub fn new(
        user_id: String,
        document_number: String,
        first_name: String,
        last_name: String,
        phone: String,
        total_minor: i64,
        paid_minor: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut debt = Self {
            id: Uuid::new_v4(),
            user_id,
            document_number,
            first_name,
            last_name,
            phone,
            total_minor,
            paid_minor,
            remaining_minor: 0,
            status: DebtStatus::Pending,
            created_at,
        };
        debt.rederive();
        debt
    }

    /// Extends the debt by a new unpaid credit.
    ///
    /// Increases `total_minor` (and therefore `remaining_minor`) without
    /// touching `paid_minor`.
    pub fn add_credit(&mut self, amount_minor: i64) {
        self.total_minor += amount_minor;
        self.rederive();
    }

    /// Subtracts a previously added credit, e.g. when the linked transaction
    /// shrinks or is deleted.
    ///
    /// The total never goes below zero, and `paid_minor` is clamped to the
    /// new total: reducing a debt can use up prior payments, it never leaves
    /// a negative balance.
    pub fn reverse_credit(&mut self, amount_minor: i64) {
        self.total_minor = (self.total_minor - amount_minor).max(0);
        self.rederive();
    }

    /// Registers a payment against the outstanding balance.
    ///
    /// Payments are capped at the total: paying more than is owed stores
    /// `paid == total` rather than erroring.
    pub fn apply_payment(&mut self, amount_minor: i64) -> ResultEngine<()> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "payment amount must be > 0".to_string(),
            ));
        }
        self.paid_minor = (self.paid_minor + amount_minor).min(self.total_minor);
        self.rederive();
        Ok(())
    }

    /// Replaces the total, clamping `paid_minor` like [`reverse_credit`].
    ///
    /// [`reverse_credit`]: CustomerDebt::reverse_credit
    pub fn set_total(&mut self, total_minor: i64) -> ResultEngine<()> {
        if total_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "total amount must be > 0".to_string(),
            ));
        }
        self.total_minor = total_minor;
        self.rederive();
        Ok(())
    }

    /// Replaces the paid amount. Unlike the clamp paths, an explicit edit
    /// beyond the total is rejected.
    pub fn set_paid(&mut self, paid_minor: i64) -> ResultEngine<()> {
        if paid_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "paid amount must not be negative".to_string(),
            ));
        }
        if paid_minor > self.total_minor {
            return Err(EngineError::InvalidAmount(
                "paid amount must not exceed the total amount".to_string(),
            ));
        }
        self.paid_minor = paid_minor;
        self.rederive();
        Ok(())
    }

    fn rederive(&mut self) {
        self.paid_minor = self.paid_minor.min(self.total_minor);
        self.remaining_minor = self.total_minor - self.paid_minor;
        self.status = DebtStatus::derive(self.paid_minor, self.total_minor);
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customer_debts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub total_minor: i64,
    pub paid_minor: i64,
    pub remaining_minor: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CustomerDebt> for ActiveModel {
    fn from(debt: &CustomerDebt) -> Self {
        Self {
            id: ActiveValue::Set(debt.id.to_string()),
            user_id: ActiveValue::Set(debt.user_id.clone()),
            document_number: ActiveValue::Set(debt.document_number.clone()),
            first_name: ActiveValue::Set(debt.first_name.clone()),
            last_name: ActiveValue::Set(debt.last_name.clone()),
            phone: ActiveValue::Set(debt.phone.clone()),
            total_minor: ActiveValue::Set(debt.total_minor),
            paid_minor: ActiveValue::Set(debt.paid_minor),
            remaining_minor: ActiveValue::Set(debt.remaining_minor),
            status: ActiveValue::Set(debt.status.as_str().to_string()),
            created_at: ActiveValue::Set(debt.created_at),
        }
    }
}

impl TryFrom<Model> for CustomerDebt {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "customer debt")?,
            user_id: model.user_id,
            document_number: model.document_number,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            total_minor: model.total_minor,
            paid_minor: model.paid_minor,
            remaining_minor: model.remaining_minor,
            status: DebtStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}
