//! Command structs for engine operations.
//!
//! These types group parameters for write operations (transaction
//! create/update, debt create/update), keeping call sites readable and
//! avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::TransactionKind;

/// One item line of a new transaction, or a line appended on update.
#[derive(Clone, Debug)]
pub struct ItemDraft {
    pub category_id: Uuid,
    pub amount_minor: i64,
}

impl ItemDraft {
    #[must_use]
    pub fn new(category_id: Uuid, amount_minor: i64) -> Self {
        Self {
            category_id,
            amount_minor,
        }
    }
}

/// One item edit on update: with `id` it replaces that item's category and
/// amount, without `id` it appends a new line.
#[derive(Clone, Debug)]
pub struct ItemPatch {
    pub id: Option<Uuid>,
    pub category_id: Uuid,
    pub amount_minor: i64,
}

impl ItemPatch {
    #[must_use]
    pub fn append(category_id: Uuid, amount_minor: i64) -> Self {
        Self {
            id: None,
            category_id,
            amount_minor,
        }
    }

    #[must_use]
    pub fn replace(id: Uuid, category_id: Uuid, amount_minor: i64) -> Self {
        Self {
            id: Some(id),
            category_id,
            amount_minor,
        }
    }
}

/// Identifying fields for a credit-sale customer that may not exist yet.
#[derive(Clone, Debug)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub document_number: String,
}

impl CustomerDraft {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        document_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            document_number: document_number.into(),
        }
    }
}

/// How a transaction's value is deferred as customer debt.
///
/// The counterparty is either an existing debt (`debt_id`) or a customer
/// resolved by document number, created on the fly when unknown. A missing
/// `debt_amount_minor` defers the full transaction amount.
#[derive(Clone, Debug, Default)]
pub struct CreditSale {
    pub debt_id: Option<Uuid>,
    pub debt_amount_minor: Option<i64>,
    pub customer: Option<CustomerDraft>,
}

impl CreditSale {
    #[must_use]
    pub fn to_existing(debt_id: Uuid) -> Self {
        Self {
            debt_id: Some(debt_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to_customer(customer: CustomerDraft) -> Self {
        Self {
            customer: Some(customer),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn debt_amount_minor(mut self, amount_minor: i64) -> Self {
        self.debt_amount_minor = Some(amount_minor);
        self
    }
}

/// The credit field of a transaction update.
///
/// An update request may leave the credit link alone, drop it, or replace
/// it; a bare bool cannot express "leave as is", so the three states are
/// explicit.
#[derive(Clone, Debug, Default)]
pub enum CreditDirective {
    /// Keep the current link (if any) untouched, apart from the automatic
    /// `min(debt_amount, amount)` recomputation when items change.
    #[default]
    Unchanged,
    /// Drop the link, reversing the transaction's ledger contribution.
    Cash,
    /// Replace the link: reverse the old contribution (if any), then attach
    /// per the sale details.
    Credit(CreditSale),
}

/// Create a transaction from item drafts, optionally as a credit sale.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: String,
    pub description: Option<String>,
    pub kind: Option<TransactionKind>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub items: Vec<ItemDraft>,
    pub credit: Option<CreditSale>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, items: Vec<ItemDraft>) -> Self {
        Self {
            user_id: user_id.into(),
            description: None,
            kind: None,
            occurred_at: None,
            items,
            credit: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn credit(mut self, credit: CreditSale) -> Self {
        self.credit = Some(credit);
        self
    }
}

/// Update an existing transaction.
///
/// Every field is a patch: `None` leaves the stored value alone. Item edits
/// (`items` / `remove_item_ids`) recompute the cached amount; the `credit`
/// directive controls the debt link.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,
    pub description: Option<String>,
    pub kind: Option<TransactionKind>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub items: Option<Vec<ItemPatch>>,
    pub remove_item_ids: Vec<Uuid>,
    pub credit: CreditDirective,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
            description: None,
            kind: None,
            occurred_at: None,
            items: None,
            remove_item_ids: Vec::new(),
            credit: CreditDirective::Unchanged,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn items(mut self, items: Vec<ItemPatch>) -> Self {
        self.items = Some(items);
        self
    }

    #[must_use]
    pub fn remove_item_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.remove_item_ids = ids;
        self
    }

    #[must_use]
    pub fn credit(mut self, credit: CreditDirective) -> Self {
        self.credit = credit;
        self
    }
}

/// Create a debt record directly (manual ledger entry).
#[derive(Clone, Debug)]
pub struct NewDebtCmd {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub document_number: String,
    pub total_minor: i64,
    pub paid_minor: Option<i64>,
}

impl NewDebtCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, customer: CustomerDraft, total_minor: i64) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone: customer.phone,
            document_number: customer.document_number,
            total_minor,
            paid_minor: None,
        }
    }

    #[must_use]
    pub fn paid_minor(mut self, paid_minor: i64) -> Self {
        self.paid_minor = Some(paid_minor);
        self
    }
}

/// Update a debt record; every field is a patch.
#[derive(Clone, Debug)]
pub struct UpdateDebtCmd {
    pub user_id: String,
    pub debt_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub document_number: Option<String>,
    pub total_minor: Option<i64>,
    pub paid_minor: Option<i64>,
}

impl UpdateDebtCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, debt_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            debt_id,
            first_name: None,
            last_name: None,
            phone: None,
            document_number: None,
            total_minor: None,
            paid_minor: None,
        }
    }

    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn document_number(mut self, document_number: impl Into<String>) -> Self {
        self.document_number = Some(document_number.into());
        self
    }

    #[must_use]
    pub fn total_minor(mut self, total_minor: i64) -> Self {
        self.total_minor = Some(total_minor);
        self
    }

    #[must_use]
    pub fn paid_minor(mut self, paid_minor: i64) -> Self {
        self.paid_minor = Some(paid_minor);
        self
    }
}
