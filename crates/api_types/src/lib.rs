//! Request/response types shared between the server and its clients.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub created_at: DateTime<FixedOffset>,
    }
}

pub mod debt {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DebtStatus {
        /// Nothing paid yet.
        Pending,
        /// Partially paid.
        Partial,
        /// Fully paid (an empty debt counts as paid).
        Paid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtNew {
        pub first_name: String,
        pub last_name: String,
        pub phone: String,
        /// Digits only, at most 50 characters; unique per user.
        pub document_number: String,
        pub total_minor: i64,
        /// Defaults to 0.
        pub paid_minor: Option<i64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DebtUpdate {
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub phone: Option<String>,
        pub document_number: Option<String>,
        pub total_minor: Option<i64>,
        pub paid_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtView {
        pub id: Uuid,
        pub document_number: String,
        pub first_name: String,
        pub last_name: String,
        pub phone: String,
        pub total_minor: i64,
        pub paid_minor: i64,
        pub remaining_minor: i64,
        pub status: DebtStatus,
        pub created_at: DateTime<FixedOffset>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub category_id: Uuid,
        pub amount_minor: i64,
    }

    /// An item edit: with `id` it replaces that item, without it appends.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemEdit {
        pub id: Option<Uuid>,
        pub category_id: Uuid,
        pub amount_minor: i64,
    }

    /// Credit-sale block of a create request.
    ///
    /// Either `debt_id` names an existing debt, or the four `customer_*`
    /// fields identify the counterparty (matched by document number,
    /// created when unknown).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CreditNew {
        pub debt_id: Option<Uuid>,
        /// Deferred portion; defaults to the full transaction amount.
        pub debt_amount_minor: Option<i64>,
        pub customer_first_name: Option<String>,
        pub customer_last_name: Option<String>,
        pub customer_phone: Option<String>,
        pub customer_document_number: Option<String>,
    }

    /// Credit field of an update request.
    ///
    /// Omitting the whole object leaves the link unchanged; `enabled:
    /// false` drops it (reversing the ledger contribution); `enabled: true`
    /// relinks per the remaining fields.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditUpdate {
        pub enabled: bool,
        pub debt_id: Option<Uuid>,
        pub debt_amount_minor: Option<i64>,
        pub customer_first_name: Option<String>,
        pub customer_last_name: Option<String>,
        pub customer_phone: Option<String>,
        pub customer_document_number: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub description: Option<String>,
        /// "income" or "expense" (case-insensitive); defaults to income.
        pub kind: Option<String>,
        /// RFC3339 timestamp; defaults to now.
        pub occurred_at: Option<DateTime<FixedOffset>>,
        pub items: Vec<ItemNew>,
        pub credit: Option<CreditNew>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub description: Option<String>,
        pub kind: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
        pub items: Option<Vec<ItemEdit>>,
        pub remove_item_ids: Option<Vec<Uuid>>,
        pub credit: Option<CreditUpdate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: Uuid,
        pub category_id: Uuid,
        pub amount_minor: i64,
        pub created_at: DateTime<FixedOffset>,
    }

    /// Display fields of the linked debt's customer.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CounterpartyView {
        pub debt_id: Uuid,
        pub first_name: String,
        pub last_name: String,
        pub phone: String,
        pub document_number: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: String,
        pub description: Option<String>,
        pub occurred_at: DateTime<FixedOffset>,
        pub amount_minor: i64,
        /// Present iff the transaction is a credit sale.
        pub debt_amount_minor: Option<i64>,
        pub counterparty: Option<CounterpartyView>,
        pub created_at: DateTime<FixedOffset>,
        pub items: Vec<ItemView>,
    }
}
