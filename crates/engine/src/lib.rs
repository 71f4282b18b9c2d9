//! Bookkeeping core: category store, customer-debt ledger, and the
//! transaction reconciler that keeps the two consistent.
//!
//! The engine exposes plain operations over an injected database
//! connection; authentication and HTTP live in the server crate.

pub use categories::Category;
pub use commands::{
    CreateTransactionCmd, CreditDirective, CreditSale, CustomerDraft, ItemDraft, ItemPatch,
    NewDebtCmd, UpdateDebtCmd, UpdateTransactionCmd,
};
pub use customer_debts::{CustomerDebt, DebtStatus};
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};
pub use transaction_items::TransactionItem;
pub use transactions::{Transaction, TransactionKind};

mod categories;
mod commands;
mod customer_debts;
mod error;
mod ops;
mod transaction_items;
mod transactions;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
