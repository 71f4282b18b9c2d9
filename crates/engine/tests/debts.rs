use sea_orm::{ConnectionTrait, Database, Statement};

use engine::{CustomerDraft, DebtStatus, Engine, EngineError, NewDebtCmd, UpdateDebtCmd};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bruno"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    Engine::builder().database(db).build().await.unwrap()
}

fn ana() -> CustomerDraft {
    CustomerDraft::new("Ana", "Lopez", "555-0100", "12345")
}

#[tokio::test]
async fn new_debt_derives_remaining_and_status() {
    let engine = engine_with_db().await;

    let debt = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();
    assert_eq!(debt.total_minor, 100);
    assert_eq!(debt.paid_minor, 0);
    assert_eq!(debt.remaining_minor, 100);
    assert_eq!(debt.status, DebtStatus::Pending);

    let partial = engine
        .new_debt(NewDebtCmd::new(
            "alice",
            CustomerDraft::new("Luis", "Gomez", "555-0101", "67890"),
            200,
        )
        .paid_minor(50))
        .await
        .unwrap();
    assert_eq!(partial.remaining_minor, 150);
    assert_eq!(partial.status, DebtStatus::Partial);
}

#[tokio::test]
async fn new_debt_validates_fields() {
    let engine = engine_with_db().await;

    let blank_name = NewDebtCmd::new("alice", CustomerDraft::new(" ", "Lopez", "555", "1"), 100);
    assert!(matches!(
        engine.new_debt(blank_name).await,
        Err(EngineError::InvalidCustomer(_))
    ));

    let bad_document =
        NewDebtCmd::new("alice", CustomerDraft::new("Ana", "Lopez", "555", "12-45"), 100);
    assert!(matches!(
        engine.new_debt(bad_document).await,
        Err(EngineError::InvalidCustomer(_))
    ));

    assert!(matches!(
        engine.new_debt(NewDebtCmd::new("alice", ana(), 0)).await,
        Err(EngineError::InvalidAmount(_))
    ));

    let overpaid = NewDebtCmd::new("alice", ana(), 100).paid_minor(150);
    assert!(matches!(
        engine.new_debt(overpaid).await,
        Err(EngineError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn duplicate_document_is_rejected_per_owner() {
    let engine = engine_with_db().await;

    engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();
    assert!(matches!(
        engine.new_debt(NewDebtCmd::new("alice", ana(), 50)).await,
        Err(EngineError::ExistingKey(_))
    ));

    // Same document under another owner is fine.
    engine
        .new_debt(NewDebtCmd::new("bruno", ana(), 50))
        .await
        .unwrap();
}

#[tokio::test]
async fn payments_progress_pending_partial_paid() {
    let engine = engine_with_db().await;
    let debt = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();
    assert_eq!(debt.status, DebtStatus::Pending);

    let debt = engine.register_payment("alice", debt.id, 60).await.unwrap();
    assert_eq!(debt.paid_minor, 60);
    assert_eq!(debt.remaining_minor, 40);
    assert_eq!(debt.status, DebtStatus::Partial);

    let debt = engine.register_payment("alice", debt.id, 50).await.unwrap();
    assert_eq!(debt.paid_minor, 100);
    assert_eq!(debt.remaining_minor, 0);
    assert_eq!(debt.status, DebtStatus::Paid);
}

#[tokio::test]
async fn overpayment_is_absorbed() {
    let engine = engine_with_db().await;
    let debt = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();

    let debt = engine
        .register_payment("alice", debt.id, 500)
        .await
        .unwrap();
    assert_eq!(debt.paid_minor, 100);
    assert_eq!(debt.remaining_minor, 0);
    assert_eq!(debt.status, DebtStatus::Paid);
}

#[tokio::test]
async fn payment_must_be_positive() {
    let engine = engine_with_db().await;
    let debt = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();

    assert!(matches!(
        engine.register_payment("alice", debt.id, 0).await,
        Err(EngineError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn update_total_reclamps_paid() {
    let engine = engine_with_db().await;
    let debt = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100).paid_minor(90))
        .await
        .unwrap();

    let debt = engine
        .update_debt(UpdateDebtCmd::new("alice", debt.id).total_minor(50))
        .await
        .unwrap();
    assert_eq!(debt.total_minor, 50);
    assert_eq!(debt.paid_minor, 50);
    assert_eq!(debt.remaining_minor, 0);
    assert_eq!(debt.status, DebtStatus::Paid);
}

#[tokio::test]
async fn update_paid_beyond_total_is_rejected() {
    let engine = engine_with_db().await;
    let debt = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();

    assert!(matches!(
        engine
            .update_debt(UpdateDebtCmd::new("alice", debt.id).paid_minor(150))
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    // The failed edit left nothing behind.
    let debt = engine.debt("alice", debt.id).await.unwrap();
    assert_eq!(debt.paid_minor, 0);
    assert_eq!(debt.status, DebtStatus::Pending);
}

#[tokio::test]
async fn update_document_checks_uniqueness_against_other_debts() {
    let engine = engine_with_db().await;
    let first = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();
    let second = engine
        .new_debt(NewDebtCmd::new(
            "alice",
            CustomerDraft::new("Luis", "Gomez", "555-0101", "67890"),
            50,
        ))
        .await
        .unwrap();

    assert!(matches!(
        engine
            .update_debt(UpdateDebtCmd::new("alice", second.id).document_number("12345"))
            .await,
        Err(EngineError::ExistingKey(_))
    ));

    // Re-submitting a debt's own document is not a conflict.
    let kept = engine
        .update_debt(UpdateDebtCmd::new("alice", first.id).document_number("12345"))
        .await
        .unwrap();
    assert_eq!(kept.document_number, "12345");
}

#[tokio::test]
async fn cross_owner_access_reads_as_not_found() {
    let engine = engine_with_db().await;
    let debt = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();

    assert!(matches!(
        engine.debt("bruno", debt.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.register_payment("bruno", debt.id, 10).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_debt("bruno", debt.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn deleted_debt_is_gone() {
    let engine = engine_with_db().await;
    let debt = engine
        .new_debt(NewDebtCmd::new("alice", ana(), 100))
        .await
        .unwrap();

    engine.delete_debt("alice", debt.id).await.unwrap();
    assert!(matches!(
        engine.debt("alice", debt.id).await,
        Err(EngineError::KeyNotFound(_))
    ));

    let missing = Uuid::new_v4();
    assert!(matches!(
        engine.delete_debt("alice", missing).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
