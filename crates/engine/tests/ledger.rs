use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, MoneyCents, NewTransactionCmd, TransactionKind};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    (engine, db, path)
}

fn money(value: &str) -> MoneyCents {
    value.parse().unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

async fn user(engine: &Engine, email: &str) -> i64 {
    engine.new_user("User", email, "hash").await.unwrap().id
}

async fn count_transactions(db: &DatabaseConnection) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS n FROM transactions",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

async fn exec(db: &DatabaseConnection, sql: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, sql))
        .await
        .unwrap();
}

#[tokio::test]
async fn income_on_empty_account_sets_balance() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", MoneyCents::ZERO)
        .await
        .unwrap();
    let salary = engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();

    let receipt = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            account.id,
            salary.id,
            TransactionKind::Income,
            money("2500.00"),
            day(),
            "March salary",
        ))
        .await
        .unwrap();

    assert_eq!(receipt.balance, money("2500.00"));
    assert!(!receipt.replayed);
    assert_eq!(receipt.transaction.amount, money("2500.00"));
    assert_eq!(receipt.transaction.description, "March salary");
    assert_eq!(
        engine.account(account.id, alice).await.unwrap().balance,
        money("2500.00")
    );
    assert_eq!(
        engine
            .transaction(receipt.transaction.id, alice)
            .await
            .unwrap(),
        receipt.transaction
    );
    assert_eq!(count_transactions(&db).await, 1);
}

#[tokio::test]
async fn kind_mismatch_is_rejected_without_side_effects() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", money("100.00"))
        .await
        .unwrap();
    let groceries = engine
        .new_category(alice, "Groceries", TransactionKind::Expense)
        .await
        .unwrap();

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            account.id,
            groceries.id,
            TransactionKind::Income,
            money("10.00"),
            day(),
            "wrong way",
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::TypeMismatch {
            transaction: TransactionKind::Income,
            category: TransactionKind::Expense,
        }
    );
    assert_eq!(
        engine.account(account.id, alice).await.unwrap().balance,
        money("100.00")
    );
    assert_eq!(count_transactions(&db).await, 0);
}

#[tokio::test]
async fn foreign_account_or_category_is_forbidden() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;

    let alice_account = engine
        .new_account(alice, "Checking", "bank", money("50.00"))
        .await
        .unwrap();
    let alice_category = engine
        .new_category(alice, "Rent", TransactionKind::Expense)
        .await
        .unwrap();
    let bob_account = engine
        .new_account(bob, "Wallet", "cash", money("75.00"))
        .await
        .unwrap();
    let bob_category = engine
        .new_category(bob, "Food", TransactionKind::Expense)
        .await
        .unwrap();

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            bob_account.id,
            alice_category.id,
            TransactionKind::Expense,
            money("5.00"),
            day(),
            "not mine",
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("account belongs to another user".to_string())
    );

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            alice_account.id,
            bob_category.id,
            TransactionKind::Expense,
            money("5.00"),
            day(),
            "not mine either",
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("category belongs to another user".to_string())
    );
    assert_eq!(err.kind(), "forbidden");

    assert_eq!(count_transactions(&db).await, 0);
    assert_eq!(
        engine.account(bob_account.id, bob).await.unwrap().balance,
        money("75.00")
    );
    assert_eq!(
        engine.account(alice_account.id, alice).await.unwrap().balance,
        money("50.00")
    );
}

#[tokio::test]
async fn missing_and_foreign_entities_are_told_apart() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;
    let bob_account = engine
        .new_account(bob, "Wallet", "cash", MoneyCents::ZERO)
        .await
        .unwrap();

    assert_eq!(
        engine.account(9_999, alice).await,
        Err(EngineError::NotFound("account".to_string()))
    );
    assert_eq!(
        engine.account(bob_account.id, alice).await,
        Err(EngineError::Forbidden(
            "account belongs to another user".to_string()
        ))
    );
    assert_eq!(
        engine.category(9_999, alice).await,
        Err(EngineError::NotFound("category".to_string()))
    );
    assert_eq!(
        engine.transaction(9_999, alice).await,
        Err(EngineError::NotFound("transaction".to_string()))
    );
}

#[tokio::test]
async fn checks_run_in_a_fixed_order() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", MoneyCents::ZERO)
        .await
        .unwrap();
    let bob_account = engine
        .new_account(bob, "Wallet", "cash", MoneyCents::ZERO)
        .await
        .unwrap();
    let salary = engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();
    let bob_category = engine
        .new_category(bob, "Food", TransactionKind::Expense)
        .await
        .unwrap();

    // Missing account wins over a foreign category.
    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            9_999,
            bob_category.id,
            TransactionKind::Income,
            MoneyCents::ZERO,
            day(),
            "",
        ))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("account".to_string()));

    // Foreign account wins over an invalid amount.
    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            bob_account.id,
            salary.id,
            TransactionKind::Income,
            MoneyCents::ZERO,
            day(),
            "x",
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "forbidden");

    // Kind mismatch wins over an invalid amount and description.
    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            account.id,
            salary.id,
            TransactionKind::Expense,
            MoneyCents::new(-5),
            day(),
            " ",
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "type_mismatch");

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            account.id,
            salary.id,
            TransactionKind::Income,
            MoneyCents::ZERO,
            day(),
            "zero",
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("amount must be > 0".to_string())
    );

    assert_eq!(count_transactions(&db).await, 0);
}

#[tokio::test]
async fn balance_tracks_every_committed_delta() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", money("100.00"))
        .await
        .unwrap();
    let salary = engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();
    let rent = engine
        .new_category(alice, "Rent", TransactionKind::Expense)
        .await
        .unwrap();

    let moves = [
        (TransactionKind::Income, "1200.50", salary.id),
        (TransactionKind::Expense, "800.00", rent.id),
        (TransactionKind::Expense, "600.75", rent.id),
        (TransactionKind::Income, "0.01", salary.id),
    ];
    let mut expected = money("100.00");
    for (kind, amount, category_id) in moves {
        let receipt = engine
            .create_transaction(NewTransactionCmd::new(
                alice,
                account.id,
                category_id,
                kind,
                money(amount),
                day(),
                "move",
            ))
            .await
            .unwrap();
        expected = expected.checked_add(kind.signed(money(amount))).unwrap();
        assert_eq!(receipt.balance, expected);
    }

    // Expenses may take the balance below zero.
    assert_eq!(expected, money("-100.24"));
    assert_eq!(
        engine.account(account.id, alice).await.unwrap().balance,
        expected
    );
}

#[tokio::test]
async fn failed_balance_write_leaves_no_transaction() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", money("10.00"))
        .await
        .unwrap();
    let salary = engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();

    exec(
        &db,
        "CREATE TRIGGER fail_balance BEFORE UPDATE OF balance ON accounts \
         BEGIN SELECT RAISE(ABORT, 'simulated fault'); END;",
    )
    .await;

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            account.id,
            salary.id,
            TransactionKind::Income,
            money("1.00"),
            day(),
            "bonus",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    assert_eq!(err.kind(), "storage_failure");

    exec(&db, "DROP TRIGGER fail_balance").await;
    assert_eq!(count_transactions(&db).await, 0);
    assert_eq!(
        engine.account(account.id, alice).await.unwrap().balance,
        money("10.00")
    );
}

#[tokio::test]
async fn failed_transaction_insert_leaves_balance_untouched() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", money("10.00"))
        .await
        .unwrap();
    let rent = engine
        .new_category(alice, "Rent", TransactionKind::Expense)
        .await
        .unwrap();

    exec(
        &db,
        "CREATE TRIGGER fail_insert BEFORE INSERT ON transactions \
         BEGIN SELECT RAISE(ABORT, 'simulated fault'); END;",
    )
    .await;

    let err = engine
        .create_transaction(
            NewTransactionCmd::new(
                alice,
                account.id,
                rent.id,
                TransactionKind::Expense,
                money("3.00"),
                day(),
                "rent",
            )
            .idempotency_key("rent-march"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "storage_failure");

    exec(&db, "DROP TRIGGER fail_insert").await;
    assert_eq!(count_transactions(&db).await, 0);
    assert_eq!(
        engine.account(account.id, alice).await.unwrap().balance,
        money("10.00")
    );
}

#[tokio::test]
async fn persistent_lock_contention_surfaces_as_conflict() {
    let (_, db) = engine_with_db().await;
    let engine = Engine::builder()
        .database(db.clone())
        .max_commit_attempts(3)
        .retry_backoff(Duration::from_millis(1))
        .build()
        .await
        .unwrap();
    let alice = user(&engine, "alice@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", MoneyCents::ZERO)
        .await
        .unwrap();
    let salary = engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();

    exec(
        &db,
        "CREATE TRIGGER busy_balance BEFORE UPDATE OF balance ON accounts \
         BEGIN SELECT RAISE(ABORT, 'database is locked'); END;",
    )
    .await;

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            account.id,
            salary.id,
            TransactionKind::Income,
            money("1.00"),
            day(),
            "salary",
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Conflict(format!("account {} is busy, retry later", account.id))
    );
    assert_eq!(err.kind(), "conflict");

    exec(&db, "DROP TRIGGER busy_balance").await;
    assert_eq!(count_transactions(&db).await, 0);
}

/// 100 concurrent writes on one account, spread round-robin over `engines`:
/// 50 incomes of 10.00 and 50 expenses of 5.00 on top of 1000.00.
async fn run_concurrent_mix(engines: &[Arc<Engine>], db: &DatabaseConnection) {
    let engine = &engines[0];
    let alice = user(&engine, "alice@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", money("1000.00"))
        .await
        .unwrap();
    let salary = engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();
    let food = engine
        .new_category(alice, "Food", TransactionKind::Expense)
        .await
        .unwrap();

    let mut handles = Vec::with_capacity(100);
    for i in 0..100 {
        let engine = Arc::clone(&engines[i % engines.len()]);
        let cmd = if i % 2 == 0 {
            NewTransactionCmd::new(
                alice,
                account.id,
                salary.id,
                TransactionKind::Income,
                money("10.00"),
                day(),
                format!("income {i}"),
            )
        } else {
            NewTransactionCmd::new(
                alice,
                account.id,
                food.id,
                TransactionKind::Expense,
                money("5.00"),
                day(),
                format!("expense {i}"),
            )
        };
        handles.push(tokio::spawn(
            async move { engine.create_transaction(cmd).await },
        ));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(
        engine.account(account.id, alice).await.unwrap().balance,
        money("1250.00")
    );
    assert_eq!(count_transactions(db).await, 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_on_one_account_lose_nothing() {
    let (engine, db) = engine_with_db().await;
    run_concurrent_mix(&[Arc::new(engine)], &db).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_on_file_database_lose_nothing() {
    let (engine, db, path) = engine_with_file_db().await;
    run_concurrent_mix(&[Arc::new(engine)], &db).await;
    drop(db);
    let _ = std::fs::remove_file(path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn engines_sharing_a_file_database_lose_nothing() {
    // Two engines over one file behave like two processes: their account
    // locks are independent, so only the compare-and-set and the busy
    // retries keep the balance consistent.
    let (first, db, path) = engine_with_file_db().await;
    let url = format!("sqlite:{}?mode=rwc", path.display());
    let second = Engine::builder()
        .database(Database::connect(&url).await.unwrap())
        .build()
        .await
        .unwrap();

    run_concurrent_mix(&[Arc::new(first), Arc::new(second)], &db).await;
    drop(db);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn idempotency_key_replays_the_first_transaction() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", MoneyCents::ZERO)
        .await
        .unwrap();
    let salary = engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();

    let cmd = NewTransactionCmd::new(
        alice,
        account.id,
        salary.id,
        TransactionKind::Income,
        money("40.00"),
        day(),
        "salary",
    )
    .idempotency_key("pay-2024-03");

    let first = engine.create_transaction(cmd.clone()).await.unwrap();
    let second = engine.create_transaction(cmd.clone()).await.unwrap();

    assert!(!first.replayed);
    assert!(second.replayed);
    assert_eq!(first.transaction, second.transaction);
    assert_eq!(second.balance, money("40.00"));
    assert_eq!(count_transactions(&db).await, 1);

    let reused = Err(EngineError::Validation(
        "idempotency key already used for a different transaction".to_string(),
    ));

    let mut other_amount = cmd.clone();
    other_amount.amount = money("41.00");
    assert_eq!(engine.create_transaction(other_amount).await, reused);

    let mut other_date = cmd.clone();
    other_date.date = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
    assert_eq!(engine.create_transaction(other_date).await, reused);

    let mut other_description = cmd.clone();
    other_description.description = "bonus".to_string();
    assert_eq!(engine.create_transaction(other_description).await, reused);

    let mut padded_description = cmd;
    padded_description.description = "  salary ".to_string();
    assert!(
        engine
            .create_transaction(padded_description)
            .await
            .unwrap()
            .replayed
    );

    assert_eq!(count_transactions(&db).await, 1);
    assert_eq!(
        engine.account(account.id, alice).await.unwrap().balance,
        money("40.00")
    );
}

#[tokio::test]
async fn idempotency_keys_are_scoped_per_user() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;

    for owner in [alice, bob] {
        let account = engine
            .new_account(owner, "Checking", "bank", MoneyCents::ZERO)
            .await
            .unwrap();
        let category = engine
            .new_category(owner, "Salary", TransactionKind::Income)
            .await
            .unwrap();
        let receipt = engine
            .create_transaction(
                NewTransactionCmd::new(
                    owner,
                    account.id,
                    category.id,
                    TransactionKind::Income,
                    money("1.00"),
                    day(),
                    "salary",
                )
                .idempotency_key("same-key"),
            )
            .await
            .unwrap();
        assert!(!receipt.replayed);
    }

    assert_eq!(count_transactions(&db).await, 2);
}

#[tokio::test]
async fn transactions_are_listed_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", MoneyCents::ZERO)
        .await
        .unwrap();
    let salary = engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();

    let mut ids = Vec::new();
    for (day_of_month, label) in [(1, "old"), (20, "newest"), (10, "middle"), (20, "newest b")] {
        let receipt = engine
            .create_transaction(NewTransactionCmd::new(
                alice,
                account.id,
                salary.id,
                TransactionKind::Income,
                money("1.00"),
                NaiveDate::from_ymd_opt(2024, 3, day_of_month).unwrap(),
                label,
            ))
            .await
            .unwrap();
        ids.push(receipt.transaction.id);
    }

    let listed: Vec<String> = engine
        .transactions(alice)
        .await
        .unwrap()
        .into_iter()
        .map(|tx| tx.description)
        .collect();
    assert_eq!(listed, ["newest b", "newest", "middle", "old"]);

    assert!(engine.transactions(bob).await.unwrap().is_empty());
    assert_eq!(
        engine.transaction(ids[0], bob).await,
        Err(EngineError::Forbidden(
            "transaction belongs to another user".to_string()
        ))
    );
}

#[tokio::test]
async fn dashboard_collects_everything_a_user_owns() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;
    let account = engine
        .new_account(alice, "Checking", "bank", money("20.00"))
        .await
        .unwrap();
    let food = engine
        .new_category(alice, "Food", TransactionKind::Expense)
        .await
        .unwrap();
    engine
        .new_category(alice, "Salary", TransactionKind::Income)
        .await
        .unwrap();
    engine
        .new_account(bob, "Other", "cash", money("1.00"))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::new(
            alice,
            account.id,
            food.id,
            TransactionKind::Expense,
            money("7.50"),
            day(),
            "lunch",
        ))
        .await
        .unwrap();

    let dashboard = engine.dashboard(alice).await.unwrap();
    assert_eq!(dashboard.user.email, "alice@example.com");
    assert_eq!(dashboard.accounts.len(), 1);
    assert_eq!(dashboard.accounts[0].balance, money("12.50"));
    assert_eq!(dashboard.categories.len(), 2);
    assert_eq!(dashboard.transactions.len(), 1);

    assert_eq!(
        engine
            .categories_by_kind(alice, TransactionKind::Income)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        engine.dashboard(9_999).await,
        Err(EngineError::NotFound("user".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_registrations_with_one_email_yield_one_user() {
    let (engine, db, path) = engine_with_file_db().await;
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = Arc::clone(&engine);
        let email = if i % 2 == 0 {
            "carol@example.com"
        } else {
            "Carol@Example.com"
        };
        handles.push(tokio::spawn(async move {
            engine.new_user("Carol", email, "hash").await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert_eq!(
                err,
                EngineError::ExistingKey("carol@example.com".to_string())
            ),
        }
    }
    assert_eq!(created, 1);
    assert!(
        engine
            .user_credentials("carol@example.com")
            .await
            .unwrap()
            .is_some()
    );

    drop(db);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn registry_validation() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    assert_eq!(
        engine
            .new_user("Alice again", "ALICE@example.com", "hash")
            .await,
        Err(EngineError::ExistingKey("alice@example.com".to_string()))
    );
    assert_eq!(
        engine
            .new_account(alice, "Checking", "bank", money("-0.01"))
            .await,
        Err(EngineError::Validation(
            "initial balance must not be negative".to_string()
        ))
    );
    assert_eq!(
        engine
            .new_account(alice, " ", "bank", MoneyCents::ZERO)
            .await,
        Err(EngineError::Validation(
            "account name must not be empty".to_string()
        ))
    );
    assert_eq!(
        engine
            .new_account(9_999, "Checking", "bank", MoneyCents::ZERO)
            .await,
        Err(EngineError::NotFound("user".to_string()))
    );
    assert_eq!(
        engine
            .new_category(alice, "", TransactionKind::Income)
            .await,
        Err(EngineError::Validation(
            "category name must not be empty".to_string()
        ))
    );

    let credentials = engine
        .user_credentials("Alice@Example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(credentials.id, alice);
    assert_eq!(credentials.password_hash, "hash");
    assert!(
        engine
            .user_credentials("nobody@example.com")
            .await
            .unwrap()
            .is_none()
    );
}
