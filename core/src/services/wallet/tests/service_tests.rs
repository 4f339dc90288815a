//! Tests for the wallet service

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use loop_shared::config::WalletConfig;

use crate::domain::entities::wallet::PaymentMethod;
use crate::errors::{DomainError, WalletError};
use crate::repositories::{KeyValueStore, MockKeyValueStore};
use crate::services::wallet::{WalletService, BALANCE_KEY, SEEN_WALLET_KEY};

fn service(store: MockKeyValueStore) -> (WalletService<MockKeyValueStore>, Arc<MockKeyValueStore>) {
    let store = Arc::new(store);
    (
        WalletService::new(Arc::clone(&store), WalletConfig::default()),
        store,
    )
}

#[tokio::test]
async fn test_default_balance_when_missing() {
    let (wallet, _) = service(MockKeyValueStore::new());

    assert_eq!(wallet.balance().await.unwrap(), 100);
    assert!(wallet.is_low_balance().await.unwrap());
}

#[tokio::test]
async fn test_persisted_balance() {
    let (wallet, store) = service(MockKeyValueStore::with_entries([(BALANCE_KEY, "450")]));
    assert_eq!(wallet.balance().await.unwrap(), 450);
    assert!(!wallet.is_low_balance().await.unwrap());

    wallet.set_balance(120).await.unwrap();
    assert_eq!(store.peek(BALANCE_KEY).as_deref(), Some("120"));
    assert!(wallet.is_low_balance().await.unwrap());
}

#[tokio::test]
async fn test_corrupt_balance() {
    let (wallet, _) = service(MockKeyValueStore::with_entries([(BALANCE_KEY, "lots")]));

    assert!(matches!(
        wallet.balance().await,
        Err(DomainError::Wallet(WalletError::CorruptBalance { .. }))
    ));
}

#[tokio::test]
async fn test_prompt_shown_once_for_low_balance() {
    let (wallet, store) = service(MockKeyValueStore::new());

    assert!(wallet.should_prompt_recharge().await.unwrap());
    assert_eq!(store.peek(SEEN_WALLET_KEY).as_deref(), Some("true"));
    assert!(!wallet.should_prompt_recharge().await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_prompt_fires_once() {
    let (wallet, store) = service(MockKeyValueStore::new());
    let wallet = Arc::new(wallet);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let wallet = Arc::clone(&wallet);
            tokio::spawn(async move { wallet.should_prompt_recharge().await.unwrap() })
        })
        .collect();

    let mut shown = 0;
    for handle in handles {
        if handle.await.unwrap() {
            shown += 1;
        }
    }
    assert_eq!(shown, 1);
    assert_eq!(store.peek(SEEN_WALLET_KEY).as_deref(), Some("true"));
}

#[tokio::test]
async fn test_no_prompt_with_enough_balance() {
    let (wallet, store) = service(MockKeyValueStore::with_entries([(BALANCE_KEY, "500")]));

    assert!(!wallet.should_prompt_recharge().await.unwrap());
    assert_eq!(store.peek(SEEN_WALLET_KEY), None);
}

#[tokio::test]
async fn test_can_afford_two_hours() {
    let (wallet, _) = service(MockKeyValueStore::new());

    assert!(wallet.can_afford(50).await.unwrap());
    assert!(!wallet.can_afford(51).await.unwrap());
}

#[tokio::test]
async fn test_quick_amounts() {
    let (wallet, _) = service(MockKeyValueStore::new());
    assert_eq!(wallet.quick_amounts(), &[200, 500, 1000, 2000]);
    assert_eq!(wallet.minimum_recharge(), 200);
}

#[tokio::test(start_paused = true)]
async fn test_recharge_below_minimum() {
    let (wallet, store) = service(MockKeyValueStore::new());

    let err = wallet.recharge(199, PaymentMethod::Upi).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Wallet(WalletError::RechargeTooSmall {
            amount: 199,
            minimum: 200
        })
    ));
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_recharge_credits_after_delay() {
    let (wallet, store) = service(MockKeyValueStore::new());

    let pending = wallet.recharge(500, PaymentMethod::Card).unwrap();
    assert_eq!(pending.amount(), 500);
    assert_eq!(pending.method(), PaymentMethod::Card);

    sleep(Duration::from_millis(1_000)).await;
    assert!(!pending.is_finished());
    assert_eq!(store.peek(BALANCE_KEY), None);

    assert_eq!(pending.wait().await.unwrap(), 600);
    assert_eq!(store.peek(BALANCE_KEY).as_deref(), Some("600"));
    assert_eq!(wallet.balance().await.unwrap(), 600);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_recharge_never_credits() {
    let (wallet, store) = service(MockKeyValueStore::new());

    let pending = wallet.recharge(1000, PaymentMethod::NetBanking).unwrap();
    sleep(Duration::from_millis(500)).await;
    pending.cancel();

    assert!(matches!(
        pending.wait().await,
        Err(DomainError::Wallet(WalletError::RechargeCancelled))
    ));

    sleep(Duration::from_millis(5_000)).await;
    assert_eq!(store.peek(BALANCE_KEY), None);
    assert_eq!(wallet.balance().await.unwrap(), 100);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_recharges_both_credit() {
    let (wallet, _) = service(MockKeyValueStore::new());

    let first = wallet.recharge(200, PaymentMethod::Upi).unwrap();
    let second = wallet.recharge(2000, PaymentMethod::Upi).unwrap();

    first.wait().await.unwrap();
    second.wait().await.unwrap();
    assert_eq!(wallet.balance().await.unwrap(), 2300);
}

#[tokio::test(start_paused = true)]
async fn test_recharge_store_failure() {
    let (wallet, store) = service(MockKeyValueStore::new());
    let pending = wallet.recharge(200, PaymentMethod::Upi).unwrap();
    store.set_should_fail(true);

    assert!(matches!(
        pending.wait().await,
        Err(DomainError::Internal { .. })
    ));

    store.set_should_fail(false);
    assert_eq!(store.get(BALANCE_KEY).await.unwrap(), None);
}
