use chrono::Utc;
use course_checkout::application::engine::CheckoutEngine;
use course_checkout::domain::order_code::RegistrationId;
use course_checkout::domain::plan::{PlanCatalog, PlanTag};
use course_checkout::domain::ports::PromoCodeStore;
use course_checkout::domain::promo::{DiscountType, PromoCode};
use course_checkout::domain::registration::CheckoutRequest;
use course_checkout::infrastructure::in_memory::{InMemoryPromoCodeStore, InMemoryRegistrationStore};
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redeem_never_exceeds_max_uses() {
    let store = InMemoryPromoCodeStore::new();
    let mut promo = PromoCode::new("LIMITED", DiscountType::Fixed, dec!(100));
    promo.max_uses = Some(10);
    store.store(promo).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.redeem("limited").await.unwrap() }));
    }

    let mut granted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            granted += 1;
        }
    }

    assert_eq!(granted, 10);
    assert_eq!(store.get("LIMITED").await.unwrap().unwrap().used_count, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_settle_within_promo_limit() {
    let promo_store = InMemoryPromoCodeStore::new();
    let mut promo = PromoCode::new("FIVE", DiscountType::Percentage, dec!(20));
    promo.max_uses = Some(5);
    promo_store.store(promo).await.unwrap();

    let engine = Arc::new(CheckoutEngine::new(
        PlanCatalog::standard(),
        Box::new(promo_store.clone()),
        Box::new(InMemoryRegistrationStore::new()),
    ));

    let mut handles = Vec::new();
    for n in 1..=20 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let mut request = CheckoutRequest::new(RegistrationId::new(n).unwrap(), PlanTag::Full);
            request.promo_code = Some("FIVE".to_string());
            let quote = engine.quote(request, Utc::now()).await.unwrap();
            engine
                .confirm_payment(quote.order_code.as_str())
                .await
                .unwrap()
        }));
    }

    for handle in handles {
        let registration = handle.await.unwrap();
        assert!(registration.is_paid());
        assert_eq!(registration.amount_due.value(), dec!(9600));
    }

    let promo = promo_store.get("FIVE").await.unwrap().unwrap();
    assert_eq!(promo.used_count, 5);
}
