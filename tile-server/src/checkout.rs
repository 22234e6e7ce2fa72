//! Checkout: editor session → new order

use crate::editor::EditorService;
use crate::orders::{OrderStore, OrderView};
use crate::utils::validation::validate_input;
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::ShippingDetails;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub shipping: ShippingDetails,
}

#[derive(Debug, Clone)]
pub struct CheckoutService {
    store: Arc<OrderStore>,
    editor: Arc<EditorService>,
}

impl CheckoutService {
    pub fn new(store: Arc<OrderStore>, editor: Arc<EditorService>) -> Self {
        Self { store, editor }
    }

    /// Validate shipping, turn the cropped uploads into an order, clear the session
    ///
    /// The session is taken before the order is created, so of two concurrent
    /// submits only one finds tiles. A failed create puts the session back.
    pub fn checkout(&self, customer_id: &str, shipping: ShippingDetails) -> AppResult<OrderView> {
        validate_input(&shipping)?;
        let (tiles, session) = self.editor.take_checkout_tiles(customer_id)?;
        match self.store.create(customer_id, tiles, shipping) {
            Ok(order) => Ok(order.into()),
            Err(e) => {
                tracing::warn!(customer_id, error = %e, "Checkout failed, editor session restored");
                self.editor.restore(customer_id, session);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{CustomerOrderService, OrderStorage};
    use rust_decimal::Decimal;
    use shared::error::ErrorCode;
    use shared::order::{OrderStatus, Pricing};

    fn setup() -> (Arc<OrderStore>, Arc<EditorService>, CheckoutService) {
        let storage = OrderStorage::open_in_memory().unwrap();
        let store = OrderStore::open(storage, Pricing::default()).unwrap();
        let editor = EditorService::new(CustomerOrderService::new(store.clone()), Pricing::default());
        let checkout = CheckoutService::new(store.clone(), editor.clone());
        (store, editor, checkout)
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            name: "Alice Johnson".to_string(),
            email: "alice.j@example.com".to_string(),
            phone: "+66 81 234 5678".to_string(),
            address1: "123 Sukhumvit Road".to_string(),
            address2: None,
            city: "Bangkok".to_string(),
            postal: "10110".to_string(),
            country: "Thailand".to_string(),
        }
    }

    #[test]
    fn test_checkout_creates_order_from_cropped_uploads() {
        let (store, editor, checkout) = setup();
        editor.save_crop("c-1").unwrap();
        editor.save_crop("c-1").unwrap();

        let view = checkout.checkout("c-1", shipping()).unwrap();
        assert_eq!(view.order.status, OrderStatus::New);
        assert_eq!(view.order.tiles_count(), 2);
        assert_eq!(view.order.total, Decimal::from(400));
        assert!(view.can_edit);
        assert_eq!(store.list_for("c-1").len(), 1);

        // session cleared: back to an uncropped default session
        assert_eq!(editor.view("c-1").summary.tiles_count, 0);
    }

    #[test]
    fn test_checkout_without_crops_fails() {
        let (store, editor, checkout) = setup();
        editor.view("c-1");
        let err = checkout.checkout("c-1", shipping()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoCroppedItems);
        assert!(store.is_empty());
    }

    #[test]
    fn test_checkout_validates_shipping_first() {
        let (store, editor, checkout) = setup();
        editor.save_crop("c-1").unwrap();

        let mut bad = shipping();
        bad.city.clear();
        let err = checkout.checkout("c-1", bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(store.is_empty());
        // session kept so the customer can fix the form
        assert_eq!(editor.view("c-1").summary.tiles_count, 1);
    }

    #[test]
    fn test_repeated_submit_creates_one_order() {
        let (store, editor, checkout) = setup();
        editor.save_crop("c-1").unwrap();

        checkout.checkout("c-1", shipping()).unwrap();
        let err = checkout.checkout("c-1", shipping()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoCroppedItems);
        assert_eq!(store.list_for("c-1").len(), 1);
    }

    #[test]
    fn test_concurrent_submits_create_one_order() {
        let (store, editor, checkout) = setup();
        editor.save_crop("c-1").unwrap();
        editor.save_crop("c-1").unwrap();

        let barrier = std::sync::Barrier::new(4);
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        checkout.checkout("c-1", shipping())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(store.list_for("c-1").len(), 1);
        assert_eq!(store.list_for("c-1")[0].tiles_count(), 2);
    }
}
