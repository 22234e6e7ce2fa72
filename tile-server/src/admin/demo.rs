//! Demo orders for an empty store
//!
//! Five orders spread over the admin tabs so the console has something to
//! show on a fresh install. Only written when `SEED_DEMO_ORDERS=true`.

use crate::orders::OrderStore;
use chrono::{DateTime, Utc};
use shared::error::AppResult;
use shared::models::{Order, ShippingDetails, TileItem};
use shared::order::{OrderStatus, Pricing};

/// Owner recorded on demo orders
pub const DEMO_CUSTOMER_ID: &str = "demo";

struct DemoOrder {
    id: &'static str,
    created_at: &'static str,
    status: OrderStatus,
    tiles: u64,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    address1: &'static str,
    address2: Option<&'static str>,
    city: &'static str,
    postal: &'static str,
}

const DEMO_ORDERS: [DemoOrder; 5] = [
    DemoOrder {
        id: "ORD-7782-XJ",
        created_at: "2024-12-27T09:30:00Z",
        status: OrderStatus::New,
        tiles: 12,
        name: "Alice Johnson",
        email: "alice.j@example.com",
        phone: "+66 81 234 5678",
        address1: "123 Sukhumvit Road",
        address2: Some("Apt 4B"),
        city: "Bangkok",
        postal: "10110",
    },
    DemoOrder {
        id: "ORD-9921-MC",
        created_at: "2024-12-26T14:15:00Z",
        status: OrderStatus::New,
        tiles: 6,
        name: "Michael Chen",
        email: "m.chen@example.com",
        phone: "+66 89 987 6543",
        address1: "456 Sathorn Soi 1",
        address2: None,
        city: "Bangkok",
        postal: "10500",
    },
    DemoOrder {
        id: "ORD-3321-KL",
        created_at: "2024-12-25T10:00:00Z",
        status: OrderStatus::Printed,
        tiles: 8,
        name: "Sarah Connor",
        email: "sarah.c@test.com",
        phone: "+66 90 111 2222",
        address1: "789 Nimman Road",
        address2: None,
        city: "Chiang Mai",
        postal: "50200",
    },
    DemoOrder {
        id: "ORD-1102-PP",
        created_at: "2024-12-24T18:45:00Z",
        status: OrderStatus::Shipping,
        tiles: 20,
        name: "Peter Parker",
        email: "p.parker@dailybugle.com",
        phone: "+66 85 555 0123",
        address1: "15 Queen Street",
        address2: None,
        city: "Bangkok",
        postal: "10110",
    },
    DemoOrder {
        id: "ORD-5541-ZZ",
        created_at: "2024-12-20T11:20:00Z",
        status: OrderStatus::Finished,
        tiles: 4,
        name: "Zoe Saldana",
        email: "zoe@space.com",
        phone: "+66 84 000 9999",
        address1: "88 Wireless Road",
        address2: None,
        city: "Bangkok",
        postal: "10330",
    },
];

/// The demo orders, newest first, priced with `pricing`
pub fn demo_orders_priced(pricing: &Pricing) -> Vec<Order> {
    DEMO_ORDERS
        .iter()
        .map(|d| Order {
            id: d.id.to_string(),
            customer_id: DEMO_CUSTOMER_ID.to_string(),
            created_at: d
                .created_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_default(),
            status: d.status,
            items: (1..=d.tiles).map(TileItem::plain).collect(),
            total: pricing.total_for(d.tiles as usize),
            currency: pricing.currency.clone(),
            shipping: ShippingDetails {
                name: d.name.to_string(),
                email: d.email.to_string(),
                phone: d.phone.to_string(),
                address1: d.address1.to_string(),
                address2: d.address2.map(str::to_string),
                city: d.city.to_string(),
                postal: d.postal.to_string(),
                country: "Thailand".to_string(),
            },
        })
        .collect()
}

/// The demo orders at the default tile price
pub fn demo_orders() -> Vec<Order> {
    demo_orders_priced(&Pricing::default())
}

/// Insert the demo orders if the store is empty; returns how many were written
pub fn seed_if_empty(store: &OrderStore) -> AppResult<usize> {
    if !store.is_empty() {
        tracing::debug!(count = store.len(), "Store not empty, demo seeding skipped");
        return Ok(0);
    }
    let inserted = store.insert_all(demo_orders_priced(store.pricing()))?;
    tracing::info!(inserted, "Demo orders seeded");
    Ok(inserted)
}
