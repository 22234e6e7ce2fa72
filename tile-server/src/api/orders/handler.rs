//! Order API Handlers

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use shared::models::TileItem;
use shared::order::{CustomerTab, StoreEvent};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::auth::CurrentCustomer;
use crate::core::ServerState;
use crate::orders::OrderView;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub tab: CustomerTab,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemsRequest {
    pub items: Vec<TileItem>,
}

/// List the caller's orders for one tab
pub async fn list(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Query(query): Query<ListQuery>,
) -> ApiResponse<Vec<OrderView>> {
    ApiResponse::success(state.orders.list(&customer.customer_id, query.tab))
}

/// Get one of the caller's orders
pub async fn get_by_id(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderView>> {
    let view = state.orders.get(&customer.customer_id, &id)?;
    Ok(ApiResponse::success(view))
}

/// Replace the items of an editable order
pub async fn update_items(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<String>,
    Json(req): Json<UpdateItemsRequest>,
) -> AppResult<ApiResponse<OrderView>> {
    let view = state.orders.edit(&customer.customer_id, &id, req.items)?;
    Ok(ApiResponse::success(view))
}

/// Cancel an editable order (repeat calls succeed)
pub async fn cancel(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderView>> {
    let view = state.orders.cancel(&customer.customer_id, &id)?;
    Ok(ApiResponse::success(view))
}

/// Server-sent events for changes to the caller's orders
///
/// A lagging subscriber gets a `resync` event and should re-read its list.
pub async fn events(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let feed = customer_feed(state.store.subscribe(), customer.customer_id);
    Sse::new(feed.map(|item| Ok(to_sse(item)))).keep_alive(KeepAlive::default())
}

/// One item of a customer's change feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    Change(StoreEvent),
    /// Events were dropped; carries how many
    Resync(u64),
}

/// Store events for one customer's orders, ending when the store goes away
pub fn customer_feed(
    rx: broadcast::Receiver<StoreEvent>,
    customer_id: String,
) -> impl Stream<Item = FeedItem> {
    futures::stream::unfold((rx, customer_id), |(mut rx, customer_id)| async move {
        loop {
            match rx.recv().await {
                Ok(event) if event.customer_id == customer_id => {
                    return Some((FeedItem::Change(event), (rx, customer_id)));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(customer_id = %customer_id, skipped, "Event stream lagged");
                    return Some((FeedItem::Resync(skipped), (rx, customer_id)));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

fn to_sse(item: FeedItem) -> Event {
    let event = match item {
        FeedItem::Change(event) => event,
        FeedItem::Resync(skipped) => {
            return Event::default().event("resync").data(skipped.to_string());
        }
    };
    let sse = Event::default()
        .event(event.name())
        .id(event.sequence.to_string());
    match sse.json_data(&event) {
        Ok(sse) => sse,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode store event");
            Event::default().event("resync").data("0")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderStatus, StoreEventKind};

    fn event(sequence: u64, customer_id: &str) -> StoreEvent {
        StoreEvent {
            sequence,
            timestamp: 0,
            order_id: format!("ORD-000{sequence}-AA"),
            customer_id: customer_id.to_string(),
            kind: StoreEventKind::StatusChanged {
                from: OrderStatus::New,
                to: OrderStatus::Shipping,
            },
        }
    }

    #[tokio::test]
    async fn test_feed_only_carries_own_orders() {
        let (tx, rx) = broadcast::channel(16);
        let feed = customer_feed(rx, "alice".to_string());
        tx.send(event(1, "bob")).unwrap();
        tx.send(event(2, "alice")).unwrap();
        tx.send(event(3, "bob")).unwrap();
        tx.send(event(4, "alice")).unwrap();
        drop(tx);

        let items: Vec<_> = feed.collect().await;
        assert_eq!(
            items,
            vec![
                FeedItem::Change(event(2, "alice")),
                FeedItem::Change(event(4, "alice"))
            ]
        );
    }

    #[tokio::test]
    async fn test_lagging_feed_asks_for_resync() {
        let (tx, rx) = broadcast::channel(2);
        let mut feed = Box::pin(customer_feed(rx, "alice".to_string()));
        for seq in 1..=5 {
            tx.send(event(seq, "alice")).unwrap();
        }

        assert_eq!(feed.next().await, Some(FeedItem::Resync(3)));
        assert_eq!(feed.next().await, Some(FeedItem::Change(event(4, "alice"))));
        assert_eq!(feed.next().await, Some(FeedItem::Change(event(5, "alice"))));
    }
}
