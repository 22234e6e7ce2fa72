use super::session::{ControlAction, EditorSession, EditorSummary};
use crate::orders::{CustomerOrderService, OrderView};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::TileItem;
use shared::order::Pricing;
use shared::util::now_millis;
use std::sync::Arc;

/// Session state plus derived figures, as returned by every editor call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    #[serde(flatten)]
    pub session: EditorSession,
    pub summary: EditorSummary,
}

/// Editor sessions keyed by customer id, created on first touch
#[derive(Debug)]
pub struct EditorService {
    sessions: DashMap<String, EditorSession>,
    orders: CustomerOrderService,
    pricing: Pricing,
}

impl EditorService {
    pub fn new(orders: CustomerOrderService, pricing: Pricing) -> Arc<Self> {
        Arc::new(Self {
            sessions: DashMap::new(),
            orders,
            pricing,
        })
    }

    pub fn view(&self, customer_id: &str) -> EditorView {
        self.with_session(customer_id, |_| {})
    }

    pub fn add_upload(&self, customer_id: &str) -> EditorView {
        self.with_session(customer_id, |s| {
            if s.add_upload(now()).is_none() {
                tracing::debug!(customer_id, "Upload ignored, session is full");
            }
        })
    }

    pub fn select(&self, customer_id: &str, upload_id: u64) -> AppResult<EditorView> {
        self.try_with_session(customer_id, |s| s.select(upload_id))
    }

    pub fn apply(&self, customer_id: &str, action: ControlAction) -> EditorView {
        self.with_session(customer_id, |s| s.apply(action))
    }

    pub fn save_crop(&self, customer_id: &str) -> AppResult<EditorView> {
        self.try_with_session(customer_id, |s| s.save_crop())
    }

    /// Enter edit mode for an existing order
    pub fn load_order(&self, customer_id: &str, order_id: &str) -> AppResult<EditorView> {
        let order = self.orders.editable(customer_id, order_id)?;
        let session = EditorSession::for_order(&order, now());
        let summary = session.summary(&self.pricing);
        self.sessions.insert(customer_id.to_string(), session.clone());

        tracing::info!(customer_id, order_id, "Editor entered edit mode");
        Ok(EditorView { session, summary })
    }

    /// Write the cropped uploads back to the order being edited
    pub fn update_order(&self, customer_id: &str) -> AppResult<OrderView> {
        let (order_id, tiles) = {
            let session = self
                .sessions
                .get(customer_id)
                .ok_or_else(|| AppError::new(ErrorCode::NotInEditMode))?;
            let order_id = session
                .edit_order_id()
                .ok_or_else(|| AppError::new(ErrorCode::NotInEditMode))?
                .to_string();
            (order_id, session.cropped_tiles())
        };
        if tiles.is_empty() {
            return Err(AppError::new(ErrorCode::NoCroppedItems));
        }

        let view = self.orders.edit(customer_id, &order_id, tiles)?;
        self.reset(customer_id);
        Ok(view)
    }

    /// Take a new-order session for checkout
    ///
    /// The session is removed in the same step its tiles are read, so a
    /// repeated submit finds nothing to check out. Hand the session back with
    /// [`restore`](Self::restore) if the order cannot be created.
    pub fn take_checkout_tiles(
        &self,
        customer_id: &str,
    ) -> AppResult<(Vec<TileItem>, EditorSession)> {
        match self.sessions.entry(customer_id.to_string()) {
            Entry::Occupied(entry) => {
                if entry.get().edit_order_id().is_some() {
                    return Err(AppError::invalid(
                        "Editor holds an existing order, update it instead of checking out",
                    ));
                }
                let tiles = entry.get().cropped_tiles();
                if tiles.is_empty() {
                    return Err(AppError::new(ErrorCode::NoCroppedItems));
                }
                Ok((tiles, entry.remove()))
            }
            Entry::Vacant(_) => Err(AppError::new(ErrorCode::NoCroppedItems)),
        }
    }

    /// Put back a session taken for checkout, unless a new one was started meanwhile
    pub fn restore(&self, customer_id: &str, session: EditorSession) {
        self.sessions
            .entry(customer_id.to_string())
            .or_insert(session);
    }

    /// Discard the session; the next call starts a fresh one
    pub fn reset(&self, customer_id: &str) {
        self.sessions.remove(customer_id);
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    fn with_session(&self, customer_id: &str, f: impl FnOnce(&mut EditorSession)) -> EditorView {
        let mut entry = self
            .sessions
            .entry(customer_id.to_string())
            .or_insert_with(|| EditorSession::new(now()));
        f(entry.value_mut());
        EditorView {
            summary: entry.summary(&self.pricing),
            session: entry.value().clone(),
        }
    }

    fn try_with_session(
        &self,
        customer_id: &str,
        f: impl FnOnce(&mut EditorSession) -> AppResult<()>,
    ) -> AppResult<EditorView> {
        let mut result = Ok(());
        let view = self.with_session(customer_id, |s| result = f(s));
        result.map(|_| view)
    }
}

fn now() -> u64 {
    u64::try_from(now_millis()).unwrap_or_default()
}
