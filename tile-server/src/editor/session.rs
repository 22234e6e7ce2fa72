//! Per-customer editor session
//!
//! Holds the uploads being prepared, the current selection and the
//! transient crop controls. Controls only reach an upload on `save_crop`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Filter, MAX_TILES, Order, Rotation, TileItem, UploadItem, UploadStatus, Zoom,
};
use shared::order::Pricing;

/// Upload slots per session, one order's worth of tiles
pub const MAX_UPLOADS: usize = MAX_TILES;

/// Placeholder uploads a fresh session starts with
pub const DEFAULT_UPLOADS: usize = 3;

/// Transient crop controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub zoom: Zoom,
    pub rotation: Rotation,
    pub filter: Filter,
}

impl From<&UploadItem> for Controls {
    fn from(upload: &UploadItem) -> Self {
        Self {
            zoom: upload.zoom,
            rotation: upload.rotation,
            filter: upload.filter,
        }
    }
}

/// A change to the transient controls
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlAction {
    ZoomIn,
    ZoomOut,
    SetZoom { zoom: f32 },
    Rotate,
    SetFilter { filter: Filter },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSession {
    uploads: Vec<UploadItem>,
    selected_id: Option<u64>,
    controls: Controls,
    #[serde(skip_serializing_if = "Option::is_none")]
    edit_order_id: Option<String>,
    #[serde(skip)]
    last_id: u64,
}

/// Derived checkout figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSummary {
    pub tiles_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub est_total: Decimal,
    pub currency: String,
    pub can_checkout: bool,
    pub max_uploads: usize,
    pub remaining_slots: usize,
}

impl EditorSession {
    /// Fresh session with [`DEFAULT_UPLOADS`] uncropped uploads, first selected
    pub fn new(now: u64) -> Self {
        let mut session = Self {
            uploads: Vec::with_capacity(MAX_UPLOADS),
            selected_id: None,
            controls: Controls::default(),
            edit_order_id: None,
            last_id: 0,
        };
        for _ in 0..DEFAULT_UPLOADS {
            session.add_upload(now);
        }
        session
    }

    /// Session preloaded with an order's tiles, all cropped
    pub fn for_order(order: &Order, now: u64) -> Self {
        let uploads: Vec<UploadItem> = order.items.iter().map(UploadItem::from).collect();
        let last_id = uploads.iter().map(|u| u.id).max().unwrap_or(0).max(now);
        let mut session = Self {
            uploads,
            selected_id: None,
            controls: Controls::default(),
            edit_order_id: Some(order.id.clone()),
            last_id,
        };
        if let Some(first) = session.uploads.first().map(|u| u.id) {
            session.select_unchecked(first);
        }
        session
    }

    pub fn uploads(&self) -> &[UploadItem] {
        &self.uploads
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected_id
    }

    pub fn selected(&self) -> Option<&UploadItem> {
        self.selected_id
            .and_then(|id| self.uploads.iter().find(|u| u.id == id))
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn edit_order_id(&self) -> Option<&str> {
        self.edit_order_id.as_deref()
    }

    pub fn is_full(&self) -> bool {
        self.uploads.len() >= MAX_UPLOADS
    }

    /// Add one upload; returns its id, or `None` when the session is full
    ///
    /// Ids are strictly increasing within a session: `max(now, last + 1)`.
    /// Once the id space is exhausted no further upload is accepted.
    pub fn add_upload(&mut self, now: u64) -> Option<u64> {
        if self.is_full() {
            return None;
        }
        let id = now.max(self.last_id.checked_add(1)?);
        self.last_id = id;
        self.uploads.push(UploadItem::new(id));
        if self.selected().is_none() {
            self.select_unchecked(id);
        }
        Some(id)
    }

    /// Select an upload and load its settings into the controls
    pub fn select(&mut self, upload_id: u64) -> AppResult<()> {
        if !self.uploads.iter().any(|u| u.id == upload_id) {
            return Err(AppError::upload_not_found(upload_id));
        }
        self.select_unchecked(upload_id);
        Ok(())
    }

    fn select_unchecked(&mut self, upload_id: u64) {
        self.selected_id = Some(upload_id);
        if let Some(upload) = self.uploads.iter().find(|u| u.id == upload_id) {
            self.controls = Controls::from(upload);
        }
    }

    pub fn apply(&mut self, action: ControlAction) {
        let controls = &mut self.controls;
        match action {
            ControlAction::ZoomIn => controls.zoom = controls.zoom.zoom_in(),
            ControlAction::ZoomOut => controls.zoom = controls.zoom.zoom_out(),
            ControlAction::SetZoom { zoom } => controls.zoom = Zoom::new(zoom),
            ControlAction::Rotate => controls.rotation = controls.rotation.rotate(),
            ControlAction::SetFilter { filter } => controls.filter = filter,
        }
    }

    /// Write the controls into the selected upload and mark it cropped
    ///
    /// Selection then moves to the first upload still needing a crop, if any.
    pub fn save_crop(&mut self) -> AppResult<()> {
        let selected = self
            .selected_id
            .ok_or_else(|| AppError::new(ErrorCode::NoUploadSelected))?;
        let controls = self.controls;
        let upload = self
            .uploads
            .iter_mut()
            .find(|u| u.id == selected)
            .ok_or_else(|| AppError::new(ErrorCode::NoUploadSelected))?;

        upload.status = UploadStatus::Cropped;
        upload.zoom = controls.zoom;
        upload.rotation = controls.rotation;
        upload.filter = controls.filter;

        if let Some(next) = self
            .uploads
            .iter()
            .find(|u| u.status == UploadStatus::NeedsCrop)
            .map(|u| u.id)
        {
            self.select_unchecked(next);
        }
        Ok(())
    }

    pub fn cropped_count(&self) -> usize {
        self.uploads.iter().filter(|u| u.is_cropped()).count()
    }

    /// Cropped uploads as order items, in upload order
    pub fn cropped_tiles(&self) -> Vec<TileItem> {
        self.uploads.iter().filter_map(UploadItem::to_tile).collect()
    }

    pub fn summary(&self, pricing: &Pricing) -> EditorSummary {
        let tiles_count = self.cropped_count();
        EditorSummary {
            tiles_count,
            est_total: pricing.total_for(tiles_count),
            currency: pricing.currency.clone(),
            can_checkout: tiles_count >= 1,
            max_uploads: MAX_UPLOADS,
            remaining_slots: MAX_UPLOADS.saturating_sub(self.uploads.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::ShippingDetails;
    use shared::order::OrderStatus;

    const NOW: u64 = 1_735_000_000_000;

    #[test]
    fn test_new_session_defaults() {
        let session = EditorSession::new(NOW);
        assert_eq!(session.uploads().len(), DEFAULT_UPLOADS);
        assert!(session.uploads().iter().all(|u| !u.is_cropped()));
        assert_eq!(session.selected_id(), Some(session.uploads()[0].id));
        assert_eq!(session.controls(), Controls::default());
        assert!(session.edit_order_id().is_none());
    }

    #[test]
    fn test_upload_ids_strictly_increase() {
        let mut session = EditorSession::new(NOW);
        let extra = session.add_upload(NOW).unwrap();
        let ids: Vec<_> = session.uploads().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![NOW, NOW + 1, NOW + 2, NOW + 3]);
        assert_eq!(extra, NOW + 3);
    }

    #[test]
    fn test_add_stops_at_max() {
        let mut session = EditorSession::new(NOW);
        for i in 0..(MAX_UPLOADS - DEFAULT_UPLOADS) {
            assert!(session.add_upload(NOW + 100 + i as u64).is_some());
        }
        assert_eq!(session.uploads().len(), MAX_UPLOADS);

        assert_eq!(session.add_upload(NOW + 500), None);
        assert_eq!(session.uploads().len(), MAX_UPLOADS);
        assert_eq!(session.summary(&Pricing::default()).remaining_slots, 0);
    }

    #[test]
    fn test_crop_one_of_three() {
        let mut session = EditorSession::new(NOW);
        session.apply(ControlAction::ZoomIn);
        session.apply(ControlAction::Rotate);
        session.apply(ControlAction::SetFilter {
            filter: Filter::Vintage,
        });
        session.save_crop().unwrap();

        assert_eq!(session.cropped_count(), 1);
        let summary = session.summary(&Pricing::default());
        assert_eq!(summary.tiles_count, 1);
        assert_eq!(summary.est_total, Decimal::from(200));
        assert!(summary.can_checkout);

        let first = &session.uploads()[0];
        assert_eq!(first.zoom.value(), 1.1);
        assert_eq!(first.rotation.degrees(), 90);
        assert_eq!(first.filter, Filter::Vintage);
        // moved on to the next uncropped upload with its own settings
        assert_eq!(session.selected_id(), Some(session.uploads()[1].id));
        assert_eq!(session.controls(), Controls::default());
    }

    #[test]
    fn test_controls_do_not_touch_upload_until_saved() {
        let mut session = EditorSession::new(NOW);
        session.apply(ControlAction::SetZoom { zoom: 2.5 });
        assert_eq!(session.controls().zoom.value(), 2.5);
        assert_eq!(session.uploads()[0].zoom, Zoom::default());

        // switching away discards unsaved controls
        let second = session.uploads()[1].id;
        session.select(second).unwrap();
        assert_eq!(session.controls(), Controls::default());
    }

    #[test]
    fn test_resave_cropped_keeps_state() {
        let mut session = EditorSession::new(NOW);
        for _ in 0..DEFAULT_UPLOADS {
            session.save_crop().unwrap();
        }
        assert_eq!(session.cropped_count(), 3);
        let last = session.uploads()[2].id;
        assert_eq!(session.selected_id(), Some(last));

        session.apply(ControlAction::SetFilter { filter: Filter::Noir });
        session.save_crop().unwrap();
        assert_eq!(session.cropped_count(), 3);
        assert_eq!(session.uploads()[2].filter, Filter::Noir);
        assert_eq!(session.selected_id(), Some(last));
    }

    #[test]
    fn test_select_unknown_upload() {
        let mut session = EditorSession::new(NOW);
        let err = session.select(42).unwrap_err();
        assert_eq!(err.code, ErrorCode::UploadNotFound);
    }

    #[test]
    fn test_for_order_loads_cropped_tiles() {
        let mut tile = TileItem::plain(7);
        tile.filter = Filter::Sepia;
        tile.zoom = Zoom::new(1.8);
        let order = Order {
            id: "ORD-1234-AB".to_string(),
            customer_id: "c-1".to_string(),
            created_at: Utc::now(),
            status: OrderStatus::New,
            items: vec![tile, TileItem::plain(8)],
            total: Decimal::from(400),
            currency: "THB".to_string(),
            shipping: ShippingDetails::default(),
        };

        let mut session = EditorSession::for_order(&order, NOW);
        assert_eq!(session.edit_order_id(), Some("ORD-1234-AB"));
        assert_eq!(session.cropped_count(), 2);
        assert_eq!(session.selected_id(), Some(7));
        assert_eq!(session.controls().filter, Filter::Sepia);
        assert_eq!(session.controls().zoom.value(), 1.8);

        let added = session.add_upload(5).unwrap();
        assert_eq!(added, NOW + 1);
        assert_eq!(session.cropped_tiles().len(), 2);
    }

    #[test]
    fn test_control_action_json() {
        let action: ControlAction =
            serde_json::from_str(r#"{"action":"set_filter","filter":"B&W"}"#).unwrap();
        assert_eq!(
            action,
            ControlAction::SetFilter {
                filter: Filter::BlackAndWhite
            }
        );
        let action: ControlAction = serde_json::from_str(r#"{"action":"zoom_out"}"#).unwrap();
        assert_eq!(action, ControlAction::ZoomOut);
    }

    #[test]
    fn test_add_upload_after_largest_id_is_refused() {
        let order = Order {
            id: "ORD-1234-AB".to_string(),
            customer_id: "c-1".to_string(),
            created_at: Utc::now(),
            status: OrderStatus::New,
            items: vec![TileItem::plain(u64::MAX)],
            total: Decimal::from(200),
            currency: "THB".to_string(),
            shipping: ShippingDetails::default(),
        };

        let mut session = EditorSession::for_order(&order, NOW);
        assert_eq!(session.add_upload(NOW), None);
        assert_eq!(session.uploads().len(), 1);
        assert_eq!(session.selected_id(), Some(u64::MAX));
    }
}
