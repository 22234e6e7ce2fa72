//! Tile and upload models
//!
//! An [`UploadItem`] lives in an editor session. Once cropped it becomes a
//! [`TileItem`] on an order.

use serde::{Deserialize, Serialize};

/// Tiles per order, and upload slots per editor session
pub const MAX_TILES: usize = 20;

/// Photo filter
///
/// Serialized as its display name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    Original,
    Warm,
    Cool,
    #[serde(rename = "B&W")]
    BlackAndWhite,
    Vivid,
    Natural,
    Portrait,
    Dramatic,
    Vintage,
    Noir,
    Sepia,
    Fade,
    Matte,
    Bright,
    Sunset,
}

impl Filter {
    pub const ALL: [Filter; 15] = [
        Filter::Original,
        Filter::Warm,
        Filter::Cool,
        Filter::BlackAndWhite,
        Filter::Vivid,
        Filter::Natural,
        Filter::Portrait,
        Filter::Dramatic,
        Filter::Vintage,
        Filter::Noir,
        Filter::Sepia,
        Filter::Fade,
        Filter::Matte,
        Filter::Bright,
        Filter::Sunset,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Filter::Original => "Original",
            Filter::Warm => "Warm",
            Filter::Cool => "Cool",
            Filter::BlackAndWhite => "B&W",
            Filter::Vivid => "Vivid",
            Filter::Natural => "Natural",
            Filter::Portrait => "Portrait",
            Filter::Dramatic => "Dramatic",
            Filter::Vintage => "Vintage",
            Filter::Noir => "Noir",
            Filter::Sepia => "Sepia",
            Filter::Fade => "Fade",
            Filter::Matte => "Matte",
            Filter::Bright => "Bright",
            Filter::Sunset => "Sunset",
        }
    }

    /// CSS `filter` expression used to preview and print the tile
    pub const fn css(&self) -> &'static str {
        match self {
            Filter::Original => "none",
            Filter::Warm => "sepia(30%) saturate(140%)",
            Filter::Cool => "saturate(0.5) hue-rotate(30deg)",
            Filter::BlackAndWhite => "grayscale(100%)",
            Filter::Vivid => "saturate(200%)",
            Filter::Natural => "contrast(90%) saturate(110%)",
            Filter::Portrait => "brightness(110%) contrast(105%)",
            Filter::Dramatic => "contrast(140%) saturate(90%)",
            Filter::Vintage => "sepia(50%) contrast(90%)",
            Filter::Noir => "grayscale(100%) contrast(150%) brightness(80%)",
            Filter::Sepia => "sepia(100%)",
            Filter::Fade => "opacity(0.8) contrast(90%)",
            Filter::Matte => "contrast(80%) brightness(120%)",
            Filter::Bright => "brightness(120%) saturate(110%)",
            Filter::Sunset => "sepia(40%) hue-rotate(-10deg) saturate(150%)",
        }
    }
}

/// Crop zoom factor, `1.0..=3.0` in steps of `0.1`
///
/// Every constructor clamps and snaps, so a stored zoom is always on the grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(from = "f32", into = "f32")]
pub struct Zoom(f32);

impl Zoom {
    pub const MIN: f32 = 1.0;
    pub const MAX: f32 = 3.0;
    pub const STEP: f32 = 0.1;

    pub fn new(value: f32) -> Self {
        let value = if value.is_finite() { value } else { Self::MIN };
        let snapped = (value.clamp(Self::MIN, Self::MAX) * 10.0).round() / 10.0;
        Self(snapped)
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn zoom_in(self) -> Self {
        Self::new(self.0 + Self::STEP)
    }

    pub fn zoom_out(self) -> Self {
        Self::new(self.0 - Self::STEP)
    }

    pub fn at_min(&self) -> bool {
        self.0 <= Self::MIN
    }

    pub fn at_max(&self) -> bool {
        self.0 >= Self::MAX
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl From<f32> for Zoom {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Zoom> for f32 {
    fn from(zoom: Zoom) -> Self {
        zoom.0
    }
}

/// Clockwise rotation in quarter turns, stored as degrees `0/90/180/270`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "i32", into = "u16")]
pub struct Rotation(u16);

impl Rotation {
    /// Normalizes any degree value onto the quarter-turn grid
    pub fn new(degrees: i32) -> Self {
        let wrapped = degrees.rem_euclid(360);
        Self((wrapped - wrapped % 90) as u16)
    }

    pub fn degrees(&self) -> u16 {
        self.0
    }

    /// Rotate 90° clockwise
    pub fn rotate(self) -> Self {
        Self::new(i32::from(self.0) + 90)
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Self::new(degrees)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

/// Editor-local upload state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UploadStatus {
    #[default]
    NeedsCrop,
    Cropped,
}

/// A photo in an editor session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadItem {
    pub id: u64,
    pub status: UploadStatus,
    pub filter: Filter,
    pub zoom: Zoom,
    pub rotation: Rotation,
}

impl UploadItem {
    /// Fresh upload waiting for its crop
    pub fn new(id: u64) -> Self {
        Self {
            id,
            status: UploadStatus::NeedsCrop,
            filter: Filter::default(),
            zoom: Zoom::default(),
            rotation: Rotation::default(),
        }
    }

    pub fn is_cropped(&self) -> bool {
        self.status == UploadStatus::Cropped
    }

    /// Line item for an order; `None` while the upload still needs a crop
    pub fn to_tile(&self) -> Option<TileItem> {
        self.is_cropped().then(|| TileItem {
            id: self.id,
            filter: self.filter,
            zoom: self.zoom,
            rotation: self.rotation,
            is_cropped: true,
        })
    }
}

/// An order line item: one printed tile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileItem {
    pub id: u64,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub zoom: Zoom,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_cropped")]
    pub is_cropped: bool,
}

fn default_cropped() -> bool {
    true
}

impl TileItem {
    /// Tile with default crop settings
    pub fn plain(id: u64) -> Self {
        Self {
            id,
            filter: Filter::default(),
            zoom: Zoom::default(),
            rotation: Rotation::default(),
            is_cropped: true,
        }
    }
}

impl From<&TileItem> for UploadItem {
    /// Re-open an order's tile in the editor; it is cropped by definition
    fn from(tile: &TileItem) -> Self {
        Self {
            id: tile.id,
            status: UploadStatus::Cropped,
            filter: tile.filter,
            zoom: tile.zoom,
            rotation: tile.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_serializes_display_name() {
        assert_eq!(
            serde_json::to_string(&Filter::BlackAndWhite).unwrap(),
            "\"B&W\""
        );
        let f: Filter = serde_json::from_str("\"Sunset\"").unwrap();
        assert_eq!(f, Filter::Sunset);
        for filter in Filter::ALL {
            let json = serde_json::to_string(&filter).unwrap();
            assert_eq!(json, format!("\"{}\"", filter.name()));
        }
    }

    #[test]
    fn test_zoom_clamps_and_snaps() {
        assert_eq!(Zoom::new(0.2).value(), 1.0);
        assert_eq!(Zoom::new(7.0).value(), 3.0);
        assert_eq!(Zoom::new(1.26).value(), 1.3);
        assert_eq!(Zoom::new(f32::NAN).value(), 1.0);
    }

    #[test]
    fn test_zoom_steps_stay_on_grid() {
        let mut zoom = Zoom::default();
        for _ in 0..5 {
            zoom = zoom.zoom_in();
        }
        assert_eq!(zoom.value(), 1.5);
        for _ in 0..30 {
            zoom = zoom.zoom_in();
        }
        assert!(zoom.at_max());
        assert_eq!(zoom.value(), 3.0);
        assert_eq!(Zoom::default().zoom_out().value(), 1.0);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut r = Rotation::default();
        for expected in [90, 180, 270, 0, 90] {
            r = r.rotate();
            assert_eq!(r.degrees(), expected);
        }
        assert_eq!(Rotation::new(-90).degrees(), 270);
        assert_eq!(Rotation::new(450).degrees(), 90);
        assert_eq!(Rotation::new(100).degrees(), 90);
    }

    #[test]
    fn test_upload_to_tile_requires_crop() {
        let mut upload = UploadItem::new(7);
        assert!(upload.to_tile().is_none());

        upload.status = UploadStatus::Cropped;
        upload.filter = Filter::Noir;
        let tile = upload.to_tile().unwrap();
        assert_eq!(tile.id, 7);
        assert_eq!(tile.filter, Filter::Noir);
        assert!(tile.is_cropped);
    }

    #[test]
    fn test_tile_json_shape() {
        let json = serde_json::to_value(TileItem::plain(1)).unwrap();
        assert_eq!(json["isCropped"], true);
        assert_eq!(json["filter"], "Original");
        assert_eq!(json["rotation"], 0);

        let tile: TileItem = serde_json::from_str(r#"{"id":5}"#).unwrap();
        assert_eq!(tile, TileItem::plain(5));
    }
}
