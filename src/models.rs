//! Core data models: items, their storage location, and named locations.
//!
//! Field names serialize in camelCase (`photoUrl`, `createdAt`), which is
//! also the export file format. Optional text fields are empty strings when
//! absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InventoryError, Result};

/// Where an item is kept: a two-level area/place pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLocation {
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub place: String,
}

impl ItemLocation {
    pub fn new(area: impl Into<String>, place: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            place: place.into(),
        }
    }

    /// Build a location from an arbitrary JSON value.
    ///
    /// Anything other than an object (including the legacy plain-string
    /// form) becomes an empty pair.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self {
                area: string_field(map.get("area")),
                place: string_field(map.get("place")),
            },
            _ => Self::default(),
        }
    }

    /// Decode the persisted column value.
    pub fn from_stored(raw: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(raw).ok();
        Self::from_value(parsed.as_ref())
    }

    /// Encode for the persisted column.
    pub fn to_stored(&self) -> String {
        serde_json::json!({ "area": self.area, "place": self.place }).to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.area.is_empty() && self.place.is_empty()
    }
}

impl std::fmt::Display for ItemLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.area.is_empty(), self.place.is_empty()) {
            (true, true) => write!(f, "(unknown)"),
            (false, true) => write!(f, "{}", self.area),
            (true, false) => write!(f, "{}", self.place),
            (false, false) => write!(f, "{} / {}", self.area, self.place),
        }
    }
}

/// A tracked physical object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub location: ItemLocation,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub note: String,
    /// Photo as a `data:` URI, empty when there is none.
    #[serde(default)]
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item with a fresh id and `created_at == updated_at`.
    pub fn new(data: NewItem) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            name: data.name,
            location: data.location,
            category: data.category,
            note: data.note,
            photo_url: data.photo_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an item from untrusted JSON, default-filling every missing
    /// or mistyped field. Never fails: a non-object yields an empty item
    /// with a fresh id.
    pub fn reconstruct(value: &Value) -> Self {
        let now = now_millis();
        let id = string_field(value.get("id"));
        let created_at = timestamp_field(value.get("createdAt")).unwrap_or(now);
        let updated_at = timestamp_field(value.get("updatedAt")).unwrap_or(now);

        Self {
            id: if id.is_empty() { new_id() } else { id },
            name: string_field(value.get("name")),
            location: ItemLocation::from_value(value.get("location")),
            category: string_field(value.get("category")),
            note: string_field(value.get("note")),
            photo_url: string_field(value.get("photoUrl")),
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    /// Case-insensitive substring match against name, area, place, note and
    /// category. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [
            &self.name,
            &self.location.area,
            &self.location.place,
            &self.note,
            &self.category,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// User-supplied fields for a new item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewItem {
    pub name: String,
    pub location: ItemLocation,
    pub category: String,
    pub note: String,
    pub photo_url: String,
}

impl NewItem {
    pub fn new(name: impl Into<String>, location: ItemLocation) -> Self {
        Self {
            name: name.into(),
            location,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = photo_url.into();
        self
    }

    /// Form-level checks: a name and a complete location are required.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(InventoryError::Invalid("item name must not be empty".into()));
        }
        validate_location(&self.location.area, &self.location.place)
    }
}

/// Partial update for an item. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub location: Option<ItemLocation>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub photo_url: Option<String>,
}

impl ItemPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the supplied fields into `item`. Does not touch id or timestamps.
    pub fn apply(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(location) = self.location {
            item.location = location;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(note) = self.note {
            item.note = note;
        }
        if let Some(photo_url) = self.photo_url {
            item.photo_url = photo_url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(InventoryError::Invalid("item name must not be empty".into()));
            }
        }
        if let Some(location) = &self.location {
            validate_location(&location.area, &location.place)?;
        }
        Ok(())
    }
}

/// A named area/place pair that items can refer to.
///
/// Nothing prevents two locations with the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub place: String,
}

impl Location {
    pub fn new(data: NewLocation) -> Self {
        Self {
            id: new_id(),
            area: data.area,
            place: data.place,
        }
    }

    pub fn reconstruct(value: &Value) -> Self {
        let id = string_field(value.get("id"));
        Self {
            id: if id.is_empty() { new_id() } else { id },
            area: string_field(value.get("area")),
            place: string_field(value.get("place")),
        }
    }

    pub fn as_item_location(&self) -> ItemLocation {
        ItemLocation::new(self.area.clone(), self.place.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewLocation {
    pub area: String,
    pub place: String,
}

impl NewLocation {
    pub fn new(area: impl Into<String>, place: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            place: place.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_location(&self.area, &self.place)
    }
}

fn validate_location(area: &str, place: &str) -> Result<()> {
    if area.trim().is_empty() || place.trim().is_empty() {
        return Err(InventoryError::Invalid(
            "location needs both an area and a place".into(),
        ));
    }
    Ok(())
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time truncated to the millisecond precision used in storage.
pub fn now_millis() -> DateTime<Utc> {
    from_millis(Utc::now().timestamp_millis())
}

pub fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Timestamp for an update that is strictly later than `previous`, even if
/// the clock has not advanced a full millisecond.
pub fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now_millis();
    if now > previous {
        now
    } else {
        previous + chrono::TimeDelta::milliseconds(1)
    }
}

/// Scalar fields keep numbers and `true` in their text form; null, `false`,
/// arrays and objects become empty.
fn string_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

fn timestamp_field(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?;
    let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
    Some(from_millis(parsed.timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_item_has_equal_timestamps() {
        let item = Item::new(NewItem::new("Drill", ItemLocation::new("Garage", "Shelf")));
        assert_eq!(item.created_at, item.updated_at);
        assert!(!item.id.is_empty());
        assert_eq!(item.location.area, "Garage");
    }

    #[test]
    fn test_reconstruct_legacy_string_location() {
        let item = Item::reconstruct(&json!({
            "id": "abc",
            "name": "Lamp",
            "location": "Living room"
        }));
        assert_eq!(item.id, "abc");
        assert_eq!(item.location, ItemLocation::default());
    }

    #[test]
    fn test_reconstruct_default_fills_missing_fields() {
        let item = Item::reconstruct(&json!({ "name": "Tape" }));
        assert!(!item.id.is_empty());
        assert_eq!(item.category, "");
        assert_eq!(item.note, "");
        assert_eq!(item.photo_url, "");
        assert!(item.updated_at >= item.created_at);
    }

    #[test]
    fn test_reconstruct_non_object_is_empty_item() {
        let item = Item::reconstruct(&json!(42));
        assert!(!item.id.is_empty());
        assert_eq!(item.name, "");
        assert_eq!(item.location, ItemLocation::default());
    }

    #[test]
    fn test_reconstruct_keeps_numeric_id_and_name() {
        let item = Item::reconstruct(&json!({ "id": 7, "name": 1984, "note": null }));
        assert_eq!(item.id, "7");
        assert_eq!(item.name, "1984");
        assert_eq!(item.note, "");

        let loc = Location::reconstruct(&json!({ "id": 3, "area": "Attic", "place": false }));
        assert_eq!(loc.id, "3");
        assert_eq!(loc.place, "");
    }

    #[test]
    fn test_reconstruct_keeps_timestamps() {
        let item = Item::reconstruct(&json!({
            "id": "t1",
            "name": "Kettle",
            "createdAt": "2024-03-01T10:00:00.250Z",
            "updatedAt": "2024-03-02T08:30:00.000Z"
        }));
        assert_eq!(item.created_at.timestamp_millis(), 1_709_287_200_250);
        assert!(item.updated_at > item.created_at);
    }

    #[test]
    fn test_reconstruct_clamps_updated_before_created() {
        let item = Item::reconstruct(&json!({
            "createdAt": "2024-03-02T00:00:00Z",
            "updatedAt": "2024-03-01T00:00:00Z"
        }));
        assert_eq!(item.updated_at, item.created_at);
    }

    #[test]
    fn test_stored_location_roundtrip_and_legacy() {
        let loc = ItemLocation::new("Bedroom", "Top drawer");
        assert_eq!(ItemLocation::from_stored(&loc.to_stored()), loc);
        assert_eq!(ItemLocation::from_stored("Kitchen"), ItemLocation::default());
        assert_eq!(ItemLocation::from_stored("\"Kitchen\""), ItemLocation::default());
    }

    #[test]
    fn test_matches_is_case_insensitive_across_fields() {
        let item = Item::new(
            NewItem::new("Passport", ItemLocation::new("Study", "Desk DRAWER"))
                .with_category("Documents"),
        );
        assert!(item.matches("drawer"));
        assert!(item.matches("document"));
        assert!(item.matches("pass"));
        assert!(!item.matches("garage"));
    }

    #[test]
    fn test_patch_apply_only_touches_supplied_fields() {
        let mut item = Item::new(
            NewItem::new("Old", ItemLocation::new("A", "B")).with_note("keep me"),
        );
        ItemPatch::name("New").apply(&mut item);
        assert_eq!(item.name, "New");
        assert_eq!(item.note, "keep me");
        assert_eq!(item.location, ItemLocation::new("A", "B"));
    }

    #[test]
    fn test_patch_deserializes_camel_case() {
        let patch: ItemPatch = serde_json::from_value(json!({ "photoUrl": "" })).unwrap();
        assert_eq!(patch.photo_url.as_deref(), Some(""));
        assert!(patch.name.is_none());
    }

    #[test]
    fn test_validation_rejects_blank_fields() {
        assert!(NewItem::new("  ", ItemLocation::new("A", "B")).validate().is_err());
        assert!(NewItem::new("Box", ItemLocation::new("A", "")).validate().is_err());
        assert!(NewItem::new("Box", ItemLocation::new("A", "B")).validate().is_ok());
        assert!(NewLocation::new("", "Shelf").validate().is_err());
        assert!(ItemPatch::name("").validate().is_err());
        assert!(ItemPatch::default().validate().is_ok());
    }

    #[test]
    fn test_next_update_time_is_strictly_later() {
        let future = now_millis() + chrono::TimeDelta::seconds(10);
        assert!(next_update_time(future) > future);
        let past = now_millis() - chrono::TimeDelta::seconds(10);
        assert!(next_update_time(past) > past);
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = Item::new(NewItem::new("Cup", ItemLocation::new("Kitchen", "Cupboard")));
        let v = serde_json::to_value(&item).unwrap();
        assert!(v.get("photoUrl").is_some());
        assert!(v.get("createdAt").is_some());
        assert_eq!(v["location"]["place"], "Cupboard");
    }
}
