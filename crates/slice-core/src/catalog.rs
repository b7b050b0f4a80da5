//! # Catalog Module
//!
//! The menu as the till sees it: sellable items, drinks and the shop's
//! contact phone, plus the edits the admin screen makes to them.
//!
//! ## Document Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One document, read and written wholesale                              │
//! │                                                                         │
//! │  {                                                                      │
//! │    "pizzas":   [ { nombre, precioEntera, precioMedia,                  │
//! │                    descripcion, imagen, categoria }, ... ],             │
//! │    "bebidas":  [ { nombre, precio }, ... ],                             │
//! │    "telefono": "5490000000000"                                          │
//! │  }                                                                      │
//! │                                                                         │
//! │  Wire names stay as existing stores wrote them; Rust names are English.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Normalization
//! Stored documents are not trusted. Every item read passes through
//! [`RawCatalogItem`], which guarantees:
//! - both prices present and non-negative (missing whole price falls back to
//!   the legacy `precio` field, then to 0; missing half price copies whole)
//! - category is one of the three known kinds (`"pizza"` otherwise)
//! - text fields are strings, never null

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Category;
use crate::validation::{parse_optional_price, parse_price, validate_name, validate_phone};

// =============================================================================
// Catalog Item
// =============================================================================

/// A sellable menu entry.
///
/// `name` identifies the item within its category. Prices are snapshotted
/// into the cart when added, so editing an item never changes a line
/// already in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCatalogItem")]
pub struct CatalogItem {
    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "precioEntera")]
    pub whole_price: Money,

    /// Same as `whole_price` unless the item sells halves cheaper.
    #[serde(rename = "precioMedia")]
    pub half_price: Money,

    #[serde(rename = "descripcion")]
    pub description: String,

    /// Image reference (URL or data URI). Empty means "show a placeholder".
    #[serde(rename = "imagen")]
    pub image_ref: String,

    #[serde(rename = "categoria")]
    pub category: Category,
}

impl CatalogItem {
    /// Whether the item has an image of its own.
    pub fn has_image(&self) -> bool {
        !self.image_ref.trim().is_empty()
    }
}

/// An item exactly as a stored document may hold it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCatalogItem {
    nombre: Option<Value>,
    #[serde(rename = "precioEntera")]
    precio_entera: Option<Value>,
    #[serde(rename = "precioMedia")]
    precio_media: Option<Value>,
    /// Legacy single price, from before halves were priced separately.
    precio: Option<Value>,
    descripcion: Option<Value>,
    imagen: Option<Value>,
    categoria: Option<Value>,
}

impl From<RawCatalogItem> for CatalogItem {
    fn from(raw: RawCatalogItem) -> Self {
        let whole_price = lenient_money(raw.precio_entera.as_ref())
            .or_else(|| lenient_money(raw.precio.as_ref()))
            .unwrap_or_else(Money::zero)
            .clamp_non_negative();
        let half_price = lenient_money(raw.precio_media.as_ref())
            .map(Money::clamp_non_negative)
            .unwrap_or(whole_price);

        CatalogItem {
            name: lenient_text(raw.nombre.as_ref()),
            whole_price,
            half_price,
            description: lenient_text(raw.descripcion.as_ref()),
            image_ref: lenient_text(raw.imagen.as_ref()),
            category: Category::from_raw(&lenient_text(raw.categoria.as_ref())),
        }
    }
}

// =============================================================================
// Beverage Item
// =============================================================================

/// A drink. Drinks have one price and are never halved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBeverageItem")]
pub struct BeverageItem {
    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "precio")]
    pub price: Money,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawBeverageItem {
    nombre: Option<Value>,
    precio: Option<Value>,
}

impl From<RawBeverageItem> for BeverageItem {
    fn from(raw: RawBeverageItem) -> Self {
        BeverageItem {
            name: lenient_text(raw.nombre.as_ref()),
            price: lenient_money(raw.precio.as_ref())
                .unwrap_or_else(Money::zero)
                .clamp_non_negative(),
        }
    }
}

// =============================================================================
// Lenient Field Readers
// =============================================================================

/// Reads a price that may have been stored as a number or a string.
///
/// Returns `None` for anything that is not a finite number.
fn lenient_money(value: Option<&Value>) -> Option<Money> {
    match value? {
        Value::Number(n) => Money::parse(&n.to_string()).ok(),
        Value::String(s) => Money::parse(s).ok(),
        _ => None,
    }
}

fn lenient_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn lenient_phone<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(lenient_text(value.as_ref()))
}

// =============================================================================
// Admin Edit Inputs
// =============================================================================

/// Raw text from the item form of the admin screen.
///
/// Kept as text so validation happens in one place, before any mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub whole_price: String,
    /// Blank or unreadable means "same as whole".
    pub half_price: String,
    pub description: String,
    pub category: String,
}

/// What to do with an item's image when saving an edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageEdit {
    #[default]
    Keep,
    Replace(String),
    Remove,
}

struct ValidItem {
    name: String,
    whole_price: Money,
    half_price: Money,
    description: String,
    category: Category,
}

impl ItemDraft {
    fn validate(&self) -> CoreResult<ValidItem> {
        let name = validate_name("name", &self.name)?;
        let whole_price = parse_price("whole price", &self.whole_price)?;
        let half_price = parse_optional_price("half price", &self.half_price, whole_price)?;

        Ok(ValidItem {
            name,
            whole_price,
            half_price,
            description: self.description.trim().to_string(),
            category: Category::from_raw(&self.category),
        })
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Items, drinks and the contact phone, loaded and saved as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "pizzas", default)]
    pub items: Vec<CatalogItem>,

    #[serde(rename = "bebidas", default)]
    pub beverages: Vec<BeverageItem>,

    #[serde(rename = "telefono", default, deserialize_with = "lenient_phone")]
    pub phone: String,
}

impl Catalog {
    /// The minimal menu a fresh install starts with.
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::catalog::Catalog;
    /// use slice_core::types::Category;
    ///
    /// let catalog = Catalog::seed_defaults("5490000000000");
    /// assert_eq!(catalog.items.len(), 2);
    /// assert_eq!(catalog.items[1].category, Category::Promo);
    /// ```
    pub fn seed_defaults(phone: &str) -> Self {
        Catalog {
            items: vec![
                CatalogItem {
                    name: "Napolitana".to_string(),
                    whole_price: Money::from_units(5000),
                    half_price: Money::from_units(3000),
                    description: "Fresh tomato, garlic.".to_string(),
                    image_ref: String::new(),
                    category: Category::Standard,
                },
                CatalogItem {
                    name: "Promo 1".to_string(),
                    whole_price: Money::from_units(12000),
                    half_price: Money::from_units(12000),
                    description: "2 Muzzarellas".to_string(),
                    image_ref: String::new(),
                    category: Category::Promo,
                },
            ],
            beverages: Vec::new(),
            phone: phone.to_string(),
        }
    }

    /// True when there is nothing to sell and no phone.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.beverages.is_empty() && self.phone.trim().is_empty()
    }

    /// Fills in what a partially populated document is missing.
    ///
    /// No items → the seed items. No phone → `default_phone`. Drinks are
    /// left alone: a shop without drinks is valid.
    pub fn fill_missing(&mut self, default_phone: &str) {
        if self.items.is_empty() {
            self.items = Catalog::seed_defaults(default_phone).items;
        }
        if self.phone.trim().is_empty() {
            self.phone = default_phone.to_string();
        }
    }

    /// Items of one category, in catalog order.
    pub fn items_in(&self, category: Category) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(move |i| i.category == category)
    }

    /// Items that may be picked inside a promotion (standard and calzone).
    pub fn eligible_promo_items(&self) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|i| i.category.is_promo_eligible())
            .collect()
    }

    /// Looks up an item by 0-based position.
    pub fn item(&self, index: usize) -> CoreResult<&CatalogItem> {
        self.items.get(index).ok_or(CoreError::ItemNotFound {
            kind: "Item",
            position: index + 1,
        })
    }

    /// Looks up a drink by 0-based position.
    pub fn beverage(&self, index: usize) -> CoreResult<&BeverageItem> {
        self.beverages.get(index).ok_or(CoreError::ItemNotFound {
            kind: "Drink",
            position: index + 1,
        })
    }

    // -------------------------------------------------------------------------
    // Admin edits
    // -------------------------------------------------------------------------

    /// Appends a new item. `image_ref` may be empty.
    pub fn add_item(&mut self, draft: &ItemDraft, image_ref: Option<String>) -> CoreResult<()> {
        let valid = draft.validate()?;
        debug!(name = %valid.name, category = %valid.category, "Adding catalog item");

        self.items.push(CatalogItem {
            name: valid.name,
            whole_price: valid.whole_price,
            half_price: valid.half_price,
            description: valid.description,
            image_ref: image_ref.unwrap_or_default(),
            category: valid.category,
        });
        Ok(())
    }

    /// Replaces an item's fields from the form, applying the image edit.
    pub fn update_item(&mut self, index: usize, draft: &ItemDraft, image: ImageEdit) -> CoreResult<()> {
        let valid = draft.validate()?;
        let item = self.items.get_mut(index).ok_or(CoreError::ItemNotFound {
            kind: "Item",
            position: index + 1,
        })?;
        debug!(index, name = %valid.name, "Updating catalog item");

        item.name = valid.name;
        item.whole_price = valid.whole_price;
        item.half_price = valid.half_price;
        item.description = valid.description;
        item.category = valid.category;
        match image {
            ImageEdit::Keep => {}
            ImageEdit::Replace(image_ref) => item.image_ref = image_ref,
            ImageEdit::Remove => item.image_ref.clear(),
        }
        Ok(())
    }

    /// Removes an item and returns it.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<CatalogItem> {
        if index >= self.items.len() {
            return Err(CoreError::ItemNotFound {
                kind: "Item",
                position: index + 1,
            });
        }
        let removed = self.items.remove(index);
        debug!(name = %removed.name, "Removed catalog item");
        Ok(removed)
    }

    /// Drops an item's image so the placeholder is shown.
    pub fn clear_item_image(&mut self, index: usize) -> CoreResult<()> {
        let item = self.items.get_mut(index).ok_or(CoreError::ItemNotFound {
            kind: "Item",
            position: index + 1,
        })?;
        item.image_ref.clear();
        Ok(())
    }

    /// Appends a drink.
    pub fn add_beverage(&mut self, name: &str, price: &str) -> CoreResult<()> {
        let name = validate_name("drink name", name)?;
        let price = parse_price("drink price", price)?;
        debug!(name = %name, %price, "Adding drink");

        self.beverages.push(BeverageItem { name, price });
        Ok(())
    }

    /// Renames and reprices a drink.
    pub fn update_beverage(&mut self, index: usize, name: &str, price: &str) -> CoreResult<()> {
        let name = validate_name("drink name", name)?;
        let price = parse_price("drink price", price)?;
        let beverage = self.beverages.get_mut(index).ok_or(CoreError::ItemNotFound {
            kind: "Drink",
            position: index + 1,
        })?;

        beverage.name = name;
        beverage.price = price;
        Ok(())
    }

    /// Removes a drink and returns it.
    pub fn remove_beverage(&mut self, index: usize) -> CoreResult<BeverageItem> {
        if index >= self.beverages.len() {
            return Err(CoreError::ItemNotFound {
                kind: "Drink",
                position: index + 1,
            });
        }
        Ok(self.beverages.remove(index))
    }

    /// Sets the contact phone (digits only after validation).
    pub fn set_phone(&mut self, input: &str) -> CoreResult<()> {
        self.phone = validate_phone(input)?;
        Ok(())
    }
}

// =============================================================================
// Admin Gate
// =============================================================================

/// The shared-PIN lock in front of the admin screen.
///
/// One static PIN for everyone, no lockout after failures.
#[derive(Debug, Clone)]
pub struct AdminGate {
    pin: String,
    unlocked: bool,
}

impl AdminGate {
    pub fn new(pin: impl Into<String>) -> Self {
        AdminGate {
            pin: pin.into(),
            unlocked: false,
        }
    }

    /// Unlocks when `attempt` matches the PIN (surrounding spaces ignored).
    pub fn unlock(&mut self, attempt: &str) -> CoreResult<()> {
        if attempt.trim() == self.pin {
            self.unlocked = true;
            Ok(())
        } else {
            self.unlocked = false;
            Err(CoreError::WrongPin)
        }
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use serde_json::json;

    fn draft(name: &str, whole: &str, half: &str, category: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            whole_price: whole.to_string(),
            half_price: half.to_string(),
            description: String::new(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_normalization_defaults() {
        let item: CatalogItem = serde_json::from_value(json!({
            "nombre": "Fugazzeta",
            "precioEntera": 6000,
            "categoria": "CALZONE"
        }))
        .unwrap();

        assert_eq!(item.whole_price, Money::from_units(6000));
        assert_eq!(item.half_price, Money::from_units(6000));
        assert_eq!(item.category, Category::Calzone);
        assert_eq!(item.description, "");
        assert!(!item.has_image());
    }

    #[test]
    fn test_normalization_legacy_price_and_garbage() {
        let legacy: CatalogItem =
            serde_json::from_value(json!({"nombre": "Old", "precio": "4500"})).unwrap();
        assert_eq!(legacy.whole_price, Money::from_units(4500));
        assert_eq!(legacy.half_price, Money::from_units(4500));
        assert_eq!(legacy.category, Category::Standard);

        let garbage: CatalogItem = serde_json::from_value(json!({
            "nombre": "Broken",
            "precioEntera": "abc",
            "precioMedia": -20,
            "categoria": "empanada"
        }))
        .unwrap();
        assert_eq!(garbage.whole_price, Money::zero());
        assert_eq!(garbage.half_price, Money::zero());
        assert_eq!(garbage.category, Category::Standard);
    }

    #[test]
    fn test_document_round_trip_keeps_wire_names() {
        let catalog = Catalog::seed_defaults("5491100000000");
        let value = serde_json::to_value(&catalog).unwrap();

        assert!(value.get("pizzas").is_some());
        assert!(value.get("bebidas").is_some());
        assert_eq!(value["telefono"], "5491100000000");
        assert_eq!(value["pizzas"][1]["categoria"], "promo");

        let back: Catalog = serde_json::from_value(value).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn test_numeric_phone_is_read_as_text() {
        let catalog: Catalog =
            serde_json::from_value(json!({"pizzas": [], "telefono": 5491112345678u64})).unwrap();
        assert_eq!(catalog.phone, "5491112345678");
        assert!(catalog.beverages.is_empty());
    }

    #[test]
    fn test_fill_missing() {
        let mut catalog = Catalog::default();
        assert!(catalog.is_empty());

        catalog.fill_missing("5490000000000");
        assert_eq!(catalog.items.len(), 2);
        assert_eq!(catalog.phone, "5490000000000");
    }

    #[test]
    fn test_eligible_promo_items_excludes_promos() {
        let mut catalog = Catalog::seed_defaults("1");
        catalog
            .add_item(&draft("Calzone Jamón", "7000", "", "calzone"), None)
            .unwrap();

        let eligible: Vec<&str> = catalog
            .eligible_promo_items()
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(eligible, vec!["Napolitana", "Calzone Jamón"]);
        assert_eq!(catalog.items_in(Category::Promo).count(), 1);
    }

    #[test]
    fn test_add_item_validates_before_mutation() {
        let mut catalog = Catalog::default();

        let err = catalog.add_item(&draft("", "5000", "", "pizza"), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));

        let err = catalog.add_item(&draft("Muzza", "cheap", "", "pizza"), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidFormat { .. })
        ));

        let err = catalog.add_item(&draft("Muzza", "-1", "", "pizza"), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Negative { .. })
        ));

        assert!(catalog.items.is_empty());
    }

    #[test]
    fn test_add_item_half_price_falls_back() {
        let mut catalog = Catalog::default();
        catalog.add_item(&draft("Muzza", "5000", "", "Pizza"), None).unwrap();
        catalog
            .add_item(&draft("Fuga", "6000", "3500", "pizza"), Some("data:image/png;base64,AA".into()))
            .unwrap();

        assert_eq!(catalog.items[0].half_price, Money::from_units(5000));
        assert_eq!(catalog.items[1].half_price, Money::from_units(3500));
        assert!(catalog.items[1].has_image());
    }

    #[test]
    fn test_update_item_image_edits() {
        let mut catalog = Catalog::default();
        catalog
            .add_item(&draft("Muzza", "5000", "", "pizza"), Some("img-a".into()))
            .unwrap();

        catalog
            .update_item(0, &draft("Muzza", "5500", "3000", "pizza"), ImageEdit::Keep)
            .unwrap();
        assert_eq!(catalog.items[0].image_ref, "img-a");
        assert_eq!(catalog.items[0].whole_price, Money::from_units(5500));

        catalog
            .update_item(0, &draft("Muzza", "5500", "", "pizza"), ImageEdit::Replace("img-b".into()))
            .unwrap();
        assert_eq!(catalog.items[0].image_ref, "img-b");

        catalog
            .update_item(0, &draft("Muzza", "5500", "", "pizza"), ImageEdit::Remove)
            .unwrap();
        assert!(!catalog.items[0].has_image());

        let err = catalog
            .update_item(5, &draft("X", "1", "", "pizza"), ImageEdit::Keep)
            .unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound { position: 6, .. }));
    }

    #[test]
    fn test_remove_and_clear_image() {
        let mut catalog = Catalog::seed_defaults("1");
        catalog.items[0].image_ref = "img".into();
        catalog.clear_item_image(0).unwrap();
        assert!(!catalog.items[0].has_image());

        let removed = catalog.remove_item(0).unwrap();
        assert_eq!(removed.name, "Napolitana");
        assert_eq!(catalog.items.len(), 1);
        assert!(catalog.remove_item(3).is_err());
    }

    #[test]
    fn test_beverage_admin() {
        let mut catalog = Catalog::default();
        catalog.add_beverage("Coca 1.5L", "2500").unwrap();
        assert!(catalog.add_beverage("Sprite", "").is_err());
        assert_eq!(catalog.beverages.len(), 1);

        catalog.update_beverage(0, "Coca 2L", "3000").unwrap();
        assert_eq!(catalog.beverage(0).unwrap().price, Money::from_units(3000));
        assert!(catalog.update_beverage(1, "X", "1").is_err());

        let removed = catalog.remove_beverage(0).unwrap();
        assert_eq!(removed.name, "Coca 2L");
        assert!(catalog.beverage(0).is_err());
    }

    #[test]
    fn test_set_phone() {
        let mut catalog = Catalog::default();
        catalog.set_phone("+54 9 383 428-0000").unwrap();
        assert_eq!(catalog.phone, "5493834280000");
        assert!(catalog.set_phone("").is_err());
        assert_eq!(catalog.phone, "5493834280000");
    }

    #[test]
    fn test_admin_gate() {
        let mut gate = AdminGate::new("4321");
        assert!(!gate.is_unlocked());

        assert!(matches!(gate.unlock("1234"), Err(CoreError::WrongPin)));
        assert!(!gate.is_unlocked());

        gate.unlock(" 4321 ").unwrap();
        assert!(gate.is_unlocked());

        gate.lock();
        assert!(!gate.is_unlocked());
    }
}
