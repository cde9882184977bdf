use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use stockkeep_core::{DomainError, DomainResult, Entity};

/// Maximum length (in characters) of product and supplier names.
pub const MAX_NAME_LEN: usize = 63;

/// Inventory item identifier (assigned by the store on creation).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryItemId(pub i32);

impl InventoryItemId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for InventoryItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>()
            .map(Self)
            .map_err(|_| DomainError::validation(format!("invalid inventory item id '{s}'")))
    }
}

/// Whether the supplier of an item is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Enabled,
    Disabled,
}

impl SupplierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            Self::Enabled => Self::Disabled,
            Self::Disabled => Self::Enabled,
        }
    }
}

impl core::fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupplierStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            other => Err(DomainError::validation(format!(
                "supplier_status must be one of: enabled, disabled (got '{other}')"
            ))),
        }
    }
}

/// An inventory record.
///
/// `id` is `None` until the record has been created in a store; after that it
/// never changes. Payload updates (`update_from_json`) only touch the data
/// fields.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: Option<InventoryItemId>,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub restock_threshold: Option<i32>,
    pub supplier_id: i32,
    pub supplier_name: Option<String>,
    pub unit_price: f64,
    pub supplier_status: SupplierStatus,
}

/// Wire shape accepted on create/update. Unknown keys are ignored; `id` is
/// never read from a payload.
#[derive(Debug, Deserialize)]
struct InventoryItemPayload {
    product_id: i32,
    product_name: String,
    quantity: i32,
    #[serde(default)]
    restock_threshold: Option<i32>,
    supplier_id: i32,
    #[serde(default)]
    supplier_name: Option<String>,
    unit_price: f64,
    supplier_status: SupplierStatus,
}

impl InventoryItem {
    /// Build a not-yet-persisted record from a JSON payload.
    pub fn from_json(data: &Value) -> DomainResult<Self> {
        let payload = parse_payload(data)?;
        let item = Self {
            id: None,
            product_id: payload.product_id,
            product_name: payload.product_name,
            quantity: payload.quantity,
            restock_threshold: payload.restock_threshold,
            supplier_id: payload.supplier_id,
            supplier_name: payload.supplier_name,
            unit_price: payload.unit_price,
            supplier_status: payload.supplier_status,
        };
        item.validate()?;
        Ok(item)
    }

    /// Replace every data field from a JSON payload, keeping `id`.
    ///
    /// On error the record is left untouched.
    pub fn update_from_json(&mut self, data: &Value) -> DomainResult<()> {
        let mut replacement = Self::from_json(data)?;
        replacement.id = self.id;
        *self = replacement;
        Ok(())
    }

    /// Wire representation (flat JSON object, `id` is `null` before creation).
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id.map(|id| id.get()),
            "product_id": self.product_id,
            "product_name": self.product_name,
            "quantity": self.quantity,
            "restock_threshold": self.restock_threshold,
            "supplier_id": self.supplier_id,
            "supplier_name": self.supplier_name,
            "unit_price": self.unit_price,
            "supplier_status": self.supplier_status.as_str(),
        })
    }

    /// Flip `supplier_status` between enabled and disabled.
    pub fn toggle_supplier_status(&mut self) {
        self.supplier_status = self.supplier_status.toggled();
    }

    /// Same record carrying a store-assigned identity.
    pub fn with_id(mut self, id: InventoryItemId) -> Self {
        self.id = Some(id);
        self
    }

    /// Check the field constraints that the type system does not encode.
    pub fn validate(&self) -> DomainResult<()> {
        check_name_len("product_name", &self.product_name)?;
        if let Some(name) = &self.supplier_name {
            check_name_len("supplier_name", name)?;
        }
        Ok(())
    }
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

fn parse_payload(data: &Value) -> DomainResult<InventoryItemPayload> {
    if !data.is_object() {
        return Err(DomainError::validation(
            "Invalid InventoryItem: body of request contained bad or no data",
        ));
    }

    InventoryItemPayload::deserialize(data)
        .map_err(|e| DomainError::validation(format!("Invalid InventoryItem: {e}")))
}

fn check_name_len(field: &str, value: &str) -> DomainResult<()> {
    if value.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Invalid InventoryItem: {field} exceeds {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}
