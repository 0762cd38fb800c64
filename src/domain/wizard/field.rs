//! Wizard Field Descriptors
//!
//! The normalized shape of a collectible form field, independent of which
//! provider supplied it. Providers return fields in varying fidelity; the
//! normalization pass here gives the wizard a single, deduplicated,
//! address-collapsed list to walk.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Widget hint for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Email,
    Phone,
    Date,
    Ssn,
    Currency,
    Multiline,
}

impl InputKind {
    /// Wire string sent to the client as `inputType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Ssn => "ssn",
            Self::Currency => "currency",
            Self::Multiline => "multiline",
        }
    }

    /// Map a provider's free-form type hint onto a widget kind.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_lowercase().as_str() {
            "email" => Self::Email,
            "phone" | "tel" => Self::Phone,
            "date" | "dob" => Self::Date,
            "ssn" => Self::Ssn,
            "currency" | "money" | "number" => Self::Currency,
            "multiline" | "textarea" | "address" => Self::Multiline,
            _ => Self::Text,
        }
    }
}

/// One field the wizard will prompt for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Stable identifier, echoed back with the user's answer.
    pub id: String,
    /// Human prompt label.
    pub label: String,
    /// Widget hint for the client.
    pub input_kind: InputKind,
    /// Known-on-file value offered for confirmation.
    pub prefill: Option<String>,
}

impl FieldDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, input_kind: InputKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            input_kind,
            prefill: None,
        }
    }

    pub fn with_prefill(mut self, prefill: impl Into<String>) -> Self {
        self.prefill = Some(prefill.into());
        self
    }
}

/// Collapsed address field id.
pub const ADDRESS_BLOCK_ID: &str = "addressBlock";

/// What an address part id contributes to the collapsed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressRole {
    Street,
    City,
    State,
    Zip,
}

impl AddressRole {
    fn of(field_id: &str) -> Option<Self> {
        match field_id {
            "addressLine1" | "addressLine2" => Some(Self::Street),
            "city" => Some(Self::City),
            "state" => Some(Self::State),
            "zip" | "zipCode" | "postalCode" => Some(Self::Zip),
            _ => None,
        }
    }
}

/// Address parts gathered while normalizing, keyed by role so the
/// collapsed prefill can put the locality on one line.
#[derive(Debug, Default)]
struct AddressParts {
    streets: Vec<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
}

impl AddressParts {
    fn record(&mut self, role: AddressRole, prefill: Option<&str>) {
        let Some(value) = prefill.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        let value = value.to_string();
        match role {
            AddressRole::Street => self.streets.push(value),
            AddressRole::City => self.city = self.city.take().or(Some(value)),
            AddressRole::State => self.state = self.state.take().or(Some(value)),
            AddressRole::Zip => self.zip = self.zip.take().or(Some(value)),
        }
    }

    /// Street lines first, then `"city, state zip"` with absent parts
    /// omitted.
    fn into_prefill(self) -> Option<String> {
        let mut lines = self.streets;

        let region = match (self.state, self.zip) {
            (Some(state), Some(zip)) => Some(format!("{state} {zip}")),
            (Some(state), None) => Some(state),
            (None, Some(zip)) => Some(zip),
            (None, None) => None,
        };
        match (self.city, region) {
            (Some(city), Some(region)) => lines.push(format!("{city}, {region}")),
            (Some(city), None) => lines.push(city),
            (None, Some(region)) => lines.push(region),
            (None, None) => {}
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

/// Normalize a provider field list for the wizard.
///
/// Drops fields with empty ids, keeps the first occurrence of a duplicated
/// id, and collapses split address parts into a single multiline block at
/// the position of the first part.
pub fn normalize_fields(raw: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<FieldDescriptor> = Vec::with_capacity(raw.len());
    let mut address = AddressParts::default();
    let mut address_inserted_at: Option<usize> = None;

    for field in raw {
        if field.id.trim().is_empty() || !seen.insert(field.id.clone()) {
            continue;
        }
        if let Some(role) = AddressRole::of(&field.id) {
            address.record(role, field.prefill.as_deref());
            if address_inserted_at.is_none() {
                address_inserted_at = Some(out.len());
            }
            continue;
        }
        out.push(field);
    }

    if let Some(index) = address_inserted_at {
        let mut block = FieldDescriptor::new(ADDRESS_BLOCK_ID, "Address", InputKind::Multiline);
        block.prefill = address.into_prefill();
        out.insert(index, block);
    }

    out
}
