//! Item domain types - validated at construction
//!
//! Request bodies arrive as loose JSON objects; the constructors here turn
//! them into typed values or a `ValidationError` before any SQL runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;

use super::params::{is_on_token, parse_leading_int};
use super::ValidationError;

/// Maximum length for item names, in characters (column is VARCHAR(255))
pub const MAX_NOME_ITEM_LEN: usize = 255;

/// Canonical form of an item name.
///
/// Unicode canonical composition (NFC), whitespace runs collapsed to a
/// single space, leading/trailing whitespace removed.
///
/// # Example
/// ```
/// use estoque_server::models::normalize_name;
///
/// assert_eq!(normalize_name("  Café   Moído "), "Café Moído");
/// assert_eq!(normalize_name("\t\n"), "");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Coerce a JSON value into the `ativo` flag.
///
/// - booleans as is
/// - numbers: non-zero is true
/// - strings: `1`, `true`, `on`, `yes` (trimmed, case-insensitive)
/// - anything else is false
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => is_on_token(s),
        _ => false,
    }
}

/// Normalized search term, or `None` when the query is blank.
pub fn normalize_search(q: &str) -> Option<String> {
    let term = normalize_name(q);
    (!term.is_empty()).then_some(term)
}

/// Validated, normalized item name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemName(String);

impl ItemName {
    /// Create a new item name from raw input.
    ///
    /// # Rules
    /// - Normalized with [`normalize_name`]
    /// - Non-empty after normalization
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use estoque_server::models::ItemName;
    ///
    /// assert_eq!(ItemName::new(" Arroz  5kg ").unwrap().as_str(), "Arroz 5kg");
    /// assert!(ItemName::new("   ").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let name = normalize_name(raw);

        if name.is_empty() {
            return Err(ValidationError::Required { field: "nome_item" });
        }

        if name.chars().count() > MAX_NOME_ITEM_LEN {
            return Err(ValidationError::TooLong {
                field: "nome_item",
                max: MAX_NOME_ITEM_LEN,
            });
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Item primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Read `id_item` from a request body.
    ///
    /// Accepts JSON integers (fractions are truncated) and numeric strings.
    /// Missing or `null` is `Required`; zero, negatives and garbage are
    /// `Invalid`.
    pub fn from_json(value: Option<&Value>) -> Result<Self, ValidationError> {
        let parsed = match value {
            None | Some(Value::Null) => {
                return Err(ValidationError::Required { field: "id_item" })
            }
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => parse_leading_int(s),
            Some(_) => None,
        };

        match parsed {
            Some(id) if id > 0 => Ok(Self(id as u64)),
            _ => Err(ValidationError::Invalid { field: "id_item" }),
        }
    }
}

/// Validated create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub nome_item: ItemName,
    pub ativo: bool,
}

impl NewItem {
    /// Build from a POST body. `ativo` defaults to active when absent or null.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let nome_item = match body.get("nome_item") {
            None | Some(Value::Null) => {
                return Err(ValidationError::Required { field: "nome_item" })
            }
            Some(Value::String(s)) => ItemName::new(s)?,
            Some(_) => return Err(ValidationError::NotAString { field: "nome_item" }),
        };

        let ativo = body
            .get("ativo")
            .filter(|v| !v.is_null())
            .map_or(true, coerce_flag);

        Ok(Self { nome_item, ativo })
    }
}

/// Validated partial update
///
/// Only fields present in the body are set; at least one must be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPatch {
    pub id_item: ItemId,
    pub nome_item: Option<ItemName>,
    pub ativo: Option<bool>,
}

impl ItemPatch {
    /// Build from a PUT body.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let id_item = ItemId::from_json(body.get("id_item"))?;

        let nome_item = match body.get("nome_item") {
            None => None,
            Some(Value::String(s)) => Some(ItemName::new(s)?),
            Some(_) => return Err(ValidationError::NotAString { field: "nome_item" }),
        };

        let ativo = body.get("ativo").map(coerce_flag);

        if nome_item.is_none() && ativo.is_none() {
            return Err(ValidationError::NothingToUpdate);
        }

        Ok(Self {
            id_item,
            nome_item,
            ativo,
        })
    }
}

/// Item record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id_item: ItemId,
    pub nome_item: String,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Whole-table metadata reported alongside every listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableMeta {
    pub total: i64,
    pub last_updated: Option<DateTime<Utc>>,
}
