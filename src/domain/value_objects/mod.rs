//! Value objects for variant authoring

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SKU (Stock Keeping Unit) value object
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, SkuError> {
        let value = value.into().trim().to_uppercase();
        if value.is_empty() { return Err(SkuError::Empty); }
        if value.len() > 50 { return Err(SkuError::TooLong); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone)] pub enum SkuError { Empty, TooLong }
impl std::error::Error for SkuError {}
impl fmt::Display for SkuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Empty => write!(f, "SKU empty"), Self::TooLong => write!(f, "SKU too long") }
    }
}

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn usd(amount: Decimal) -> Self { Self::new(amount, "USD") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_negative(&self) -> bool { self.amount < Decimal::ZERO }
}

impl Default for Money { fn default() -> Self { Self::zero("USD") } }

/// One row of a backend attribute value catalog (a color, a size, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue { pub id: i64, pub label: String }

impl AttributeValue {
    pub fn new(id: i64, label: impl Into<String>) -> Self { Self { id, label: label.into() } }
}

/// A named attribute axis with an ordered list of distinct values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDimension { name: String, values: Vec<AttributeValue> }

impl AttributeDimension {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), values: vec![] } }

    pub fn with_values(name: impl Into<String>, values: Vec<AttributeValue>) -> Result<Self, AttributeError> {
        let mut dim = Self::new(name);
        for v in values { dim.push_value(v)?; }
        Ok(dim)
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn values(&self) -> &[AttributeValue] { &self.values }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Appends a value; ids and labels must stay unique within the dimension.
    pub fn push_value(&mut self, value: AttributeValue) -> Result<(), AttributeError> {
        if self.values.iter().any(|v| v.id == value.id || v.label == value.label) {
            return Err(AttributeError::DuplicateValue { dimension: self.name.clone(), id: value.id });
        }
        self.values.push(value);
        Ok(())
    }

    pub fn label_of(&self, id: i64) -> Option<&str> {
        self.values.iter().find(|v| v.id == id).map(|v| v.label.as_str())
    }
}

/// The dimensions configured for one product, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet { dimensions: Vec<AttributeDimension> }

impl AttributeSet {
    pub fn new() -> Self { Self::default() }

    pub fn dimensions(&self) -> &[AttributeDimension] { &self.dimensions }

    pub fn dimension_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }

    pub fn dimension(&self, name: &str) -> Option<&AttributeDimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn add_dimension(&mut self, dimension: AttributeDimension) -> Result<(), AttributeError> {
        if self.dimensions.iter().any(|d| d.name == dimension.name) {
            return Err(AttributeError::DuplicateDimension(dimension.name));
        }
        self.dimensions.push(dimension);
        Ok(())
    }

    pub fn remove_dimension(&mut self, name: &str) {
        self.dimensions.retain(|d| d.name != name);
    }

    /// Appends a freshly created catalog value to an existing dimension.
    pub fn push_value(&mut self, dimension: &str, value: AttributeValue) -> Result<(), AttributeError> {
        let dim = self
            .dimensions
            .iter_mut()
            .find(|d| d.name == dimension)
            .ok_or_else(|| AttributeError::UnknownDimension(dimension.to_string()))?;
        dim.push_value(value)
    }
}

#[derive(Debug, Clone)]
pub enum AttributeError {
    DuplicateDimension(String),
    DuplicateValue { dimension: String, id: i64 },
    UnknownDimension(String),
}
impl std::error::Error for AttributeError {}
impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDimension(name) => write!(f, "Duplicate dimension '{}'", name),
            Self::DuplicateValue { dimension, id } => write!(f, "Duplicate value {} in dimension '{}'", id, dimension),
            Self::UnknownDimension(name) => write!(f, "Unknown dimension '{}'", name),
        }
    }
}
