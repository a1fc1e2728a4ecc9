//! Product form: raw text inputs validated and coerced into a payload

use garde::Validate;
use solar_runtime::{Product, ProductPayload};

/// Errors raised before a product payload reaches the backend
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A required field is missing
    #[error("{0}")]
    Invalid(#[from] garde::Report),
    /// A numeric field does not start with a number
    #[error("{field} must be a number, got '{value}'")]
    NotANumber {
        /// Form field name
        field: &'static str,
        /// Rejected input
        value: String,
    },
}

/// Product form as entered by the admin
///
/// Every field is kept as typed text. Ranges are not checked here; the
/// backend owns that validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ProductForm {
    /// Product name
    #[garde(length(min = 1))]
    pub name: String,
    /// Description
    #[garde(length(min = 1))]
    pub description: String,
    /// Unit price as text
    #[garde(length(min = 1))]
    pub price: String,
    /// Category id
    #[garde(length(min = 1))]
    pub category: String,
    /// Image URL, may be empty
    #[garde(skip)]
    pub image: String,
    /// Stock quantity as text
    #[garde(length(min = 1))]
    pub quantity: String,
}

impl ProductForm {
    /// Prefill the form from an existing product for editing
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            category: product.category_id().unwrap_or_default().to_string(),
            image: product.image.clone().unwrap_or_default(),
            quantity: product.quantity.to_string(),
        }
    }

    /// Validate required fields and coerce the numeric ones
    pub fn to_payload(&self) -> Result<ProductPayload, FormError> {
        self.validate()?;

        let price = parse_float(&self.price).ok_or_else(|| FormError::NotANumber {
            field: "price",
            value: self.price.clone(),
        })?;
        let quantity = parse_int(&self.quantity).ok_or_else(|| FormError::NotANumber {
            field: "quantity",
            value: self.quantity.clone(),
        })?;

        Ok(ProductPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            price,
            category: self.category.clone(),
            image: self.image.clone(),
            quantity,
        })
    }
}

/// Parse the longest leading decimal number, ignoring trailing text
///
/// `"12.5kg"` is `12.5`, `" -3e2"` is `-300`, `"abc"` is `None`.
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Parse the leading base-10 integer, ignoring trailing text
///
/// `"5.7"` is `5`, `"12 units"` is `12`, `"x"` is `None`.
pub fn parse_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
