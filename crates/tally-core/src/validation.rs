//! # Validation
//!
//! Field checks run before anything is written. SQLite repeats the ones
//! that matter for stock as CHECK constraints:
//!
//! ```text
//! form input ──► validate_* (here) ──► repository / ledger ──► SQLite
//!                 names, phone,                                 CHECK stock_quantity >= 0
//!                 quantities, prices                            CHECK quantity > 0
//!                                                               FOREIGN KEY ...
//! ```

use crate::error::ValidationError;
use crate::types::{NewCustomer, NewProduct};
use crate::{MAX_ITEM_QUANTITY, MAX_PAYMENT_METHOD_LEN, MAX_PRICE_CENTS};

pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;

/// Area code plus a 9-digit mobile number.
const MAX_PHONE_DIGITS: usize = 11;

fn required_text(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

fn non_negative(field: &'static str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

/// ```rust
/// use tally_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coffee 500g").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required_text("name", name, MAX_NAME_LEN)
}

pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    required_text("customer name", name, MAX_NAME_LEN)
}

/// Digits only, at most 11. Blank is accepted and stored as no phone.
///
/// ```rust
/// use tally_core::validation::validate_phone;
///
/// assert!(validate_phone("11987654321").is_ok());
/// assert!(validate_phone("11-9876").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone",
            reason: "must contain only digits",
        });
    }
    if phone.len() > MAX_PHONE_DIGITS {
        return Err(ValidationError::TooLong {
            field: "phone",
            max: MAX_PHONE_DIGITS,
        });
    }

    Ok(())
}

/// Free text such as "Cash" or "Pix"; may be empty.
pub fn validate_payment_method(method: &str) -> ValidationResult<()> {
    if method.trim().chars().count() > MAX_PAYMENT_METHOD_LEN {
        return Err(ValidationError::TooLong {
            field: "payment method",
            max: MAX_PAYMENT_METHOD_LEN,
        });
    }
    Ok(())
}

/// A line quantity: `1..=MAX_ITEM_QUANTITY`.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::NotPositive { field: "quantity" });
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: "quantity",
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// `0..=MAX_PRICE_CENTS`. Zero is a valid price.
///
/// ```rust
/// use tally_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX / 2).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    non_negative("price", cents)?;
    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::TooLarge {
            field: "price",
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    non_negative("stock quantity", quantity)
}

pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price_cents(product.unit_price_cents)?;
    validate_stock_quantity(product.stock_quantity)
}

pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_customer_name(&customer.name)?;
    match &customer.phone {
        Some(phone) => validate_phone(phone),
        None => Ok(()),
    }
}
