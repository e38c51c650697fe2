//! # Customer Repository
//!
//! Registry CRUD for customers. A customer who owns sales can't be deleted.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult, LedgerResult};
use crate::pool::begin_immediate;
use tally_core::validation::validate_new_customer;
use tally_core::{CoreError, Customer, NewCustomer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists every customer, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, birth_date, photo_ref
            FROM customers
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, birth_date, photo_ref
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer and returns it with its generated id.
    pub async fn insert(&self, customer: &NewCustomer) -> LedgerResult<Customer> {
        validate_new_customer(customer)?;

        debug!(name = %customer.name, "Inserting customer");

        let name = customer.name.trim().to_string();
        let phone = normalize(&customer.phone);

        let result = sqlx::query(
            r#"
            INSERT INTO customers (name, phone, birth_date, photo_ref)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&name)
        .bind(&phone)
        .bind(customer.birth_date)
        .bind(&customer.photo_ref)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            id: result.last_insert_rowid(),
            name,
            phone,
            birth_date: customer.birth_date,
            photo_ref: customer.photo_ref.clone(),
        })
    }

    /// Updates every field of an existing customer.
    pub async fn update(&self, customer: &Customer) -> LedgerResult<()> {
        let fields = NewCustomer {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            birth_date: customer.birth_date,
            photo_ref: customer.photo_ref.clone(),
        };
        validate_new_customer(&fields)?;

        debug!(id = customer.id, "Updating customer");

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                phone = ?3,
                birth_date = ?4,
                photo_ref = ?5
            WHERE id = ?1
            "#,
        )
        .bind(customer.id)
        .bind(customer.name.trim())
        .bind(normalize(&customer.phone))
        .bind(customer.birth_date)
        .bind(&customer.photo_ref)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", customer.id).into());
        }

        Ok(())
    }

    /// Deletes a customer who owns no sales.
    ///
    /// ## Errors
    /// * `CoreError::CustomerHasSales` - sales still point at the customer
    /// * `DbError::NotFound` - Customer doesn't exist
    pub async fn delete(&self, id: i64) -> LedgerResult<()> {
        let mut tx = begin_immediate(&self.pool).await?;

        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE customer_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if sales > 0 {
            return Err(CoreError::CustomerHasSales {
                customer_id: id,
                sales,
            }
            .into());
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id).into());
        }

        tx.commit().await?;

        debug!(id, "Deleted customer");
        Ok(())
    }

    /// Counts customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Trimmed phone, or `None` when blank.
fn normalize(phone: &Option<String>) -> Option<String> {
    phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Checks a customer row exists on the given connection.
pub(crate) async fn exists(conn: &mut SqliteConnection, id: i64) -> DbResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM customers WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(found.is_some())
}
