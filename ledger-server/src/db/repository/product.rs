//! Product Repository
//!
//! Products are assembled from three tables (product + sizes +
//! complements); child lists are replaced wholesale on update.

use super::{RepoError, RepoResult};
use shared::models::{
    Product, ProductComplement, ProductComplementInput, ProductCreate, ProductSize,
    ProductSizeInput, ProductUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
    category: Option<String>,
    description: Option<String>,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

fn validate_price(value: f64, field: &str) -> RepoResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RepoError::Validation(format!(
            "{field} must be non-negative: {value}"
        )));
    }
    Ok(())
}

async fn assemble(pool: &SqlitePool, row: ProductRow) -> RepoResult<Product> {
    let sizes = sqlx::query_as::<_, ProductSize>(
        "SELECT id, product_id, name, price FROM product_size WHERE product_id = ? ORDER BY price",
    )
    .bind(row.id)
    .fetch_all(pool)
    .await?;

    let complements = sqlx::query_as::<_, ProductComplement>(
        "SELECT id, product_id, name, price FROM product_complement WHERE product_id = ? ORDER BY name",
    )
    .bind(row.id)
    .fetch_all(pool)
    .await?;

    Ok(Product {
        id: row.id,
        name: row.name,
        price: row.price,
        category: row.category,
        description: row.description,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
        sizes,
        complements,
    })
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, price, category, description, is_active, created_at, updated_at FROM product WHERE is_active = 1 ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    let mut products = Vec::with_capacity(rows.len());
    for row in rows {
        products.push(assemble(pool, row).await?);
    }
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, price, category, description, is_active, created_at, updated_at FROM product WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(assemble(pool, row).await?)),
        None => Ok(None),
    }
}

async fn insert_children(
    conn: &mut SqliteConnection,
    product_id: i64,
    sizes: &[ProductSizeInput],
    complements: &[ProductComplementInput],
) -> RepoResult<()> {
    for size in sizes {
        validate_price(size.price, "size price")?;
        sqlx::query("INSERT INTO product_size (id, product_id, name, price) VALUES (?1, ?2, ?3, ?4)")
            .bind(shared::util::snowflake_id())
            .bind(product_id)
            .bind(&size.name)
            .bind(size.price)
            .execute(&mut *conn)
            .await?;
    }
    for complement in complements {
        validate_price(complement.price, "complement price")?;
        sqlx::query(
            "INSERT INTO product_complement (id, product_id, name, price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(shared::util::snowflake_id())
        .bind(product_id)
        .bind(&complement.name)
        .bind(complement.price)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    validate_price(data.price, "price")?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO product (id, name, price, category, description, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.category)
    .bind(&data.description)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    insert_children(&mut tx, id, &data.sizes, &data.complements).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(price) = data.price {
        validate_price(price, "price")?;
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), price = COALESCE(?2, price), category = COALESCE(?3, category), description = COALESCE(?4, description), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }

    if let Some(sizes) = &data.sizes {
        sqlx::query("DELETE FROM product_size WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_children(&mut tx, id, sizes, &[]).await?;
    }
    if let Some(complements) = &data.complements {
        sqlx::query("DELETE FROM product_complement WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_children(&mut tx, id, &[], complements).await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE product SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}
