//! Menu Item Repository (read path + minimal write path)

use super::{RepoError, RepoResult};
use crate::utils::validation::MAX_NAME_LEN;
use shared::models::{MenuItem, MenuItemCreate, Proportion};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;

const ITEM_COLUMNS: &str = "id, name, description, price, category, day_of_week, schedulable, available, deleted_at, created_at";

#[derive(sqlx::FromRow)]
struct ProportionRow {
    menu_item_id: i64,
    name: String,
    price: f64,
}

/// Base price must equal the cheapest proportion when proportions exist
fn validate_pricing(data: &MenuItemCreate) -> RepoResult<()> {
    if !data.price.is_finite() || data.price < 0.0 {
        return Err(RepoError::Validation(format!(
            "price must be a non-negative number, got {}",
            data.price
        )));
    }
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if data.name.chars().count() > MAX_NAME_LEN {
        return Err(RepoError::Validation(format!(
            "name is too long (max {MAX_NAME_LEN} chars)"
        )));
    }
    let mut seen = std::collections::HashSet::new();
    for p in &data.proportions {
        if p.name.trim().is_empty() || p.name.chars().count() > MAX_NAME_LEN {
            return Err(RepoError::Validation(format!(
                "proportion name must be 1..={MAX_NAME_LEN} chars"
            )));
        }
        if !p.price.is_finite() || p.price < 0.0 {
            return Err(RepoError::Validation(format!(
                "proportion '{}' has an invalid price {}",
                p.name, p.price
            )));
        }
        if !seen.insert(p.name.as_str()) {
            return Err(RepoError::Validation(format!(
                "duplicate proportion '{}'",
                p.name
            )));
        }
    }
    if let Some(min) = data.proportions.iter().map(|p| p.price).reduce(f64::min)
        && shared::util::to_decimal(min) != shared::util::to_decimal(data.price)
    {
        return Err(RepoError::Validation(format!(
            "base price {} must equal the lowest proportion price {}",
            data.price, min
        )));
    }
    Ok(())
}

/// Attach proportions to loaded items
async fn attach_proportions(pool: &SqlitePool, items: &mut [MenuItem]) -> RepoResult<()> {
    if items.is_empty() {
        return Ok(());
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT menu_item_id, name, price FROM menu_item_proportion WHERE menu_item_id IN (",
    );
    let mut ids = qb.separated(", ");
    for item in items.iter() {
        ids.push_bind(item.id);
    }
    qb.push(") ORDER BY menu_item_id, display_order, id");

    let rows: Vec<ProportionRow> = qb.build_query_as().fetch_all(pool).await?;
    let mut by_item: HashMap<i64, Vec<Proportion>> = HashMap::new();
    for row in rows {
        by_item.entry(row.menu_item_id).or_default().push(Proportion {
            name: row.name,
            price: row.price,
        });
    }
    for item in items.iter_mut() {
        item.proportions = by_item.remove(&item.id).unwrap_or_default();
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM menu_item WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match item {
        Some(item) => {
            let mut items = [item];
            attach_proportions(pool, &mut items).await?;
            let [item] = items;
            Ok(Some(item))
        }
        None => Ok(None),
    }
}

/// Items by id, including unavailable and soft-deleted ones
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM menu_item WHERE id IN ("));
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(*id);
    }
    qb.push(")");

    let mut items: Vec<MenuItem> = qb.build_query_as().fetch_all(pool).await?;
    attach_proportions(pool, &mut items).await?;
    Ok(items)
}

/// Schedulable, non-deleted items ordered by category, weekday and name
pub async fn find_schedulable(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let mut items = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM menu_item WHERE schedulable = 1 AND deleted_at IS NULL ORDER BY category, day_of_week, name, id"
    ))
    .fetch_all(pool)
    .await?;
    attach_proportions(pool, &mut items).await?;
    Ok(items)
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate, now: i64) -> RepoResult<MenuItem> {
    validate_pricing(&data)?;

    let mut tx = pool.begin().await?;
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_item (name, description, price, category, day_of_week, schedulable, available, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category)
    .bind(data.day_of_week)
    .bind(data.schedulable)
    .bind(data.available)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    insert_proportions(&mut tx, id, &data.proportions).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Replace an item's editable fields and proportions
pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemCreate) -> RepoResult<MenuItem> {
    validate_pricing(&data)?;

    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE menu_item SET name = ?, description = ?, price = ?, category = ?, day_of_week = ?, schedulable = ?, available = ? WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category)
    .bind(data.day_of_week)
    .bind(data.schedulable)
    .bind(data.available)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }

    sqlx::query("DELETE FROM menu_item_proportion WHERE menu_item_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_proportions(&mut tx, id, &data.proportions).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Soft delete: the row stays so historical order items keep their reference
pub async fn soft_delete(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE menu_item SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

async fn insert_proportions(
    tx: &mut sqlx::SqliteConnection,
    menu_item_id: i64,
    proportions: &[Proportion],
) -> RepoResult<()> {
    for (order, p) in proportions.iter().enumerate() {
        sqlx::query(
            "INSERT INTO menu_item_proportion (menu_item_id, name, price, display_order) VALUES (?, ?, ?, ?)",
        )
        .bind(menu_item_id)
        .bind(&p.name)
        .bind(p.price)
        .bind(order as i64)
        .execute(&mut *tx)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{DayOfWeek, MealCategory};

    fn payload(name: &str, price: f64, proportions: Vec<(&str, f64)>) -> MenuItemCreate {
        MenuItemCreate {
            name: name.to_string(),
            description: None,
            price,
            category: MealCategory::Lunch,
            day_of_week: Some(DayOfWeek::Monday),
            schedulable: true,
            available: true,
            proportions: proportions
                .into_iter()
                .map(|(n, p)| Proportion { name: n.to_string(), price: p })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_create_and_load_with_proportions() {
        let db = DbService::in_memory().await.unwrap();
        let item = create(
            &db.pool,
            payload("Thali", 30.0, vec![("half", 30.0), ("full", 50.0)]),
            1,
        )
        .await
        .unwrap();

        assert_eq!(item.category, MealCategory::Lunch);
        assert_eq!(item.day_of_week, Some(DayOfWeek::Monday));
        assert_eq!(item.proportions.len(), 2);
        assert_eq!(item.proportions[0].name, "half");
        assert_eq!(item.proportion("full").map(|p| p.price), Some(50.0));
    }

    #[tokio::test]
    async fn test_base_price_must_match_min_proportion() {
        let db = DbService::in_memory().await.unwrap();
        let err = create(
            &db.pool,
            payload("Thali", 50.0, vec![("half", 30.0), ("full", 50.0)]),
            1,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_find_schedulable_skips_deleted() {
        let db = DbService::in_memory().await.unwrap();
        let a = create(&db.pool, payload("Rajma", 40.0, vec![]), 1).await.unwrap();
        let b = create(&db.pool, payload("Kadhi", 40.0, vec![]), 1).await.unwrap();
        assert!(soft_delete(&db.pool, b.id, 2).await.unwrap());

        let items = find_schedulable(&db.pool).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, a.id);

        // Deleted rows stay readable by id
        let found = find_by_ids(&db.pool, &[a.id, b.id]).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|i| i.is_deleted()));
    }
}
