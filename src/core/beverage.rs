//! Beverage business logic - The drinks menu.
//!
//! Prices are accepted as decimals and stored as minor units.

use crate::{
    core::billing,
    entities::{Beverage, beverage},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Retrieves the whole menu ordered alphabetically by name.
pub async fn get_all_beverages<C>(db: &C) -> Result<Vec<beverage::Model>>
where
    C: ConnectionTrait,
{
    Beverage::find()
        .order_by_asc(beverage::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a beverage by its unique ID.
pub async fn get_beverage_by_id<C>(db: &C, beverage_id: i64) -> Result<Option<beverage::Model>>
where
    C: ConnectionTrait,
{
    Beverage::find_by_id(beverage_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a beverage by its exact menu name.
pub async fn get_beverage_by_name<C>(db: &C, name: &str) -> Result<Option<beverage::Model>>
where
    C: ConnectionTrait,
{
    Beverage::find()
        .filter(beverage::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a beverage to the menu.
///
/// # Errors
/// - [`Error::InvalidInput`] for an empty name or a negative price
/// - [`Error::Database`] if a beverage with the same name already exists
pub async fn create_beverage<C>(db: &C, name: &str, price: Decimal) -> Result<beverage::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_input("beverage name cannot be empty"));
    }
    if price < Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "beverage price cannot be negative, got {price}"
        )));
    }

    let beverage = beverage::ActiveModel {
        name: Set(name.to_string()),
        price_cents: Set(billing::to_cents(price)?),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Added beverage '{}' at {}",
        beverage.name,
        billing::from_cents(beverage.price_cents)
    );
    Ok(beverage)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_beverage_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_beverage(&db, "", dec!(20)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidInput { message: _ }
        ));

        let result = create_beverage(&db, "Tea", dec!(-1)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidInput { message: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_lookup_beverage() -> Result<()> {
        let db = setup_test_db().await?;

        let coffee = create_beverage(&db, " Cold Coffee ", dec!(45.50)).await?;
        assert_eq!(coffee.name, "Cold Coffee");
        assert_eq!(coffee.price_cents, 4550);

        let by_name = get_beverage_by_name(&db, "Cold Coffee").await?.unwrap();
        assert_eq!(by_name, coffee);
        let by_id = get_beverage_by_id(&db, coffee.id).await?.unwrap();
        assert_eq!(by_id, coffee);
        assert!(get_beverage_by_name(&db, "Lassi").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_beverage_name_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_beverage(&db, "Tea").await?;

        let result = create_beverage(&db, "Tea", dec!(15)).await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_menu_sorted_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_beverage(&db, "Water").await?;
        create_test_beverage(&db, "Cola").await?;

        let menu = get_all_beverages(&db).await?;
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].name, "Cola");
        assert_eq!(menu[1].name, "Water");
        Ok(())
    }
}
