//! Session business logic - Check-in, beverage orders and checkout.
//!
//! A session moves one way, from active (`check_out` is NULL) to closed. While it
//! is active, beverages can be ordered and the bill can be previewed against the
//! current time. Checkout freezes the bill onto the session row and consumes the
//! player's prepaid balance, all inside one database transaction.

use crate::{
    config::pricing::PricingConfig,
    core::{
        billing::{self, Bill, LineItem},
        player as player_core, recharge,
    },
    entities::{Beverage, Player, Session, SessionItem, beverage, player, session, session_item},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Outcome of a successful checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// The closed session with its stored charges
    pub session: session::Model,
    /// Player who checked out
    pub player: player::Model,
    /// Charges that were persisted
    pub bill: Bill,
    /// Prepaid hours left after the deduction
    pub hours_remaining: Decimal,
}

/// Finds a session by its unique ID.
pub async fn get_session_by_id<C>(db: &C, session_id: i64) -> Result<Option<session::Model>>
where
    C: ConnectionTrait,
{
    Session::find_by_id(session_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_session<C>(db: &C, session_id: i64) -> Result<session::Model>
where
    C: ConnectionTrait,
{
    get_session_by_id(db, session_id)
        .await?
        .ok_or(Error::SessionNotFound { id: session_id })
}

/// Returns the player's open session, if any.
pub async fn get_active_session_for_player<C>(
    db: &C,
    player_id: i64,
) -> Result<Option<session::Model>>
where
    C: ConnectionTrait,
{
    Session::find()
        .filter(session::Column::PlayerId.eq(player_id))
        .filter(session::Column::CheckOut.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

/// All open sessions with their players, longest-running first.
pub async fn get_active_sessions<C>(
    db: &C,
) -> Result<Vec<(session::Model, Option<player::Model>)>>
where
    C: ConnectionTrait,
{
    Session::find()
        .filter(session::Column::CheckOut.is_null())
        .order_by_asc(session::Column::CheckIn)
        .find_also_related(Player)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every session ever recorded with its player, newest check-in first.
pub async fn get_session_logs<C>(db: &C) -> Result<Vec<(session::Model, Option<player::Model>)>>
where
    C: ConnectionTrait,
{
    Session::find()
        .order_by_desc(session::Column::CheckIn)
        .order_by_desc(session::Column::Id)
        .find_also_related(Player)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A player's sessions, newest check-in first.
pub async fn get_sessions_for_player<C>(db: &C, player_id: i64) -> Result<Vec<session::Model>>
where
    C: ConnectionTrait,
{
    Session::find()
        .filter(session::Column::PlayerId.eq(player_id))
        .order_by_desc(session::Column::CheckIn)
        .order_by_desc(session::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Opens a new session for the player.
///
/// # Errors
/// - [`Error::PlayerNotFound`] if the player does not exist
/// - [`Error::ActiveSessionExists`] if the player is already checked in
pub async fn check_in<C>(db: &C, player_id: i64, now: DateTime<Utc>) -> Result<session::Model>
where
    C: ConnectionTrait,
{
    let player = player_core::get_player_by_id(db, player_id)
        .await?
        .ok_or_else(|| Error::PlayerNotFound {
            name: player_id.to_string(),
        })?;

    if let Some(active) = get_active_session_for_player(db, player_id).await? {
        return Err(Error::ActiveSessionExists {
            name: player.name,
            session_id: active.id,
        });
    }

    let session = session::ActiveModel {
        player_id: Set(player_id),
        check_in: Set(now),
        check_out: Set(None),
        elapsed_minutes: Set(None),
        time_charge_cents: Set(None),
        beverage_charge_cents: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("'{}' checked in (session #{})", player.name, session.id);
    Ok(session)
}

/// Finds or registers the player by name and checks them in.
///
/// # Errors
/// See [`player_core::find_or_create_player`] and [`check_in`].
pub async fn check_in_by_name<C>(
    db: &C,
    name: &str,
    now: DateTime<Utc>,
) -> Result<(player::Model, session::Model)>
where
    C: ConnectionTrait,
{
    let player = player_core::find_or_create_player(db, name, now).await?;
    let session = check_in(db, player.id, now).await?;
    Ok((player, session))
}

/// Adds a beverage order to an active session, copying the current menu price.
///
/// # Errors
/// - [`Error::InvalidInput`] if `quantity` is zero
/// - [`Error::SessionNotFound`] / [`Error::BeverageNotFound`] for unknown ids
/// - [`Error::SessionClosed`] if the session has been checked out
pub async fn add_line_item<C>(
    db: &C,
    session_id: i64,
    beverage_id: i64,
    quantity: u32,
) -> Result<session_item::Model>
where
    C: ConnectionTrait,
{
    if quantity == 0 {
        return Err(Error::invalid_input("quantity must be at least 1"));
    }
    let quantity = i32::try_from(quantity)
        .map_err(|_| Error::invalid_input(format!("quantity {quantity} is too large")))?;

    let session = require_session(db, session_id).await?;
    if !session.is_active() {
        return Err(Error::SessionClosed { id: session_id });
    }

    let beverage = Beverage::find_by_id(beverage_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::BeverageNotFound {
            name: beverage_id.to_string(),
        })?;

    let item = session_item::ActiveModel {
        session_id: Set(session_id),
        beverage_id: Set(beverage_id),
        quantity: Set(quantity),
        unit_price_cents: Set(beverage.price_cents),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Session #{}: ordered {} x {}",
        session_id, quantity, beverage.name
    );
    Ok(item)
}

/// Line items of a session in the order they were placed, as the calculator
/// sees them.
pub async fn get_session_line_items<C>(db: &C, session_id: i64) -> Result<Vec<LineItem>>
where
    C: ConnectionTrait,
{
    let items = SessionItem::find()
        .filter(session_item::Column::SessionId.eq(session_id))
        .order_by_asc(session_item::Column::Id)
        .all(db)
        .await?;

    items
        .into_iter()
        .map(|item| {
            let quantity = u32::try_from(item.quantity).map_err(|_| {
                Error::invalid_input(format!(
                    "line item #{} has invalid quantity {}",
                    item.id, item.quantity
                ))
            })?;
            Ok(LineItem {
                unit_price: billing::from_cents(item.unit_price_cents),
                quantity,
            })
        })
        .collect()
}

/// Line items with their beverages for display.
pub async fn get_session_items_with_beverages<C>(
    db: &C,
    session_id: i64,
) -> Result<Vec<(session_item::Model, Option<beverage::Model>)>>
where
    C: ConnectionTrait,
{
    SessionItem::find()
        .filter(session_item::Column::SessionId.eq(session_id))
        .order_by_asc(session_item::Column::Id)
        .find_also_related(Beverage)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Charges frozen onto a closed session; `None` while the session is active.
#[must_use]
pub fn settled_bill(session: &session::Model) -> Option<Bill> {
    let (Some(_), Some(elapsed), Some(time_cents), Some(beverage_cents)) = (
        session.check_out,
        session.elapsed_minutes,
        session.time_charge_cents,
        session.beverage_charge_cents,
    ) else {
        return None;
    };

    let time_charge = billing::from_cents(time_cents);
    let beverage_charge = billing::from_cents(beverage_cents);
    Some(Bill {
        elapsed_minutes: elapsed,
        time_charge,
        beverage_charge,
        total: time_charge + beverage_charge,
    })
}

async fn bill_as_of<C>(
    db: &C,
    session: &session::Model,
    pricing: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<Bill>
where
    C: ConnectionTrait,
{
    let player = player_core::get_player_by_id(db, session.player_id)
        .await?
        .ok_or_else(|| Error::PlayerNotFound {
            name: session.player_id.to_string(),
        })?;

    let elapsed = billing::elapsed_minutes_between(session.check_in, now)?;
    let items = get_session_line_items(db, session.id).await?;
    billing::compute_bill(elapsed, pricing.hourly_rate, player.prepaid_minutes, &items)
}

/// What the session would cost if the player checked out at `now`.
/// Nothing is written and the prepaid balance is not touched.
///
/// # Errors
/// - [`Error::SessionNotFound`] for an unknown id
/// - [`Error::SessionClosed`] if the session has already been checked out
pub async fn preview_bill<C>(
    db: &C,
    session_id: i64,
    pricing: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<Bill>
where
    C: ConnectionTrait,
{
    let session = require_session(db, session_id).await?;
    if !session.is_active() {
        return Err(Error::SessionClosed { id: session_id });
    }
    bill_as_of(db, &session, pricing, now).await
}

/// The bill of any session: the stored charges once closed, otherwise a preview
/// against `now`. Repeated calls on a closed session always agree.
///
/// # Errors
/// [`Error::SessionNotFound`] for an unknown id, or [`Error::Config`] if a closed
/// session is missing its stored charges.
pub async fn session_bill<C>(
    db: &C,
    session_id: i64,
    pricing: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<Bill>
where
    C: ConnectionTrait,
{
    let session = require_session(db, session_id).await?;
    if session.is_active() {
        return bill_as_of(db, &session, pricing, now).await;
    }
    settled_bill(&session).ok_or_else(|| Error::Config {
        message: format!("session #{session_id} is closed but has no stored charges"),
    })
}

/// Total amount due for a session. See [`session_bill`].
pub async fn compute_total<C>(
    db: &C,
    session_id: i64,
    pricing: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    Ok(session_bill(db, session_id, pricing, now).await?.total)
}

/// Closes a session at `now`.
///
/// Inside one transaction this computes the bill against the player's current
/// prepaid balance, stores the charges on the session, and deducts the played
/// time from the balance. The close is conditional on `check_out IS NULL`, so a
/// second checkout of the same session fails instead of billing twice.
///
/// # Errors
/// - [`Error::SessionNotFound`] for an unknown id
/// - [`Error::SessionClosed`] if the session was already checked out
/// - [`Error::InvalidInput`] if `now` is before check-in or the rate is invalid
/// - [`Error::ConcurrentUpdateConflict`] if the balance could not be deducted
pub async fn checkout(
    db: &DatabaseConnection,
    session_id: i64,
    pricing: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<CheckoutReceipt> {
    let txn = db.begin().await?;

    let session = require_session(&txn, session_id).await?;
    if !session.is_active() {
        return Err(Error::SessionClosed { id: session_id });
    }

    let player = Player::find_by_id(session.player_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::PlayerNotFound {
            name: session.player_id.to_string(),
        })?;

    let bill = bill_as_of(&txn, &session, pricing, now).await?;

    let closed = Session::update_many()
        .set(session::ActiveModel {
            check_out: Set(Some(now)),
            elapsed_minutes: Set(Some(bill.elapsed_minutes)),
            time_charge_cents: Set(Some(billing::to_cents(bill.time_charge)?)),
            beverage_charge_cents: Set(Some(billing::to_cents(bill.beverage_charge)?)),
            ..Default::default()
        })
        .filter(session::Column::Id.eq(session_id))
        .filter(session::Column::CheckOut.is_null())
        .exec(&txn)
        .await?;
    if closed.rows_affected == 0 {
        return Err(Error::SessionClosed { id: session_id });
    }

    let hours_remaining =
        recharge::deduct_balance(&txn, player.id, bill.elapsed_minutes).await?;
    let session = require_session(&txn, session_id).await?;

    txn.commit().await?;

    info!(
        "'{}' checked out of session #{} after {}: time {}, beverages {}, total {}",
        player.name,
        session_id,
        billing::format_duration(Some(bill.elapsed_minutes)),
        bill.time_charge,
        bill.beverage_charge,
        bill.total
    );

    Ok(CheckoutReceipt {
        session,
        player,
        bill,
        hours_remaining,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::pricing::RechargePolicy;
    use crate::test_utils::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn evening() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_add_line_item_rejects_zero_quantity() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = add_line_item(&db, 1, 1, 0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidInput { message: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_check_in_rejects_second_active_session() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;

        let first = check_in(&db, player.id, evening()).await?;
        assert!(first.is_active());

        let result = check_in(&db, player.id, evening()).await;
        match result.unwrap_err() {
            Error::ActiveSessionExists { name, session_id } => {
                assert_eq!(name, "Asha");
                assert_eq!(session_id, first.id);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_check_in_unknown_player() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(matches!(
            check_in(&db, 999, evening()).await.unwrap_err(),
            Error::PlayerNotFound { name: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_check_in_by_name_registers_player() -> Result<()> {
        let db = setup_test_db().await?;

        let (player, session) = check_in_by_name(&db, "Dev", evening()).await?;
        assert_eq!(session.player_id, player.id);
        assert_eq!(session.check_in, evening());

        let active = get_active_session_for_player(&db, player.id).await?.unwrap();
        assert_eq!(active.id, session.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_without_prepaid_time() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        let session = check_in(&db, player.id, evening()).await?;

        let receipt = checkout(
            &db,
            session.id,
            &test_pricing(),
            evening() + Duration::minutes(90),
        )
        .await?;

        assert_eq!(receipt.bill.elapsed_minutes, 90);
        assert_eq!(receipt.bill.time_charge, dec!(90.00));
        assert_eq!(receipt.bill.beverage_charge, Decimal::ZERO);
        assert_eq!(receipt.hours_remaining, Decimal::ZERO);
        assert!(!receipt.session.is_active());
        assert_eq!(receipt.session.time_charge_cents, Some(9000));
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_with_partial_prepaid_time_and_beverages() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        set_prepaid_minutes(&db, player.id, 60).await?;
        let coke = create_custom_beverage(&db, "Coke", dec!(20.00)).await?;

        let session = check_in(&db, player.id, evening()).await?;
        add_line_item(&db, session.id, coke.id, 3).await?;

        let receipt = checkout(
            &db,
            session.id,
            &test_pricing(),
            evening() + Duration::minutes(90),
        )
        .await?;

        assert_eq!(receipt.bill.time_charge, dec!(30.00));
        assert_eq!(receipt.bill.beverage_charge, dec!(60.00));
        assert_eq!(receipt.bill.total, dec!(90.00));
        assert_eq!(receipt.hours_remaining, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_fully_covered_deducts_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        set_prepaid_minutes(&db, player.id, 120).await?;
        let session = check_in(&db, player.id, evening()).await?;

        let receipt = checkout(
            &db,
            session.id,
            &test_pricing(),
            evening() + Duration::minutes(30),
        )
        .await?;

        assert_eq!(receipt.bill.time_charge, Decimal::ZERO);
        assert_eq!(receipt.hours_remaining, dec!(1.5));
        let stored = Player::find_by_id(player.id).one(&db).await?.unwrap();
        assert_eq!(stored.prepaid_minutes, 90);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_twice_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        let session = check_in(&db, player.id, evening()).await?;
        let pricing = test_pricing();

        checkout(&db, session.id, &pricing, evening() + Duration::minutes(10)).await?;
        let result = checkout(&db, session.id, &pricing, evening() + Duration::minutes(20)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::SessionClosed { id: _ }
        ));

        let coke = create_test_beverage(&db, "Coke").await?;
        assert!(matches!(
            add_line_item(&db, session.id, coke.id, 1).await.unwrap_err(),
            Error::SessionClosed { id: _ }
        ));

        // Player can start a new session once the old one is closed
        check_in(&db, player.id, evening() + Duration::minutes(30)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_before_check_in_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        let session = check_in(&db, player.id, evening()).await?;

        let result = checkout(
            &db,
            session.id,
            &test_pricing(),
            evening() - Duration::minutes(5),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidInput { message: _ }
        ));

        // Rolled back: still active
        let reloaded = get_session_by_id(&db, session.id).await?.unwrap();
        assert!(reloaded.is_active());
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_before_check_in_is_reported_to_operator() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        let session = check_in(&db, player.id, evening()).await?;

        let err = preview_bill(
            &db,
            session.id,
            &test_pricing(),
            evening() - Duration::minutes(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { message: _ }));
        assert!(err.is_user_facing());
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_does_not_touch_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        set_prepaid_minutes(&db, player.id, 60).await?;
        let session = check_in(&db, player.id, evening()).await?;
        let pricing = test_pricing();

        let bill = preview_bill(&db, session.id, &pricing, evening() + Duration::minutes(75)).await?;
        assert_eq!(bill.time_charge, dec!(15.00));

        let stored = Player::find_by_id(player.id).one(&db).await?.unwrap();
        assert_eq!(stored.prepaid_minutes, 60);
        assert!(get_session_by_id(&db, session.id).await?.unwrap().is_active());
        Ok(())
    }

    #[tokio::test]
    async fn test_compute_total_is_stable_after_checkout() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        let session = check_in(&db, player.id, evening()).await?;
        let pricing = test_pricing();

        checkout(&db, session.id, &pricing, evening() + Duration::minutes(45)).await?;

        let first = compute_total(&db, session.id, &pricing, evening() + Duration::hours(5)).await?;
        let second =
            compute_total(&db, session.id, &pricing, evening() + Duration::hours(9)).await?;
        assert_eq!(first, dec!(45.00));
        assert_eq!(first, second);

        // A later recharge does not rewrite history
        crate::core::recharge::grant_recharge(
            &db,
            player.id,
            &pricing,
            RechargePolicy::Replace,
            evening() + Duration::hours(6),
        )
        .await?;
        let third =
            compute_total(&db, session.id, &pricing, evening() + Duration::hours(10)).await?;
        assert_eq!(third, first);
        Ok(())
    }

    #[tokio::test]
    async fn test_line_items_keep_order_and_price_snapshot() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Asha").await?;
        let tea = create_custom_beverage(&db, "Tea", dec!(15.00)).await?;
        let coffee = create_custom_beverage(&db, "Coffee", dec!(35.50)).await?;
        let session = check_in(&db, player.id, evening()).await?;

        add_line_item(&db, session.id, tea.id, 2).await?;
        add_line_item(&db, session.id, coffee.id, 1).await?;

        let items = get_session_line_items(&db, session.id).await?;
        assert_eq!(
            items,
            vec![
                LineItem {
                    unit_price: dec!(15.00),
                    quantity: 2
                },
                LineItem {
                    unit_price: dec!(35.50),
                    quantity: 1
                },
            ]
        );

        let detailed = get_session_items_with_beverages(&db, session.id).await?;
        assert_eq!(detailed.len(), 2);
        assert_eq!(detailed[0].1.as_ref().unwrap().name, "Tea");

        assert!(matches!(
            add_line_item(&db, session.id, 999, 1).await.unwrap_err(),
            Error::BeverageNotFound { name: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_active_sessions_and_logs() -> Result<()> {
        let db = setup_test_db().await?;
        let asha = create_test_player(&db, "Asha").await?;
        let ravi = create_test_player(&db, "Ravi").await?;
        let pricing = test_pricing();

        let early = check_in(&db, asha.id, evening()).await?;
        let late = check_in(&db, ravi.id, evening() + Duration::minutes(10)).await?;

        let active = get_active_sessions(&db).await?;
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].0.id, early.id);
        assert_eq!(active[0].1.as_ref().unwrap().name, "Asha");

        checkout(&db, early.id, &pricing, evening() + Duration::minutes(60)).await?;
        let active = get_active_sessions(&db).await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].0.id, late.id);

        let logs = get_session_logs(&db).await?;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].0.id, late.id);
        assert_eq!(logs[1].0.id, early.id);

        assert_eq!(get_sessions_for_player(&db, asha.id).await?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_settled_bill_only_for_closed_sessions() {
        let mut session = session::Model {
            id: 1,
            player_id: 1,
            check_in: evening(),
            check_out: None,
            elapsed_minutes: None,
            time_charge_cents: None,
            beverage_charge_cents: None,
        };
        assert!(settled_bill(&session).is_none());

        session.check_out = Some(evening() + Duration::minutes(90));
        session.elapsed_minutes = Some(90);
        session.time_charge_cents = Some(3000);
        session.beverage_charge_cents = Some(6000);
        let bill = settled_bill(&session).unwrap();
        assert_eq!(bill.total, dec!(90.00));
    }
}
