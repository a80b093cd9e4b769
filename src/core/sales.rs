//! Product sale business logic - Selling merchandise to students.
//!
//! A sale writes three things in one transaction: the sale row, a conditional
//! decrement of the inventory row and an increment of the team total. The
//! stock pre-check keeps obviously bad requests away from the database; the
//! conditional decrement is what actually guarantees stock never goes
//! negative when two sales race for the last units.

use crate::{
    core::{
        display::{display_name, load_product_names, load_team_names, load_user_names},
        inventory, team, user,
        validation::{self, ValidatedSale, ValidatedStudent},
    },
    entities::{PaymentMethod, ProductSale, product_sale, team as team_entity},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Highest amount a single sale may charge, 10,000,000.00.
///
/// Kept well inside the range `SQLite` REAL columns hold exactly.
pub const MAX_CHARGE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 2);

/// Validated input for [`sell_product_to_student`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellProductRequest {
    /// Product being sold
    pub product_id: i64,
    /// Buying student
    pub user_id: i64,
    /// Team the student must belong to
    pub team_id: i64,
    /// Size to draw from inventory
    pub size: String,
    /// Units sold, must be positive
    pub quantity: i32,
    /// How the student paid
    pub payment_method: PaymentMethod,
    /// Amount actually charged; defaults to `price * quantity`
    pub amount_paid: Option<Decimal>,
    /// Caller recording the sale, resolved from the authenticated identity
    pub sold_by_id: i64,
}

impl SellProductRequest {
    /// Rejects requests with a blank size, a non-positive quantity or a
    /// negative amount.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.size.trim().is_empty() {
            return Err(Error::validation("Size is required"));
        }
        if self.quantity <= 0 {
            return Err(Error::validation(format!(
                "Quantity must be a positive integer (got {})",
                self.quantity
            )));
        }
        if let Some(amount) = self.amount_paid {
            if amount < Decimal::ZERO {
                return Err(Error::validation(format!(
                    "Amount paid cannot be negative (got {amount})"
                )));
            }
        }
        Ok(())
    }
}

/// A sale joined with the display names callers show next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    /// The stored sale
    pub sale: product_sale::Model,
    /// Name of the product sold
    pub product_name: String,
    /// Name of the buying student
    pub student_name: String,
    /// Name of the credited team
    pub team_name: String,
    /// Name of the user who recorded the sale
    pub sold_by_name: String,
}

/// Result of [`sell_product_to_student`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleOutcome {
    /// The sale with display names
    pub record: SaleRecord,
    /// Team total after the sale's points were applied
    pub team_total_points: i64,
    /// Units left in the sold size
    pub remaining_stock: i32,
}

pub(crate) struct AppliedSale {
    pub(crate) sale: product_sale::Model,
    pub(crate) team: team_entity::Model,
    pub(crate) remaining_stock: i32,
}

/// Sells a product to a student, drawing down stock and crediting the team.
///
/// # Errors
/// - [`Error::Validation`] for a blank size, non-positive quantity, negative
///   amount or a charge above [`MAX_CHARGE`]
/// - [`Error::UserNotFound`] if the student or the seller does not exist
/// - [`Error::NotAStudent`] / [`Error::TeamMismatch`] if the buyer is not a
///   student of the team
/// - [`Error::ProductNotFound`] if the product is missing or inactive
/// - [`Error::InsufficientStock`] if the size cannot cover the quantity, either
///   at the pre-check or when the decrement executes
/// - [`Error::Database`] if the transaction fails
#[instrument(
    skip(db),
    fields(product_id = request.product_id, user_id = request.user_id, quantity = request.quantity)
)]
pub async fn sell_product_to_student(
    db: &DatabaseConnection,
    request: SellProductRequest,
) -> Result<SaleOutcome> {
    request.validate()?;
    let size = request.size.trim();

    let seller = user::get_user_by_id(db, request.sold_by_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: request.sold_by_id.to_string(),
        })?;
    let student = validation::validate_student(db, request.user_id, request.team_id).await?;
    let checked =
        validation::validate_product_sale(db, request.product_id, size, request.quantity).await?;
    sale_charge(checked.product.price, request.quantity, request.amount_paid)?;

    let txn = db.begin().await?;
    let applied = apply_sale(&txn, &student, &checked, &request, seller.id).await?;
    txn.commit().await?;

    info!(
        sale_id = applied.sale.id,
        amount_paid = %applied.sale.amount_paid,
        points = applied.sale.points_awarded,
        remaining_stock = applied.remaining_stock,
        team_total = applied.team.total_points,
        "Product sold"
    );

    Ok(SaleOutcome {
        record: SaleRecord {
            sale: applied.sale,
            product_name: checked.product.name,
            student_name: student.student.name,
            team_name: applied.team.name,
            sold_by_name: seller.name,
        },
        team_total_points: applied.team.total_points,
        remaining_stock: applied.remaining_stock,
    })
}

/// Amount charged for a sale: the supplied amount, or `price * quantity`.
///
/// # Errors
/// Returns [`Error::Validation`] if the product overflows or the charge
/// exceeds [`MAX_CHARGE`].
pub(crate) fn sale_charge(
    price: Decimal,
    quantity: i32,
    amount_paid: Option<Decimal>,
) -> Result<Decimal> {
    let charge = match amount_paid {
        Some(amount) => amount,
        None => price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| {
                Error::validation(format!("Charge for {quantity} x {price} is out of range"))
            })?,
    };
    if charge > MAX_CHARGE {
        return Err(Error::validation(format!(
            "Charge cannot exceed {MAX_CHARGE} (got {charge})"
        )));
    }
    Ok(charge)
}

/// Writes a pre-validated sale inside `txn`.
///
/// Returns an error without committing anything when the conditional inventory
/// decrement finds too little stock; the caller drops the transaction, which
/// rolls back the sale row inserted just before.
pub(crate) async fn apply_sale<C>(
    txn: &C,
    student: &ValidatedStudent,
    checked: &ValidatedSale,
    request: &SellProductRequest,
    sold_by_id: i64,
) -> Result<AppliedSale>
where
    C: ConnectionTrait,
{
    let product = &checked.product;
    let quantity = request.quantity;
    let charge = sale_charge(product.price, quantity, request.amount_paid)?;
    let points_awarded = i64::from(product.points) * i64::from(quantity);

    let sale = product_sale::ActiveModel {
        product_id: Set(product.id),
        user_id: Set(student.student.id),
        team_id: Set(student.team.id),
        size: Set(checked.inventory.size.clone()),
        quantity: Set(quantity),
        payment_method: Set(request.payment_method),
        amount_paid: Set(charge),
        points_awarded: Set(points_awarded),
        sold_by_id: Set(sold_by_id),
        sold_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let inventory = inventory::decrement_inventory_atomic(txn, checked.inventory.id, quantity).await?;
    let team = team::adjust_team_points_atomic(txn, student.team.id, points_awarded).await?;

    Ok(AppliedSale {
        sale,
        team,
        remaining_stock: inventory.quantity,
    })
}

/// Retrieves every sale recorded by `seller_id`, newest first, with display names.
pub async fn get_sales_history(
    db: &DatabaseConnection,
    seller_id: i64,
) -> Result<Vec<SaleRecord>> {
    let sales = ProductSale::find()
        .filter(product_sale::Column::SoldById.eq(seller_id))
        .order_by_desc(product_sale::Column::SoldAt)
        .order_by_desc(product_sale::Column::Id)
        .all(db)
        .await?;

    let user_ids: HashSet<i64> = sales
        .iter()
        .flat_map(|sale| [sale.user_id, sale.sold_by_id])
        .collect();
    let team_ids: HashSet<i64> = sales.iter().map(|sale| sale.team_id).collect();
    let product_ids: HashSet<i64> = sales.iter().map(|sale| sale.product_id).collect();

    let user_names = load_user_names(db, user_ids).await?;
    let team_names = load_team_names(db, team_ids).await?;
    let product_names = load_product_names(db, product_ids).await?;

    Ok(sales
        .into_iter()
        .map(|sale| SaleRecord {
            product_name: display_name(&product_names, sale.product_id),
            student_name: display_name(&user_names, sale.user_id),
            team_name: display_name(&team_names, sale.team_id),
            sold_by_name: display_name(&user_names, sale.sold_by_id),
            sale,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::core::{points, product};
    use crate::entities::Role;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn request(fixture: &LedgerFixture, size: &str, quantity: i32) -> SellProductRequest {
        SellProductRequest {
            product_id: fixture.product.id,
            user_id: fixture.student.id,
            team_id: fixture.team.id,
            size: size.to_string(),
            quantity,
            payment_method: PaymentMethod::Cash,
            amount_paid: None,
            sold_by_id: fixture.staff.id,
        }
    }

    async fn stock(db: &DatabaseConnection, product_id: i64, size: &str) -> Result<i32> {
        Ok(inventory::find_inventory_row(db, product_id, size)
            .await?
            .map_or(0, |row| row.quantity))
    }

    async fn team_points(db: &DatabaseConnection, team_id: i64) -> Result<i64> {
        Ok(team::get_team_by_id(db, team_id).await?.unwrap().total_points)
    }

    async fn sale_count(db: &DatabaseConnection) -> Result<usize> {
        Ok(ProductSale::find().all(db).await?.len())
    }

    #[tokio::test]
    async fn test_sell_request_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let base = SellProductRequest {
            product_id: 1,
            user_id: 1,
            team_id: 1,
            size: "M".to_string(),
            quantity: 1,
            payment_method: PaymentMethod::Card,
            amount_paid: None,
            sold_by_id: 2,
        };

        for quantity in [0, -2] {
            let result = sell_product_to_student(
                &db,
                SellProductRequest {
                    quantity,
                    ..base.clone()
                },
            )
            .await;
            assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        }

        let result = sell_product_to_student(
            &db,
            SellProductRequest {
                size: " ".to_string(),
                ..base.clone()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = sell_product_to_student(
            &db,
            SellProductRequest {
                amount_paid: Some(Decimal::new(-1, 0)),
                ..base
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_shirt_sale_scenario() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;

        let outcome = sell_product_to_student(&db, request(&fixture, "M", 2)).await?;

        let sale = &outcome.record.sale;
        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.amount_paid, Decimal::new(3000, 2));
        assert_eq!(sale.payment_method, PaymentMethod::Cash);
        assert_eq!(sale.points_awarded, 20);
        assert_eq!(sale.size, "M");
        assert_eq!(outcome.record.product_name, "Phi Shirt");
        assert_eq!(outcome.record.student_name, fixture.student.name);
        assert_eq!(outcome.record.sold_by_name, fixture.staff.name);
        assert_eq!(outcome.remaining_stock, 18);
        assert_eq!(outcome.team_total_points, 20);

        assert_eq!(stock(&db, fixture.product.id, "M").await?, 18);
        assert_eq!(stock(&db, fixture.product.id, "S").await?, 10);
        assert_eq!(team_points(&db, fixture.team.id).await?, 20);

        let stored = ProductSale::find_by_id(sale.id).one(&db).await?.unwrap();
        assert_eq!(stored.amount_paid, Decimal::new(30, 0));

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_uses_supplied_amount() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;

        let mut discounted = request(&fixture, "S", 3);
        discounted.amount_paid = Some(Decimal::new(4000, 2));
        discounted.payment_method = PaymentMethod::Online;
        let outcome = sell_product_to_student(&db, discounted).await?;

        assert_eq!(outcome.record.sale.amount_paid, Decimal::new(40, 0));
        assert_eq!(outcome.record.sale.payment_method, PaymentMethod::Online);
        assert_eq!(outcome.team_total_points, 30);

        Ok(())
    }

    #[tokio::test]
    async fn test_oversell_rejected() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;
        let tank = create_test_product(&db, "Tank Top").await?;
        stock_test_product(&db, tank.id, &[("M", 3)]).await?;

        let mut oversell = request(&fixture, "M", 5);
        oversell.product_id = tank.id;
        let result = sell_product_to_student(&db, oversell).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock {
                requested: 5,
                available: 3,
                ..
            }
        ));

        assert_eq!(sale_count(&db).await?, 0);
        assert_eq!(stock(&db, tank.id, "M").await?, 3);
        assert_eq!(team_points(&db, fixture.team.id).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_to_student_of_other_team_rejected() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;
        let other_team = create_test_team(&db, "Other Team").await?;

        let mut wrong_team = request(&fixture, "M", 1);
        wrong_team.team_id = other_team.id;
        let result = sell_product_to_student(&db, wrong_team).await;
        assert!(matches!(result.unwrap_err(), Error::TeamMismatch { .. }));

        assert_eq!(sale_count(&db).await?, 0);
        assert_eq!(stock(&db, fixture.product.id, "M").await?, 20);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_of_inactive_product_rejected() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;
        product::deactivate_product(&db, fixture.product.id).await?;

        let result = sell_product_to_student(&db, request(&fixture, "M", 1)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_decrement_rolls_back_sale_row() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;

        // Pre-check while 20 units of M are on hand
        let student = validation::validate_student(&db, fixture.student.id, fixture.team.id).await?;
        let stale = validation::validate_product_sale(&db, fixture.product.id, "M", 5).await?;

        // A competing sale takes 18 of them
        sell_product_to_student(&db, request(&fixture, "M", 18)).await?;

        let txn = db.begin().await?;
        let result = apply_sale(
            &txn,
            &student,
            &stale,
            &request(&fixture, "M", 5),
            fixture.staff.id,
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                requested: 5,
                available: 2,
                ..
            })
        ));
        txn.rollback().await?;

        assert_eq!(sale_count(&db).await?, 1);
        assert_eq!(stock(&db, fixture.product.id, "M").await?, 2);
        assert_eq!(team_points(&db, fixture.team.id).await?, 180);

        Ok(())
    }

    #[test]
    fn test_sale_charge_bounds() {
        assert_eq!(
            sale_charge(Decimal::new(1500, 2), 2, None).unwrap(),
            Decimal::new(30, 0)
        );
        assert_eq!(
            sale_charge(Decimal::MAX, 2, Some(Decimal::new(5, 0))).unwrap(),
            Decimal::new(5, 0)
        );

        // price * quantity overflows the decimal range
        assert!(matches!(
            sale_charge(Decimal::MAX, 2, None).unwrap_err(),
            Error::Validation { .. }
        ));
        assert!(matches!(
            sale_charge(Decimal::ONE, 1, Some(MAX_CHARGE + Decimal::ONE)).unwrap_err(),
            Error::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn test_charge_above_ceiling_writes_nothing() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;
        let gold = product::create_product(
            &db,
            product::NewProduct {
                name: "Gold Jacket".to_string(),
                description: None,
                price: product::MAX_PRICE,
                points: 1,
            },
        )
        .await?;
        stock_test_product(&db, gold.id, &[("M", 20)]).await?;

        let mut bulk = request(&fixture, "M", 11);
        bulk.product_id = gold.id;
        let result = sell_product_to_student(&db, bulk).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        assert_eq!(sale_count(&db).await?, 0);
        assert_eq!(stock(&db, gold.id, "M").await?, 20);
        assert_eq!(team_points(&db, fixture.team.id).await?, 0);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_of_last_units() -> Result<()> {
        let (db, path) = setup_file_test_db("last_units").await?;
        let fixture = populate_ledger(&db).await?;
        let last = create_test_product(&db, "Last Shirts").await?;
        stock_test_product(&db, last.id, &[("M", 3)]).await?;

        let db = std::sync::Arc::new(db);
        let mut handles = Vec::new();
        for _ in 0..2 {
            let mut sale = request(&fixture, "M", 2);
            sale.product_id = last.id;
            let db = std::sync::Arc::clone(&db);
            handles.push(tokio::spawn(async move {
                sell_product_to_student(&db, sale).await
            }));
        }

        let mut sold = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                Err(Error::InsufficientStock { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(sold, 1);
        assert_eq!(stock(&db, last.id, "M").await?, 1);
        assert_eq!(sale_count(&db).await?, 1);
        assert_eq!(team_points(&db, fixture.team.id).await?, 20);
        assert!(team::audit_team_points(&db, fixture.team.id).await?.is_consistent());

        let db = std::sync::Arc::try_unwrap(db)
            .unwrap_or_else(|_| panic!("connection still shared after tasks joined"));
        db.close().await?;
        remove_test_db_file(&path);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_lose_no_points() -> Result<()> {
        let (db, path) = setup_file_test_db("no_lost_points").await?;
        let fixture = populate_ledger(&db).await?;

        let db = std::sync::Arc::new(db);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let sale = request(&fixture, "M", 2);
            let db = std::sync::Arc::clone(&db);
            handles.push(tokio::spawn(async move {
                sell_product_to_student(&db, sale).await
            }));
        }
        for handle in handles {
            handle.await.unwrap()?;
        }

        assert_eq!(stock(&db, fixture.product.id, "M").await?, 4);
        assert_eq!(sale_count(&db).await?, 8);
        assert_eq!(team_points(&db, fixture.team.id).await?, 160);
        assert!(team::audit_team_points(&db, fixture.team.id).await?.is_consistent());

        let db = std::sync::Arc::try_unwrap(db)
            .unwrap_or_else(|_| panic!("connection still shared after tasks joined"));
        db.close().await?;
        remove_test_db_file(&path);
        Ok(())
    }

    #[tokio::test]
    async fn test_points_conservation_and_non_negative_stock() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;
        let teammate = create_test_student(&db, "Jordan", fixture.team.id).await?;

        let mut expected = 0_i64;
        for (size, quantity) in [("M", 4), ("S", 10), ("M", 16)] {
            let outcome = sell_product_to_student(&db, request(&fixture, size, quantity)).await?;
            assert!(outcome.remaining_stock >= 0);
            expected += 10 * i64::from(quantity);
        }

        let award = points::AwardPointsRequest {
            user_id: teammate.id,
            team_id: fixture.team.id,
            points: 45,
            activity_description: "Volunteering".to_string(),
            awarded_by_id: fixture.staff.id,
        };
        points::award_points_to_student(&db, award).await?;
        expected += 45;

        // Both sizes are now sold out
        let result = sell_product_to_student(&db, request(&fixture, "M", 1)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock { .. }
        ));

        assert_eq!(team_points(&db, fixture.team.id).await?, expected);
        for row in product::get_inventory_for_product(&db, fixture.product.id).await? {
            assert_eq!(row.quantity, 0);
        }

        let audit = team::audit_team_points(&db, fixture.team.id).await?;
        assert_eq!(audit.from_sales, 300);
        assert_eq!(audit.from_awards, 45);
        assert!(audit.is_consistent());

        Ok(())
    }

    #[tokio::test]
    async fn test_sales_history_newest_first() -> Result<()> {
        let (db, fixture) = setup_ledger().await?;
        let admin = create_custom_user(&db, "Ada Admin", Role::Admin, None, Some("300")).await?;

        let first = sell_product_to_student(&db, request(&fixture, "M", 1)).await?;
        let second = sell_product_to_student(&db, request(&fixture, "S", 2)).await?;

        let mut by_admin = request(&fixture, "M", 1);
        by_admin.sold_by_id = admin.id;
        sell_product_to_student(&db, by_admin).await?;

        let history = get_sales_history(&db, fixture.staff.id).await?;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sale.id, second.record.sale.id);
        assert_eq!(history[1].sale.id, first.record.sale.id);
        assert_eq!(history[0].product_name, "Phi Shirt");
        assert_eq!(history[0].team_name, fixture.team.name);
        assert_eq!(history[0].student_name, fixture.student.name);

        let admin_history = get_sales_history(&db, admin.id).await?;
        assert_eq!(admin_history.len(), 1);
        assert_eq!(admin_history[0].sold_by_name, "Ada Admin");

        Ok(())
    }
}
