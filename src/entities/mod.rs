//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod manual_points_award;
pub mod product;
pub mod product_inventory;
pub mod product_sale;
pub mod team;
pub mod user;

// Re-export specific types to avoid conflicts
pub use manual_points_award::{
    Column as ManualPointsAwardColumn, Entity as ManualPointsAward,
    Model as ManualPointsAwardModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_inventory::{
    Column as ProductInventoryColumn, Entity as ProductInventory, Model as ProductInventoryModel,
};
pub use product_sale::{
    Column as ProductSaleColumn, Entity as ProductSale, Model as ProductSaleModel, PaymentMethod,
};
pub use team::{Column as TeamColumn, Entity as Team, Model as TeamModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
