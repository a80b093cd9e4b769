//! Display-name lookups shared by the history accessors.

use crate::{
    entities::{Product, Team, User, product, team, user},
    errors::Result,
};
use sea_orm::prelude::*;
use std::collections::{HashMap, HashSet};

pub(crate) async fn load_user_names(
    db: &DatabaseConnection,
    ids: HashSet<i64>,
) -> Result<HashMap<i64, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = User::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(users.into_iter().map(|u| (u.id, u.name)).collect())
}

pub(crate) async fn load_team_names(
    db: &DatabaseConnection,
    ids: HashSet<i64>,
) -> Result<HashMap<i64, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let teams = Team::find()
        .filter(team::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(teams.into_iter().map(|t| (t.id, t.name)).collect())
}

pub(crate) fn display_name(names: &HashMap<i64, String>, id: i64) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("#{id}"))
}

pub(crate) async fn load_product_names(
    db: &DatabaseConnection,
    ids: HashSet<i64>,
) -> Result<HashMap<i64, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let products = Product::find()
        .filter(product::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(products.into_iter().map(|p| (p.id, p.name)).collect())
}
