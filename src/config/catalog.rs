//! Catalog configuration loading from catalog.toml
//!
//! The catalog lists the teams, users and products a fresh installation starts
//! with. It is applied by [`crate::core::seed::seed_catalog`], which skips
//! anything that already exists, so the file can be kept around and re-applied
//! on every start.

use crate::entities::Role;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Structure of the whole catalog.toml file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Teams to create
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
    /// Users to create
    #[serde(default)]
    pub users: Vec<UserConfig>,
    /// Products to create, with their initial stock
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// A single team
#[derive(Debug, Deserialize, Clone)]
pub struct TeamConfig {
    /// Team name
    pub name: String,
}

/// A single user
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    /// Display name
    pub name: String,
    /// Platform role, e.g. `"STUDENT"` or `"STAFF"`
    pub role: Role,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Name of the team the user belongs to (required for students)
    #[serde(default)]
    pub team: Option<String>,
    /// Discord user ID for callers of the bot
    #[serde(default)]
    pub discord_id: Option<String>,
}

/// A single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Product name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price, written as a string to keep it exact (e.g. `"15.00"`)
    pub price: Decimal,
    /// Points per unit sold
    pub points: i32,
    /// Initial stock keyed by size
    #[serde(default)]
    pub inventory: BTreeMap<String, i32>,
}

/// Loads a catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading catalog from {path_ref:?}");
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file {path_ref:?}: {e}"),
    })?;

    parse_catalog(&contents)
}

/// Parses catalog TOML that has already been read into memory
pub fn parse_catalog(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog: {e}"),
    })
}

/// Loads the catalog named by `CATALOG_PATH` (default `./catalog.toml`).
///
/// A missing file is not an error: the bot can run against an already
/// populated database.
pub fn load_default_catalog() -> Result<Option<CatalogConfig>> {
    let path = std::env::var("CATALOG_PATH").unwrap_or_else(|_| "catalog.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::info!("No catalog file at {path}, skipping seeding");
        return Ok(None);
    }
    load_catalog(&path).map(Some)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let toml_str = r#"
            [[teams]]
            name = "Red Team"

            [[users]]
            name = "Sam Staff"
            role = "STAFF"
            discord_id = "1234"

            [[users]]
            name = "Alice"
            role = "STUDENT"
            team = "Red Team"

            [[products]]
            name = "Phi Shirt"
            price = "15.00"
            points = 10
            inventory = { S = 10, M = 20 }
        "#;

        let catalog = parse_catalog(toml_str).unwrap();
        assert_eq!(catalog.teams.len(), 1);
        assert_eq!(catalog.teams[0].name, "Red Team");

        assert_eq!(catalog.users.len(), 2);
        assert_eq!(catalog.users[0].role, Role::Staff);
        assert_eq!(catalog.users[0].discord_id.as_deref(), Some("1234"));
        assert_eq!(catalog.users[1].role, Role::Student);
        assert_eq!(catalog.users[1].team.as_deref(), Some("Red Team"));

        let shirt = &catalog.products[0];
        assert_eq!(shirt.price, Decimal::new(1500, 2));
        assert_eq!(shirt.points, 10);
        assert_eq!(shirt.inventory.get("M"), Some(&20));
        assert_eq!(shirt.inventory.get("S"), Some(&10));
    }

    #[test]
    fn test_parse_catalog_sections_are_optional() {
        let catalog = parse_catalog("").unwrap();
        assert!(catalog.teams.is_empty());
        assert!(catalog.users.is_empty());
        assert!(catalog.products.is_empty());
    }

    #[test]
    fn test_parse_catalog_rejects_unknown_role() {
        let result = parse_catalog(
            r#"
            [[users]]
            name = "Mallory"
            role = "OWNER"
            "#,
        );
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
