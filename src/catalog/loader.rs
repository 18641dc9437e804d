use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::{Catalog, CatalogError};
use crate::models::{AllergenAssociation, IngredientReference, Product, SkinTypeFlags};

pub const PRODUCTS_FILE: &str = "products_clean.csv";
pub const INGREDIENTS_FILE: &str = "ingredients_cleaned_preprocessed.csv";
pub const PRODUCT_ALLERGENS_FILE: &str = "product_allergens.csv";

/// Row of the product table as written by the cleaning scripts
#[derive(Debug, Deserialize)]
struct ProductRecord {
    #[serde(default)]
    id: Option<u64>,
    #[serde(rename = "Label", default)]
    category: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    ingredients: String,
    #[serde(rename = "Dry", default, deserialize_with = "deserialize_flag")]
    dry: bool,
    #[serde(rename = "Oily", default, deserialize_with = "deserialize_flag")]
    oily: bool,
    #[serde(rename = "Normal", default, deserialize_with = "deserialize_flag")]
    normal: bool,
    #[serde(rename = "Combination", default, deserialize_with = "deserialize_flag")]
    combination: bool,
    #[serde(rename = "Sensitive", default, deserialize_with = "deserialize_flag")]
    sensitive: bool,
}

impl ProductRecord {
    /// Rows without an explicit id are keyed by their position in the table
    fn into_product(self, row: usize) -> Product {
        Product {
            id: self.id.unwrap_or(row as u64),
            category: self.category,
            brand: self.brand,
            name: self.name,
            ingredients: self.ingredients,
            skin_types: SkinTypeFlags {
                dry: self.dry,
                oily: self.oily,
                normal: self.normal,
                combination: self.combination,
                sensitive: self.sensitive,
            },
        }
    }
}

/// Accepts the spellings the cleaning scripts and spreadsheets produce
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "1.0" | "true" | "yes" | "y"
    ))
}

/// Loads the three catalog tables from `data_dir`
pub fn load_catalog(data_dir: &Path) -> Result<Catalog, CatalogError> {
    let products_path = data_dir.join(PRODUCTS_FILE);
    let products = read_products(open(&products_path)?).map_err(|source| CatalogError::Csv {
        path: products_path.clone(),
        source,
    })?;

    if products.is_empty() {
        return Err(CatalogError::NoProducts(products_path));
    }

    let ingredients: Vec<IngredientReference> = read_table(&data_dir.join(INGREDIENTS_FILE))?;
    let allergens: Vec<AllergenAssociation> =
        read_table(&data_dir.join(PRODUCT_ALLERGENS_FILE))?;

    tracing::info!(
        products = products.len(),
        ingredients = ingredients.len(),
        allergen_links = allergens.len(),
        data_dir = %data_dir.display(),
        "Catalog loaded"
    );

    Ok(Catalog::new(products, ingredients, allergens))
}

/// Parses the product table, assigning row keys where the table has none
pub fn read_products<R: Read>(reader: R) -> Result<Vec<Product>, csv::Error> {
    csv_reader(reader)
        .deserialize::<ProductRecord>()
        .enumerate()
        .map(|(row, record)| record.map(|r| r.into_product(row)))
        .collect()
}

/// Parses any table whose rows deserialize directly into `T`
pub fn read_records<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    csv_reader(reader).deserialize().collect()
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    read_records(open(path)?).map_err(|source| CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new().trim(Trim::Headers).from_reader(reader)
}

fn open(path: &Path) -> Result<File, CatalogError> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}
