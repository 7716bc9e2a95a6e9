pub mod a001_catalog_product;
pub mod a002_collection;
pub mod a003_inventory_level;
