pub mod aggregate;

pub use aggregate::{CatalogProduct, CatalogUploadResult};
