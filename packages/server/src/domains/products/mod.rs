pub mod catalog;

pub use catalog::ProductCatalog;
