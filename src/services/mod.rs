pub mod assessor;
pub mod image_store;
