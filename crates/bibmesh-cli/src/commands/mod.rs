pub mod areas;
pub mod categories;
pub mod entity;
pub mod journals;
pub mod mashup;
pub mod upload;
