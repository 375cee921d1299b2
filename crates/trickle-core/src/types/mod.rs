pub mod record;
pub mod row;

pub use record::{decode_age, UserRecord};
pub use row::{FieldValue, Row};
