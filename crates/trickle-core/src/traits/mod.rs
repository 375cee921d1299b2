pub mod source;

pub use source::{Connector, RowSource, RowsOf};
