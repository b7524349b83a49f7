pub mod config;
pub mod convert;
pub mod error;
pub mod mapper;
pub(crate) mod parser;
pub mod reader;
pub mod record;
pub mod resolve;
pub mod types;
pub mod writer;

pub use config::Config;
pub use convert::Conversion;
pub use error::{Error, Result};
pub use mapper::Mapper;
pub use reader::BedRecords;
pub use record::BedRecord;
pub use types::{Header, HeaderLine, Variant, Vcf};
