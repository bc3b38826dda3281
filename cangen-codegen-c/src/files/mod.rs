mod header;
mod source;

pub use header::CHeader;
pub use source::CSource;
