//! DTD lookup for validating parsers.
//! 為驗證式 XML 剖析器尋找 DTD 檔案。

mod doctype;
mod entity;

pub use doctype::{read_doctype, read_doctype_from_path, Doctype, DoctypeError};
pub use entity::{DtdResolver, EntityResolver, ResolvedEntity, NETWORK_SCHEMES};
