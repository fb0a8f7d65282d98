//! EPUB container reading: container.xml, OPF package, spine documents.

mod parser;
mod reader;

pub use parser::{OpfData, parse_container_xml, parse_opf};
pub use reader::EpubReader;
