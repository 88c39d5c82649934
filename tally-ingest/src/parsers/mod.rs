pub mod delimited;
pub mod document_text;
