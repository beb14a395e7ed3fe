// CV ingestion: uploaded files are stored through a `FileStore`, their text is
// pulled out by a `TextExtractor`, and a `CvRecord` is written to storage.
// Extraction failures mark the record `failed`; they never fail the upload.

pub mod extract;
pub mod file_store;
pub mod handlers;
