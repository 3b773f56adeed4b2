pub mod dummy;
pub mod extractor;
pub mod sampler;
pub mod scanner;
pub mod summary;
pub mod writer;
