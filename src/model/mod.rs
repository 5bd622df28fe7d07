pub mod file;
pub mod outcome;
pub mod viewport;

pub use file::PdfFile;
pub use outcome::{CompressionReport, Outcome};
pub use viewport::{PageSize, Viewport};
