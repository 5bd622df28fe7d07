mod args;

pub use args::{Args, Strategy};
