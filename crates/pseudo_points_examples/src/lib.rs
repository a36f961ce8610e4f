#![forbid(unsafe_code)]

mod output;
mod rendering;

pub use output::write_records_csv;
pub use rendering::{init_tracing, render_batch_to_png, RenderConfig};
