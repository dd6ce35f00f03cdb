pub mod numbering;
pub mod pricing;
pub mod quotes;
pub mod renderer;
pub mod seed;
pub mod state;
pub mod stats;
pub mod transfer;
pub mod wedding;
