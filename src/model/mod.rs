pub mod config {
    pub use peeps_core::config::*;
}
pub mod spatial_index {
    pub use peeps_core::spatial_index::*;
}
pub mod lifecycle {
    pub use peeps_core::lifecycle::*;
}
pub mod state {
    pub use peeps_data::*;
}

pub mod world;
