pub mod anchors;

pub use anchors::{AnchorCache, AnchorLoader, AnchorsHandle};
