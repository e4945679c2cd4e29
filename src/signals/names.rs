//! Signal names used by the layout pipeline.

/// Raw viewport resize occurrence.
pub const RESIZE: &str = "resize";
/// Raw "layout tree is stale" occurrence.
pub const DIRTY_LAYOUT: &str = "dirty-layout";
/// Raw "fresh geometry is available" occurrence.
pub const UPDATE_LAYOUT: &str = "update-layout";

/// At most once per frame after any [`RESIZE`].
pub const OPTIMIZED_RESIZE: &str = "optimizedResize";
/// At most once per frame after any [`DIRTY_LAYOUT`].
pub const OPTIMIZED_DIRTY_LAYOUT: &str = "optimizedDirtyLayout";
/// At most once per frame after any [`UPDATE_LAYOUT`].
pub const OPTIMIZED_UPDATE_LAYOUT: &str = "optimizedUpdateLayout";
