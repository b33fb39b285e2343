pub mod accessors;
pub mod host;
pub mod snapshot;

pub use accessors::{AccessorPlan, DescriptionSink, DescriptionSource, UrlSource};
pub use host::HostCanvas;
pub use snapshot::{DocumentSnapshot, HostFeatures, SnapshotCanvas, SnapshotNode, WriteRecord};
