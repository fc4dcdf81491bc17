//! Group names, root attribute names and format constants

/// Format version written to `OMX_VERSION`
pub const OMX_FORMAT_VERSION: &str = "0.2";

/// Group holding one array node per matrix
pub const DATA_GROUP: &str = "data";

/// Group holding one 1-D integer array node per mapping
pub const LOOKUP_GROUP: &str = "lookup";

/// Root attribute names
pub mod attrs {
    /// Format version string
    pub const VERSION: &str = "OMX_VERSION";

    /// Producer identifier
    pub const CREATED_WITH: &str = "OMX_CREATED_WITH";

    /// Two-element integer array: rows, cols
    pub const SHAPE: &str = "SHAPE";
}

/// Payload alignment boundary in the single-file layout
pub const ALIGNMENT_BOUNDARY: usize = 8;

/// Longest accepted node name in bytes
pub const MAX_NAME_LEN: usize = 255;
