use std::fmt;

/// Machine-readable error codes for every failure the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotAcyclic,
    NotSquare,
    SelfLoop,
    IndexOutOfRange,
    InvalidDimension,
    InvalidChainLength,
    EmbeddingDimension,
    UnknownSignature,
    UnknownSelection,
    UnknownSpacelikeMethod,
    UnknownGeometry,
    NoCausalOrder,
    InvalidParameter,
    InvalidDegreeSequence,
    CacheIo,
    CacheCorrupt,
    ConfigParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotAcyclic => "E1001",
            Self::NotSquare => "E2001",
            Self::SelfLoop => "E2002",
            Self::IndexOutOfRange => "E2003",
            Self::InvalidDimension => "E2004",
            Self::InvalidChainLength => "E2005",
            Self::EmbeddingDimension => "E2006",
            Self::UnknownSignature => "E2007",
            Self::UnknownSelection => "E2008",
            Self::UnknownSpacelikeMethod => "E2009",
            Self::UnknownGeometry => "E2010",
            Self::NoCausalOrder => "E2011",
            Self::InvalidParameter => "E2012",
            Self::InvalidDegreeSequence => "E2013",
            Self::CacheIo => "E5001",
            Self::CacheCorrupt => "E5002",
            Self::ConfigParseError => "E6001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotAcyclic => "Relation is not acyclic",
            Self::NotSquare => "Matrix is not square",
            Self::SelfLoop => "Relation contains a self-loop",
            Self::IndexOutOfRange => "Node index out of range",
            Self::InvalidDimension => "Dimension below 1",
            Self::InvalidChainLength => "Chain length out of range",
            Self::EmbeddingDimension => "Embedding dimension out of range",
            Self::UnknownSignature => "Unknown embedding signature",
            Self::UnknownSelection => "Unknown landmark selection method",
            Self::UnknownSpacelikeMethod => "Unknown spacelike separation method",
            Self::UnknownGeometry => "Unknown geometry",
            Self::NoCausalOrder => "Geometry has no causal order",
            Self::InvalidParameter => "Invalid parameter",
            Self::InvalidDegreeSequence => "Degree sequence is not realisable",
            Self::CacheIo => "Lookup cache I/O failure",
            Self::CacheCorrupt => "Lookup cache entry is corrupt",
            Self::ConfigParseError => "Config file parse error",
        }
    }

    /// Optional remediation hint that can be surfaced to callers.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotAcyclic => Some("Remove the cycle; causal sets must be acyclic."),
            Self::NotSquare => Some("Pass an N x N matrix."),
            Self::SelfLoop => Some("Drop diagonal entries; no element precedes itself."),
            Self::InvalidDimension => Some("Use a spacetime dimension of at least 1."),
            Self::EmbeddingDimension => Some("Request between 1 and N embedding dimensions."),
            Self::UnknownSignature => Some("Use `euclidean` or `lorentzian`."),
            Self::UnknownSelection => Some("Use `first` or `max-min`."),
            Self::UnknownSpacelikeMethod => Some("Use `naive` or `two-link`."),
            Self::UnknownGeometry => {
                Some("Use one of: euclidean, minkowski, de-sitter, hyperbolic, spherical, lp.")
            }
            Self::CacheCorrupt => Some("The entry is rebuilt automatically on the next lookup."),
            Self::CacheIo => Some("Check permissions on the cache directory."),
            Self::ConfigParseError => Some("Fix syntax in dagology.toml and retry."),
            Self::IndexOutOfRange
            | Self::InvalidChainLength
            | Self::NoCausalOrder
            | Self::InvalidParameter
            | Self::InvalidDegreeSequence => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors returned by the causal-order engine.
#[derive(Debug, thiserror::Error)]
pub enum DagologyError {
    /// A fixed-point iteration exceeded its acyclicity bound, or a node
    /// reached itself.
    #[error("relation is not acyclic: {detail}")]
    NotAcyclic { detail: String },

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("self-loop on node {0}")]
    SelfLoop(usize),

    #[error("node index {index} out of range for {len} nodes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("dimension {0} is less than 1")]
    InvalidDimension(f64),

    #[error("chain length {0} is not supported here")]
    InvalidChainLength(usize),

    #[error("cannot embed {points} points into {requested} dimensions")]
    EmbeddingDimension { requested: usize, points: usize },

    #[error("unknown embedding signature: {0}")]
    UnknownSignature(String),

    #[error("unknown landmark selection: {0}")]
    UnknownSelection(String),

    #[error("unknown spacelike method: {0}")]
    UnknownSpacelikeMethod(String),

    #[error("unknown geometry: {0}")]
    UnknownGeometry(String),

    #[error("geometry {0} does not define a causal order")]
    NoCausalOrder(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("degree sequence is not realisable at node {0}")]
    InvalidDegreeSequence(usize),

    #[error("lookup cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    #[error("lookup cache entry for k={k} is corrupt: {reason}")]
    CacheCorrupt { k: usize, reason: String },

    #[error("config parse error: {0}")]
    Config(String),
}

impl DagologyError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotAcyclic { .. } => ErrorCode::NotAcyclic,
            Self::NotSquare { .. } => ErrorCode::NotSquare,
            Self::SelfLoop(_) => ErrorCode::SelfLoop,
            Self::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            Self::InvalidDimension(_) => ErrorCode::InvalidDimension,
            Self::InvalidChainLength(_) => ErrorCode::InvalidChainLength,
            Self::EmbeddingDimension { .. } => ErrorCode::EmbeddingDimension,
            Self::UnknownSignature(_) => ErrorCode::UnknownSignature,
            Self::UnknownSelection(_) => ErrorCode::UnknownSelection,
            Self::UnknownSpacelikeMethod(_) => ErrorCode::UnknownSpacelikeMethod,
            Self::UnknownGeometry(_) => ErrorCode::UnknownGeometry,
            Self::NoCausalOrder(_) => ErrorCode::NoCausalOrder,
            Self::InvalidParameter(_) => ErrorCode::InvalidParameter,
            Self::InvalidDegreeSequence(_) => ErrorCode::InvalidDegreeSequence,
            Self::CacheIo(_) => ErrorCode::CacheIo,
            Self::CacheCorrupt { .. } => ErrorCode::CacheCorrupt,
            Self::Config(_) => ErrorCode::ConfigParseError,
        }
    }

    /// Optional remediation hint for callers.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

/// Result alias used across the crate.
pub type Result<T, E = DagologyError> = std::result::Result<T, E>;
