//! Error type shared by record validation and the ray algebra.

/// Result alias for fault operations.
pub type Result<T> = std::result::Result<T, FaultError>;

/// Recoverable failures. Messages keep the wording of the grdecl tooling so
/// users grepping logs find the same text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaultError {
    /// Face code outside the 12 accepted codes.
    #[error("Invalid face:{0}")]
    InvalidFace(String),

    /// `X1 > X2` for one of the I/J/K ranges.
    #[error("Invalid {0}1 {0}2 indices")]
    InvalidOrder(char),

    /// Index outside the grid dimensions.
    #[error("Invalid {name}:{value}")]
    IndexOutOfRange { name: &'static str, value: i64 },

    /// Face class and span disagree (e.g. an X face spanning several I).
    #[error("For face:{face} we must have {axis}1 == {axis}2")]
    FaceSpan { face: String, axis: char },

    #[error("Can not form ray from coincident points")]
    CoincidentPoints,

    /// Ray points that are not aligned along exactly one axis.
    #[error("Invalid direction")]
    InvalidDirection,

    #[error("Rays will never intersect")]
    RaysNeverIntersect,

    #[error("Faults {first} and {second} could not be uniquely joined")]
    NotUniquelyJoined { first: String, second: String },

    #[error("The fault {fault} can not be extended to intersect with:{target}")]
    CannotExtend { fault: String, target: String },

    #[error("Fault {fault} has no layer k={k}")]
    MissingLayer { fault: String, k: usize },

    #[error("Polyline must have at least two points, got {len}")]
    PolylineTooShort { len: usize },

    #[error("Fault {0} already exists in collection")]
    DuplicateFault(String),
}
