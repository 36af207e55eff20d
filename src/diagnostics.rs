use std::fmt;

use crate::network::CornerSlot;

/// A recoverable problem met while building one intersection.
///
/// Diagnostics never stop the sweep; they are logged as they happen and
/// collected into the build report.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Left and right lane samples diverged in count; the shorter list was padded.
    ExtremeAngle { intersection: String, road: String },
    /// No edge crossing was found for a corner, even with the edges extended; the
    /// nearest-sample midpoint was used.
    MissingCorner { intersection: String, slot: CornerSlot },
    /// The partner endpoint never became ready during the sweep.
    Deferred { intersection: String },
    /// Building the intersection failed; the rest of the network was still processed.
    Failed { intersection: String, message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtremeAngle { intersection, road } => write!(
                f,
                "{intersection} on {road}: intersection at too extreme an angle to process; \
                 reduce angle or lane count"
            ),
            Self::MissingCorner { intersection, slot } => write!(
                f,
                "{intersection}: no edge crossing for corner {slot}; using nearest samples"
            ),
            Self::Deferred { intersection } => {
                write!(f, "{intersection}: partner endpoint never became ready")
            }
            Self::Failed {
                intersection,
                message,
            } => write!(f, "{intersection}: {message}"),
        }
    }
}
