#![forbid(unsafe_code)]

//! Bandwidth and profile reducing orderings for sparse symmetric graphs.
//!
//! `narwhal` renumbers the nodes of a graph (typically the equation connectivity graph of a
//! sparse symmetric matrix) so that banded or skyline solvers touch fewer entries. Each
//! connected component gets a Gibbs-Poole-Stockmeyer level structure built from a
//! pseudo-diameter, which is then numbered with reverse Cuthill-McKee when minimizing the
//! bandwidth or with King's rule when minimizing the profile.
//!
//! All working storage comes from a caller-supplied [`ScratchArena`]. An arena that turns out
//! too small yields [`Error::NoSpace`] with the size to retry with;
//! [`ScratchArena::sufficient`] never runs out.
//!
//! ```
//! use narwhal::{GraphInput, Objective, ScratchArena};
//!
//! let graph = GraphInput::from_edges(4, &[(1, 3), (3, 2), (2, 4)])?;
//! let mut scratch = ScratchArena::sufficient(graph.node_count);
//! let out = narwhal::reorder(&graph, Objective::Bandwidth, &mut scratch)?;
//! assert_eq!(out.bandwidth, 1);
//! # Ok::<(), narwhal::Error>(())
//! ```

mod combine;
mod diameter;
pub mod error;
pub mod graph;
mod level;
mod measure;
mod number;
mod order;
pub mod scratch;
mod sort;

pub use error::{Error, ParseObjectiveError, Result};
pub use graph::{GraphInput, GraphOutput};
pub use measure::{Envelope, measure};
pub use order::{minimize_bandwidth_or_profile, reorder};
pub use scratch::ScratchArena;

use serde::{Deserialize, Serialize};

/// What the numbering optimizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Reverse Cuthill-McKee numbering; keeps the smaller bandwidth.
    #[default]
    Bandwidth,
    /// King numbering; keeps the smaller profile, also trying the reversed numbering.
    Profile,
}

impl std::str::FromStr for Objective {
    type Err = ParseObjectiveError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bandwidth" | "band" | "rcm" => Ok(Self::Bandwidth),
            "profile" | "king" => Ok(Self::Profile),
            _ => Err(ParseObjectiveError {
                name: s.trim().to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bandwidth => "bandwidth",
            Self::Profile => "profile",
        })
    }
}
