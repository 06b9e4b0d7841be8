//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a guide within the hair shape's guide storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuideId(pub u32);
