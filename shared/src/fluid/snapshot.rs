use crate::types::FluidId;

/// Fluid found at a position when it was read
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FluidSnapshot {
    pub fluid: FluidId,
    /// Level of a flowing fluid, 1..=8. Ignored for sources.
    pub amount: u8,
    pub is_source: bool,
}

impl FluidSnapshot {
    pub fn source(fluid: FluidId) -> Self {
        Self {
            fluid,
            amount: 8,
            is_source: true,
        }
    }

    pub fn flowing(fluid: FluidId, amount: u8) -> Self {
        Self {
            fluid,
            amount,
            is_source: false,
        }
    }
}

/// Block-state facts the host already knows when it fires a fluid tick.
///
/// A `None` field is read through the [`FluidEngine`](crate::FluidEngine)
/// instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockSnapshot {
    pub below_is_empty: Option<bool>,
    pub neighbors_accepting_flow: Option<u8>,
}

impl BlockSnapshot {
    pub fn new(below_is_empty: bool, neighbors_accepting_flow: u8) -> Self {
        Self {
            below_is_empty: Some(below_is_empty),
            neighbors_accepting_flow: Some(neighbors_accepting_flow),
        }
    }
}
