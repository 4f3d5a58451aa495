mod oracle;
mod profile;

pub use oracle::BiomeTraitOracle;
pub use profile::{BiomeId, BiomeProfile};
