use std::borrow::Cow;

/// Biome name without its namespace, as reported by the host, e.g. `"deep_ocean"`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(Cow<'static, str>);

impl BiomeId {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for BiomeId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl std::fmt::Display for BiomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How fluids behave in one biome
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeProfile {
    pub name: BiomeId,
    /// Scales every computed priority. Kept within 0.2..=1.0.
    pub flow_multiplier: f32,
    /// Kept within 4..=12 blocks.
    pub max_spread_radius: u8,
    /// Whether two adjacent sources create a new source here
    pub infinite_source: bool,
    pub allow_pressure: bool,
    /// Kept within 0.3..=0.9.
    pub update_frequency: f32,
}

impl BiomeProfile {
    pub const MIN_FLOW_MULTIPLIER: f32 = 0.2;
    pub const MAX_FLOW_MULTIPLIER: f32 = 1.0;
    pub const MIN_SPREAD_RADIUS: u8 = 4;
    pub const MAX_SPREAD_RADIUS: u8 = 12;
    pub const MIN_UPDATE_FREQUENCY: f32 = 0.3;
    pub const MAX_UPDATE_FREQUENCY: f32 = 0.9;

    pub fn new(
        name: impl Into<BiomeId>,
        flow_multiplier: f32,
        max_spread_radius: u8,
        infinite_source: bool,
        allow_pressure: bool,
        update_frequency: f32,
    ) -> Self {
        Self {
            name: name.into(),
            flow_multiplier,
            max_spread_radius,
            infinite_source,
            allow_pressure,
            update_frequency,
        }
        .clamped()
    }

    /// Profile used for biomes without an entry, and whenever the biome
    /// lookup fails. Leaves priorities unscaled.
    pub fn fallback() -> Self {
        Self {
            name: BiomeId::from_static("default"),
            flow_multiplier: 1.0,
            max_spread_radius: 8,
            infinite_source: false,
            allow_pressure: false,
            update_frequency: 0.8,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.flow_multiplier = clamp_f32(
            self.flow_multiplier,
            Self::MIN_FLOW_MULTIPLIER,
            Self::MAX_FLOW_MULTIPLIER,
        );
        self.max_spread_radius = self
            .max_spread_radius
            .clamp(Self::MIN_SPREAD_RADIUS, Self::MAX_SPREAD_RADIUS);
        self.update_frequency = clamp_f32(
            self.update_frequency,
            Self::MIN_UPDATE_FREQUENCY,
            Self::MAX_UPDATE_FREQUENCY,
        );
        self
    }
}

impl Default for BiomeProfile {
    fn default() -> Self {
        Self::fallback()
    }
}

// NaN collapses to the lower bound
fn clamp_f32(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}
