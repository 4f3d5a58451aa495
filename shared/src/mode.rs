/// Operating mode of the governor, parameterizing every budget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Mode {
    #[default]
    Normal,
    Degraded,
    Emergency,
    Recovery,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::Degraded, Mode::Emergency, Mode::Recovery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Degraded => "degraded",
            Mode::Emergency => "emergency",
            Mode::Recovery => "recovery",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value for each [`Mode`]
#[derive(Clone, Debug, PartialEq)]
pub struct PerMode<T> {
    pub normal: T,
    pub degraded: T,
    pub emergency: T,
    pub recovery: T,
}

impl<T> PerMode<T> {
    pub fn new(normal: T, degraded: T, emergency: T, recovery: T) -> Self {
        Self {
            normal,
            degraded,
            emergency,
            recovery,
        }
    }

    pub fn get(&self, mode: Mode) -> &T {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Degraded => &self.degraded,
            Mode::Emergency => &self.emergency,
            Mode::Recovery => &self.recovery,
        }
    }

    pub fn get_mut(&mut self, mode: Mode) -> &mut T {
        match mode {
            Mode::Normal => &mut self.normal,
            Mode::Degraded => &mut self.degraded,
            Mode::Emergency => &mut self.emergency,
            Mode::Recovery => &mut self.recovery,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mode, &T)> {
        Mode::ALL.into_iter().map(move |mode| (mode, self.get(mode)))
    }
}
