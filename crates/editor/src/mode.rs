/// Editing mode of the placement controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildMode {
    #[default]
    Build,
    Demolish,
}

impl BuildMode {
    pub const ALL: [BuildMode; 2] = [BuildMode::Build, BuildMode::Demolish];

    /// `0 = Build`, `1 = Demolish`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            BuildMode::Build => 0,
            BuildMode::Demolish => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BuildMode::Build => "Build",
            BuildMode::Demolish => "Demolish",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for mode in BuildMode::ALL {
            assert_eq!(BuildMode::from_index(mode.index()), Some(mode));
        }
        assert_eq!(BuildMode::from_index(2), None);
    }
}
