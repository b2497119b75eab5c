use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// Guarantee given to the first revealed cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartTile {
    #[default]
    Random,
    #[serde(alias = "simple_safe")]
    Safe,
    #[serde(alias = "always_zero")]
    Zero,
}

impl core::str::FromStr for StartTile {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "safe" => Ok(Self::Safe),
            "zero" => Ok(Self::Zero),
            other => Err(format!(
                "unknown start tile {other:?}, expected random, safe or zero"
            )),
        }
    }
}
