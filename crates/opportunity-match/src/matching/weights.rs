use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_SKILL_WEIGHT: f64 = 0.7;
pub const DEFAULT_TAG_WEIGHT: f64 = 0.3;

/// Allowed distance between the weight sum and 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Validated pair of scoring weights. Construct through [`MatchWeights::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightPair", into = "WeightPair")]
pub struct MatchWeights {
    skill: f64,
    tag: f64,
}

impl MatchWeights {
    pub fn new(skill: f64, tag: f64) -> Result<Self, InvalidWeightConfiguration> {
        let sum = skill + tag;
        let valid = skill.is_finite()
            && tag.is_finite()
            && skill >= 0.0
            && tag >= 0.0
            && (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE;

        if valid {
            Ok(Self { skill, tag })
        } else {
            Err(InvalidWeightConfiguration { skill, tag, sum })
        }
    }

    pub fn skill(&self) -> f64 {
        self.skill
    }

    pub fn tag(&self) -> f64 {
        self.tag
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skill: DEFAULT_SKILL_WEIGHT,
            tag: DEFAULT_TAG_WEIGHT,
        }
    }
}

/// Unvalidated wire form of a weight pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    pub skill: f64,
    pub tag: f64,
}

impl TryFrom<WeightPair> for MatchWeights {
    type Error = InvalidWeightConfiguration;

    fn try_from(pair: WeightPair) -> Result<Self, Self::Error> {
        MatchWeights::new(pair.skill, pair.tag)
    }
}

impl From<MatchWeights> for WeightPair {
    fn from(weights: MatchWeights) -> Self {
        Self {
            skill: weights.skill,
            tag: weights.tag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("match weights must be non-negative and sum to 1.0 (skill {skill}, tag {tag}, sum {sum})")]
pub struct InvalidWeightConfiguration {
    pub skill: f64,
    pub tag: f64,
    pub sum: f64,
}

/// Shared holder for the one weight pair in effect.
///
/// Scoring reads [`WeightSettings::current`] once per request; nothing caches the pair.
/// A rejected update leaves the previous pair in place.
#[derive(Debug, Clone, Default)]
pub struct WeightSettings {
    inner: Arc<RwLock<MatchWeights>>,
}

impl WeightSettings {
    pub fn new(weights: MatchWeights) -> Self {
        Self {
            inner: Arc::new(RwLock::new(weights)),
        }
    }

    pub fn current(&self) -> MatchWeights {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update(&self, pair: WeightPair) -> Result<MatchWeights, InvalidWeightConfiguration> {
        let weights = match MatchWeights::try_from(pair) {
            Ok(weights) => weights,
            Err(err) => {
                warn!(skill = pair.skill, tag = pair.tag, "rejected match weight update");
                return Err(err);
            }
        };

        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = weights;
        info!(
            skill = weights.skill,
            tag = weights.tag,
            "match weights updated"
        );
        Ok(weights)
    }
}
