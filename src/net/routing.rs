//! 路由策略
//!
//! 策略向量为每个流量类别给出一个概率 `p`：以 `p` 选主路径，以 `1 - p` 选备用路径。
//! `PathChooser` 把该行展开成路径权重，并做加权随机选择（可推广到任意单纯形行）。

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};

use super::id::{ClassId, PathId};
use crate::error::ConfigError;

/// 每个流量类别分配给主路径的概率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingPolicy(Vec<f64>);

impl RoutingPolicy {
    pub fn new(primary_shares: Vec<f64>) -> Self {
        Self(primary_shares)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// 类别 `class` 的主路径概率
    pub fn primary_share(&self, class: ClassId) -> Option<f64> {
        self.0.get(class.0).copied()
    }

    /// 校验策略与场景的类别数、路径数是否匹配。
    pub fn validate(&self, num_classes: usize, num_paths: usize) -> Result<(), ConfigError> {
        if self.0.len() != num_classes {
            return Err(ConfigError::PolicyLength {
                expected: num_classes,
                actual: self.0.len(),
            });
        }
        for (idx, &p) in self.0.iter().enumerate() {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::PolicyProbability { class: idx, value: p });
            }
            // 只有一条路径时，补集概率无处可去
            if num_paths < 2 && p < 1.0 {
                return Err(ConfigError::MissingSecondaryPath { class: idx, value: p });
            }
        }
        Ok(())
    }

    /// 类别 `class` 在各路径上的权重 `[p, 1 - p]`，按路径数截断。
    pub fn path_weights(&self, class: ClassId, num_paths: usize) -> Option<Vec<f64>> {
        let p = self.primary_share(class)?;
        let mut weights = vec![p, 1.0 - p];
        weights.truncate(num_paths);
        Some(weights)
    }
}

impl From<Vec<f64>> for RoutingPolicy {
    fn from(v: Vec<f64>) -> Self {
        Self(v)
    }
}

/// 单个流量类别的加权路径选择器
#[derive(Debug, Clone)]
pub struct PathChooser {
    dist: WeightedIndex<f64>,
}

impl PathChooser {
    /// `weights[i]` 为选中 `PathId(i)` 的概率质量。
    pub fn new(class: ClassId, weights: &[f64]) -> Result<Self, ConfigError> {
        let dist = WeightedIndex::new(weights).map_err(|e| ConfigError::RoutingWeights {
            class: class.0,
            reason: e.to_string(),
        })?;
        Ok(Self { dist })
    }

    /// 由策略构造类别 `class` 的选择器
    pub fn from_policy(
        policy: &RoutingPolicy,
        class: ClassId,
        num_paths: usize,
    ) -> Result<Self, ConfigError> {
        let weights = policy
            .path_weights(class, num_paths)
            .ok_or(ConfigError::PolicyLength {
                expected: class.0 + 1,
                actual: policy.len(),
            })?;
        Self::new(class, &weights)
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> PathId {
        PathId(self.dist.sample(rng))
    }
}
