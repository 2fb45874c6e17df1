//! 场景配置
//!
//! 流量类别、处理路径与 episode 参数。全部可由 JSON 反序列化；
//! episode 参数缺省时使用参考场景的取值。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::net::{ClassId, PathId};
use crate::sim::SimTime;

/// 路由策略的概率编码最多支持两条路径（主 / 备）
pub const MAX_PATHS: usize = 2;

/// 流量类别配置（episode 内不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficClassConfig {
    pub name: String,
    pub num_generator_threads: usize,
    pub packet_size_bytes: u64,
    pub target_rate_mbps: f64,
    pub unit_price: f64,
}

impl TrafficClassConfig {
    pub fn new(
        name: impl Into<String>,
        num_generator_threads: usize,
        packet_size_bytes: u64,
        target_rate_mbps: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            num_generator_threads,
            packet_size_bytes,
            target_rate_mbps,
            unit_price,
        }
    }

    pub fn packet_bits(&self) -> f64 {
        self.packet_size_bytes as f64 * 8.0
    }

    /// 单个 generator 的发包间隔；速率为 0 时间隔无穷大，返回 None
    pub fn inter_arrival(&self) -> Option<SimTime> {
        if self.target_rate_mbps <= 0.0 {
            return None;
        }
        Some(SimTime::from_secs_f64(
            self.packet_bits() / (self.target_rate_mbps * 1e6),
        ))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let err = |field, expected, value| ConfigError::TrafficClass {
            name: self.name.clone(),
            field,
            expected,
            value,
        };
        if self.num_generator_threads == 0 {
            return Err(err("num_generator_threads", "> 0", 0.0));
        }
        if self.packet_size_bytes == 0 {
            return Err(err("packet_size_bytes", "> 0", 0.0));
        }
        if !self.target_rate_mbps.is_finite() || self.target_rate_mbps < 0.0 {
            return Err(err("target_rate_mbps", ">= 0", self.target_rate_mbps));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(err("unit_price", ">= 0", self.unit_price));
        }
        Ok(())
    }
}

/// 处理路径配置（episode 内不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    pub name: String,
    pub num_processor_threads: usize,
    pub queue_capacity_per_thread: usize,
    pub service_rate_mbps: f64,
    pub revenue_factor: f64,
}

impl PathConfig {
    pub fn new(
        name: impl Into<String>,
        num_processor_threads: usize,
        queue_capacity_per_thread: usize,
        service_rate_mbps: f64,
        revenue_factor: f64,
    ) -> Self {
        Self {
            name: name.into(),
            num_processor_threads,
            queue_capacity_per_thread,
            service_rate_mbps,
            revenue_factor,
        }
    }

    /// 有效队列容量 = 每线程容量 × 线程数
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity_per_thread
            .saturating_mul(self.num_processor_threads)
    }

    /// 以本路径服务速率处理一个 `packet_size_bytes` 字节 packet 的耗时
    pub fn service_time(&self, packet_size_bytes: u64) -> SimTime {
        SimTime::from_secs_f64(packet_size_bytes as f64 * 8.0 / (self.service_rate_mbps * 1e6))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let err = |field, expected, value| ConfigError::Path {
            name: self.name.clone(),
            field,
            expected,
            value,
        };
        if self.num_processor_threads == 0 {
            return Err(err("num_processor_threads", "> 0", 0.0));
        }
        if !self.service_rate_mbps.is_finite() || self.service_rate_mbps <= 0.0 {
            return Err(err("service_rate_mbps", "> 0", self.service_rate_mbps));
        }
        if !(0.0..=1.0).contains(&self.revenue_factor) {
            return Err(err("revenue_factor", "in [0, 1]", self.revenue_factor));
        }
        Ok(())
    }
}

fn default_duration_seconds() -> f64 {
    30.0
}
fn default_report_interval_seconds() -> f64 {
    5.0
}
fn default_dequeue_timeout_seconds() -> f64 {
    0.5
}
fn default_grace_seconds() -> f64 {
    2.0
}
fn default_scale_factor() -> f64 {
    10.0
}

/// episode 级参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: f64,
    #[serde(default = "default_report_interval_seconds")]
    pub report_interval_seconds: f64,
    #[serde(default = "default_dequeue_timeout_seconds")]
    pub processor_dequeue_timeout_seconds: f64,
    /// generator 停止后 processor 继续排空队列的时长
    #[serde(default = "default_grace_seconds")]
    pub processor_grace_seconds: f64,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// 路由随机数种子；None 时每个 worker 从系统熵初始化
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
            report_interval_seconds: default_report_interval_seconds(),
            processor_dequeue_timeout_seconds: default_dequeue_timeout_seconds(),
            processor_grace_seconds: default_grace_seconds(),
            scale_factor: default_scale_factor(),
            seed: None,
        }
    }
}

impl EpisodeConfig {
    pub fn duration(&self) -> SimTime {
        SimTime::from_secs_f64(self.duration_seconds)
    }

    pub fn report_interval(&self) -> SimTime {
        SimTime::from_secs_f64(self.report_interval_seconds)
    }

    pub fn dequeue_timeout(&self) -> SimTime {
        SimTime::from_secs_f64(self.processor_dequeue_timeout_seconds)
    }

    /// processor 的终止时刻（相对其启动）：duration + grace
    pub fn processor_deadline(&self) -> SimTime {
        self.duration()
            .saturating_add(SimTime::from_secs_f64(self.processor_grace_seconds))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("duration_seconds", self.duration_seconds),
            ("report_interval_seconds", self.report_interval_seconds),
            (
                "processor_dequeue_timeout_seconds",
                self.processor_dequeue_timeout_seconds,
            ),
            ("scale_factor", self.scale_factor),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Episode {
                    field,
                    expected: "> 0",
                    value,
                });
            }
        }
        if !self.processor_grace_seconds.is_finite() || self.processor_grace_seconds < 0.0 {
            return Err(ConfigError::Episode {
                field: "processor_grace_seconds",
                expected: ">= 0",
                value: self.processor_grace_seconds,
            });
        }
        Ok(())
    }
}

/// 完整场景：流量类别 + 路径 + episode 参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub traffic_classes: Vec<TrafficClassConfig>,
    pub paths: Vec<PathConfig>,
    #[serde(default)]
    pub episode: EpisodeConfig,
}

impl Default for ScenarioConfig {
    /// 参考场景：三类流量（TF1/TF2/TF3）竞争两条路径（NR 主路径 / WF 备用路径）
    fn default() -> Self {
        Self {
            traffic_classes: vec![
                TrafficClassConfig::new("TF1", 4, 1024, 100.0, 10.0),
                TrafficClassConfig::new("TF2", 4, 1024, 200.0, 20.0),
                TrafficClassConfig::new("TF3", 1, 10240, 1024.0, 3.0),
            ],
            paths: vec![
                PathConfig::new("NR", 2, 200, 100.0, 0.9),
                PathConfig::new("WF", 1, 200, 100.0, 0.1),
            ],
            episode: EpisodeConfig::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn class(&self, id: ClassId) -> Option<&TrafficClassConfig> {
        self.traffic_classes.get(id.0)
    }

    pub fn path(&self, id: PathId) -> Option<&PathConfig> {
        self.paths.get(id.0)
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.traffic_classes.len()).map(ClassId)
    }

    pub fn path_ids(&self) -> impl Iterator<Item = PathId> + '_ {
        (0..self.paths.len()).map(PathId)
    }

    /// 校验全部配置项（不含路由策略）
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.traffic_classes.is_empty() {
            return Err(ConfigError::NoTrafficClasses);
        }
        if self.paths.is_empty() {
            return Err(ConfigError::NoPaths);
        }
        if self.paths.len() > MAX_PATHS {
            return Err(ConfigError::TooManyPaths {
                max: MAX_PATHS,
                actual: self.paths.len(),
            });
        }
        for tc in &self.traffic_classes {
            tc.validate()?;
        }
        for path in &self.paths {
            path.validate()?;
        }
        self.episode.validate()
    }
}
