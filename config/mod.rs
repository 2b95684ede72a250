use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// kdtree-cli 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdTreeConfig {
    /// 随机负载配置
    pub workload: WorkloadConfig,

    /// 快照持久化配置
    pub persistence: PersistenceConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 随机负载配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// 随机插入的点数
    #[serde(default = "default_random_points")]
    pub random_points: usize,

    /// 随机数种子
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// 范围查询和最近邻查询各执行的次数
    #[serde(default = "default_queries")]
    pub queries: usize,
}

/// 快照持久化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// 是否在负载结束后导出快照
    #[serde(default = "default_persistence_enabled")]
    pub enabled: bool,

    /// 快照文件路径，扩展名决定格式（.json 为 JSON，其余为二进制）
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: PathBuf,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_random_points() -> usize {
    1000
}

fn default_seed() -> u64 {
    42
}

fn default_queries() -> usize {
    100
}

fn default_persistence_enabled() -> bool {
    false
}

fn default_snapshot_file() -> PathBuf {
    PathBuf::from("./data/kdtree.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for KdTreeConfig {
    fn default() -> Self {
        Self {
            workload: WorkloadConfig {
                random_points: default_random_points(),
                seed: default_seed(),
                queries: default_queries(),
            },
            persistence: PersistenceConfig {
                enabled: default_persistence_enabled(),
                snapshot_file: default_snapshot_file(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                output: default_log_output(),
                log_file: None,
            },
        }
    }
}

impl KdTreeConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（KDTREE__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use kdtree_st::config::KdTreeConfig;
    ///
    /// // 加载配置（如果文件不存在，使用默认配置）
    /// let config = KdTreeConfig::from_file("kdtree.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            // 1. 加载默认配置（内嵌）
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            // 2. 加载用户配置（可选，不存在不报错）
            .add_source(config::File::with_name(path).required(false))
            // 3. 加载环境变量（KDTREE__ 前缀，双下划线分隔嵌套）
            .add_source(config::Environment::with_prefix("KDTREE").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 验证配置
    ///
    /// 检查日志级别、日志输出，以及启用持久化时快照目录是否可用
    pub fn validate(&self) -> Result<(), String> {
        // 验证日志级别
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        // 验证日志输出
        match self.logging.output.as_str() {
            "stdout" => {}
            "file" => {
                if self.logging.log_file.is_none() {
                    return Err(
                        "Log output is 'file' but log_file path is not specified".to_string()
                    );
                }
            }
            other => {
                return Err(format!(
                    "Invalid log output: '{}'. Must be one of: stdout, file",
                    other
                ))
            }
        }

        // 验证快照目录（尝试创建）
        if self.persistence.enabled {
            if let Some(dir) = self.persistence.snapshot_file.parent() {
                if !dir.as_os_str().is_empty() && !dir.exists() {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        format!(
                            "Failed to create snapshot directory '{}': {}",
                            dir.display(),
                            e
                        )
                    })?;
                }
            }
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 kdtree-cli Configuration:");
        println!("   Random Points: {}", self.workload.random_points);
        println!("   Seed:          {}", self.workload.seed);
        println!("   Queries:       {}", self.workload.queries);
        println!();
        println!(
            "   Snapshot:      {}",
            if self.persistence.enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        if self.persistence.enabled {
            println!(
                "   Snapshot File: {}",
                self.persistence.snapshot_file.display()
            );
        }
        println!();
        println!("   Log Level:     {}", self.logging.level);
        println!("   Log Output:    {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:      {}", log_file.display());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KdTreeConfig::default();
        assert_eq!(config.workload.random_points, 1000);
        assert_eq!(config.workload.seed, 42);
        assert!(!config.persistence.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = KdTreeConfig::default();

        // 有效配置
        assert!(config.validate().is_ok());

        // 无效日志级别
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "debug".to_string();

        // 文件输出但没有路径
        config.logging.output = "file".to_string();
        assert!(config.validate().is_err());
        config.logging.log_file = Some(PathBuf::from("kdtree.log"));
        assert!(config.validate().is_ok());

        // 未知输出
        config.logging.output = "syslog".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_creates_snapshot_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = KdTreeConfig::default();
        config.persistence.enabled = true;
        config.persistence.snapshot_file = temp_dir.path().join("nested").join("tree.bin");

        config.validate().unwrap();
        assert!(temp_dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_save_and_load() {
        use tempfile::NamedTempFile;

        let mut config = KdTreeConfig::default();
        config.workload.random_points = 250;
        config.workload.seed = 7;
        let temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let path = temp_file.path().to_str().unwrap();

        // 保存
        config.save_to_file(path).unwrap();

        // 加载
        let loaded = KdTreeConfig::from_file(path).unwrap();
        assert_eq!(loaded.workload.random_points, 250);
        assert_eq!(loaded.workload.seed, 7);
        assert_eq!(loaded.logging.level, config.logging.level);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let loaded = KdTreeConfig::from_file("definitely-not-here.toml").unwrap();
        assert_eq!(loaded.workload.queries, 100);
        assert_eq!(
            loaded.persistence.snapshot_file,
            PathBuf::from("./data/kdtree.json")
        );
    }
}
