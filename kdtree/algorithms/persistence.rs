use crate::kdtree::kdtree::KdTree;
use crate::kdtree::point::Point;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;
use tracing::info;

/// 持久化错误类型
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Binary serialization error: {0}")]
    Binary(#[from] bincode::Error),
    #[error("Invalid file format")]
    InvalidFormat,
}

/// 序列化格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    /// JSON格式 - 可读性好，方便调试
    Json,
    /// 二进制格式 - 性能好，体积小
    Binary,
}

impl SerializationFormat {
    /// 根据文件扩展名自动判断格式，`.json` 之外都按二进制处理
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("json") => SerializationFormat::Json,
            _ => SerializationFormat::Binary,
        }
    }
}

/// 快照中的一个条目
#[derive(Serialize)]
struct EntryRef<'a, V> {
    point: &'a Point,
    value: &'a V,
}

#[derive(Deserialize)]
struct Entry<V> {
    point: Point,
    value: V,
}

/// 序列化为按广度优先顺序排列的 `{point, value}` 列表
///
/// 节点矩形不写出（根节点矩形是无穷大，JSON 无法表示），
/// 加载时按同样顺序重新插入即可恢复完全相同的树形
impl<V: Serialize> Serialize for KdTree<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // 先收集成 Vec，bincode 需要事先知道序列长度
        let entries: Vec<EntryRef<'_, V>> = self
            .iter()
            .map(|(point, value)| EntryRef { point, value })
            .collect();
        entries.serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for KdTree<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Entry<V>>::deserialize(deserializer)?;
        KdTree::try_from_entries(entries.into_iter().map(|e| (e.point, e.value)))
            .map_err(de::Error::custom)
    }
}

/// 2d-tree持久化功能实现
impl<V> KdTree<V> {
    /// 导出到文件
    ///
    /// 根据文件扩展名自动选择序列化格式：
    /// - .json -> JSON格式（调试友好）
    /// - 其他 -> 二进制格式（高性能）
    pub fn dump_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError>
    where
        V: Serialize,
    {
        let format = SerializationFormat::from_extension(&path);
        self.dump_to_file_with_format(path, format)
    }

    /// 使用指定格式导出到文件
    ///
    /// 先写临时文件再重命名，避免留下写了一半的快照
    pub fn dump_to_file_with_format<P: AsRef<Path>>(
        &self,
        path: P,
        format: SerializationFormat,
    ) -> Result<(), PersistenceError>
    where
        V: Serialize,
    {
        let path = path.as_ref();

        let temp_path = path.with_extension(format!(
            "{}.tmp",
            path.extension().unwrap_or_default().to_string_lossy()
        ));

        let data = match format {
            SerializationFormat::Json => serde_json::to_vec_pretty(self)?,
            SerializationFormat::Binary => bincode::serialize(self)?,
        };

        fs::write(&temp_path, &data)?;
        fs::rename(&temp_path, path)?;

        info!(
            "dumped {} points to {} ({:?}, {} bytes)",
            self.size(),
            path.display(),
            format,
            data.len()
        );
        Ok(())
    }

    /// 从文件加载，格式由扩展名决定
    ///
    /// # 示例
    /// ```
    /// use kdtree_st::{KdTree, Point};
    /// use tempfile::TempDir;
    ///
    /// let dir = TempDir::new().unwrap();
    /// let path = dir.path().join("points.json");
    ///
    /// let mut tree = KdTree::new();
    /// tree.put(Point::new(0.5, 0.5), "center".to_string()).unwrap();
    /// tree.dump_to_file(&path).unwrap();
    ///
    /// let loaded: KdTree<String> = KdTree::load_from_file(&path).unwrap();
    /// assert_eq!(loaded.size(), 1);
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<KdTree<V>, PersistenceError>
    where
        V: DeserializeOwned,
    {
        let format = SerializationFormat::from_extension(&path);
        Self::load_from_file_with_format(path, format)
    }

    /// 使用指定格式从文件加载
    pub fn load_from_file_with_format<P: AsRef<Path>>(
        path: P,
        format: SerializationFormat,
    ) -> Result<KdTree<V>, PersistenceError>
    where
        V: DeserializeOwned,
    {
        let path = path.as_ref();
        let data = fs::read(path)?;
        // 合法快照至少包含序列长度，空文件只可能是写入被截断
        if data.is_empty() {
            return Err(PersistenceError::InvalidFormat);
        }

        let tree: KdTree<V> = match format {
            SerializationFormat::Json => serde_json::from_slice(&data)?,
            SerializationFormat::Binary => bincode::deserialize(&data)?,
        };

        info!("loaded {} points from {}", tree.size(), path.display());
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdtree::rectangle::Rectangle;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> KdTree<String> {
        KdTree::try_from_entries(
            [
                (1.0, 0.125, "A"),
                (0.125, 0.875, "B"),
                (0.75, 0.0, "C"),
                (0.0, 0.375, "D"),
                (0.375, 1.0, "E"),
                (0.25, 0.5, "F"),
                (0.0625, 0.1875, "G"),
            ]
            .into_iter()
            .map(|(x, y, v)| (Point::new(x, y), v.to_string())),
        )
        .unwrap()
    }

    fn levels<V>(tree: &KdTree<V>) -> Vec<usize> {
        tree.iter_nodes().map(|node| node.level()).collect()
    }

    #[test]
    fn test_persistence_json() {
        let temp_dir = TempDir::new().unwrap();
        let json_path = temp_dir.path().join("test.json");

        let original = sample_tree();
        original.dump_to_file(&json_path).unwrap();

        // 验证文件存在且为JSON格式
        assert!(json_path.exists());
        let content = fs::read_to_string(&json_path).unwrap();
        assert!(content.contains("\"point\""));
        assert!(content.contains("\"value\": \"E\""));

        let loaded: KdTree<String> = KdTree::load_from_file(&json_path).unwrap();

        // 验证数据和树形一致
        assert_eq!(loaded.size(), original.size());
        assert_eq!(loaded.points(), original.points());
        assert_eq!(levels(&loaded), levels(&original));
        assert_eq!(
            loaded.get(&Point::new(0.375, 1.0)).unwrap(),
            Some(&"E".to_string())
        );
        assert_eq!(loaded.check_invariants(), Ok(()));
    }

    #[test]
    fn test_persistence_binary() {
        let temp_dir = TempDir::new().unwrap();
        let bin_path = temp_dir.path().join("test.bin");

        let original = sample_tree();
        original.dump_to_file(&bin_path).unwrap();
        assert!(bin_path.exists());

        let loaded: KdTree<String> = KdTree::load_from_file(&bin_path).unwrap();
        assert_eq!(loaded.points(), original.points());
        assert_eq!(levels(&loaded), levels(&original));

        let query = Rectangle::new(0.0, 0.0, 0.5, 0.5);
        assert_eq!(
            loaded.range(&query).unwrap().len(),
            original.range(&query).unwrap().len()
        );
    }

    #[test]
    fn test_empty_tree_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let json_path = temp_dir.path().join("empty.json");
        let bin_path = temp_dir.path().join("empty.bin");

        let empty: KdTree<i32> = KdTree::new();

        empty.dump_to_file(&json_path).unwrap();
        let loaded_json: KdTree<i32> = KdTree::load_from_file(&json_path).unwrap();
        assert!(loaded_json.is_empty());

        empty.dump_to_file(&bin_path).unwrap();
        let loaded_bin: KdTree<i32> = KdTree::load_from_file(&bin_path).unwrap();
        assert!(loaded_bin.is_empty());
    }

    #[test]
    fn test_format_auto_detection() {
        assert_eq!(
            SerializationFormat::from_extension("data.json"),
            SerializationFormat::Json
        );
        assert_eq!(
            SerializationFormat::from_extension("data.bin"),
            SerializationFormat::Binary
        );
        assert_eq!(
            SerializationFormat::from_extension("data"),
            SerializationFormat::Binary
        );
    }

    #[test]
    fn test_load_rejects_invalid_point() {
        let temp_dir = TempDir::new().unwrap();
        let json_path = temp_dir.path().join("bad.json");
        // 1e999 超出 f64 范围，JSON 解析阶段就会失败
        fs::write(
            &json_path,
            r#"[{"point": {"x": 1e999, "y": 0.0}, "value": 1}]"#,
        )
        .unwrap();

        let result: Result<KdTree<i32>, _> = KdTree::load_from_file(&json_path);
        assert!(matches!(result, Err(PersistenceError::Json(_))));
    }

    #[test]
    fn test_load_rejects_nan_point_binary() {
        let temp_dir = TempDir::new().unwrap();
        let bin_path = temp_dir.path().join("nan.bin");
        // bincode 中 {point, value} 与 (point, value) 字节相同，NaN 能原样写进快照
        let entries = vec![
            (Point::new(0.5, 0.5), 1),
            (
                Point {
                    x: f64::NAN,
                    y: 0.0,
                },
                2,
            ),
        ];
        fs::write(&bin_path, bincode::serialize(&entries).unwrap()).unwrap();

        let result: Result<KdTree<i32>, _> = KdTree::load_from_file(&bin_path);
        match result {
            Err(PersistenceError::Binary(e)) => assert!(e.to_string().contains("finite coordinates")),
            other => panic!("expected binary error, got {:?}", other.map(|t| t.size())),
        }
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["empty.json", "empty.bin"] {
            let path = temp_dir.path().join(name);
            fs::write(&path, b"").unwrap();
            let result: Result<KdTree<i32>, _> = KdTree::load_from_file(&path);
            assert!(matches!(result, Err(PersistenceError::InvalidFormat)));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result: Result<KdTree<i32>, _> =
            KdTree::load_from_file(temp_dir.path().join("missing.bin"));
        assert!(matches!(result, Err(PersistenceError::Io(_))));
    }
}
