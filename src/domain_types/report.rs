//! 績效報表

use serde::ser::{Serialize, SerializeMap, Serializer};

/// 報表中的單一值：格式化後的純量，或帶標籤的小型子映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    Scalar(String),
    Map(Vec<(String, String)>),
}

impl MetricValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        MetricValue::Scalar(value.into())
    }

    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        MetricValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            MetricValue::Scalar(value) => Some(value),
            MetricValue::Map(_) => None,
        }
    }

    /// 取子映射中指定標籤的值
    pub fn field(&self, key: &str) -> Option<&str> {
        match self {
            MetricValue::Scalar(_) => None,
            MetricValue::Map(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Scalar(value) => serializer.serialize_str(value),
            MetricValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// 依固定順序排列的指標名稱與值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsReport {
    entries: Vec<(String, MetricValue)>,
}

impl MetricsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: MetricValue) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MetricsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
