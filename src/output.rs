//! 報表輸出

use std::io::{self, Write};

use serde::ser::{SerializeMap, Serializer};
use thiserror::Error;

use crate::domain_types::{MetricValue, MetricsReport};

const RULE_WIDTH: usize = 40;

/// 報表輸出錯誤
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("寫入報表失敗: {0}")]
    Io(#[from] io::Error),

    #[error("JSON 序列化失敗: {0}")]
    Json(#[from] serde_json::Error),
}

/// 報表輸出目標
pub trait ReportSink {
    /// 輸出一條命名序列的報表
    fn write_report(&mut self, name: &str, report: &MetricsReport) -> Result<(), OutputError>;

    /// 所有報表輸出完畢
    fn finish(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// 純文字輸出
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn write_report(&mut self, name: &str, report: &MetricsReport) -> Result<(), OutputError> {
        writeln!(self.writer, "\n=== Results for {} ===", name)?;
        for (metric, value) in report.iter() {
            match value {
                MetricValue::Scalar(value) => writeln!(self.writer, "{}: {}", metric, value)?,
                MetricValue::Map(entries) => {
                    writeln!(self.writer, "{}:", metric)?;
                    for (key, value) in entries {
                        writeln!(self.writer, "  - {}: {}", key, value)?;
                    }
                }
            }
        }
        writeln!(self.writer, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// JSON 輸出：一個以序列名稱為鍵的物件
pub struct JsonSink<W: Write> {
    writer: W,
    reports: Vec<(String, MetricsReport)>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            reports: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn write_report(&mut self, name: &str, report: &MetricsReport) -> Result<(), OutputError> {
        self.reports.push((name.to_string(), report.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        let mut serializer = serde_json::Serializer::pretty(&mut self.writer);
        let mut map = serializer.serialize_map(Some(self.reports.len()))?;
        for (name, report) in &self.reports {
            map.serialize_entry(name, report)?;
        }
        map.end()?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// 依格式名稱建立輸出目標
pub fn sink_for<'a, W: Write + 'a>(format: &str, writer: W) -> Box<dyn ReportSink + 'a> {
    match format.to_lowercase().as_str() {
        "json" => Box::new(JsonSink::new(writer)),
        _ => Box::new(TextSink::new(writer)),
    }
}
