//! 帳戶匯出檔讀取器
//!
//! 匯出檔為 Tab 分隔文字，欄位為 `DATE, BALANCE, EQUITY, DEPOSIT LOAD`，
//! 通常以 UTF-16 編碼並帶有 BOM。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{IngestError, IngestResult};
use crate::domain_types::RawRecord;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// 匯出檔欄位名稱（依檔案中的順序）
pub const EXPORT_FIELDS: [&str; 4] = ["DATE", "BALANCE", "EQUITY", "DEPOSIT LOAD"];

/// 讀取器配置
#[derive(Debug, Clone)]
pub struct ExportReaderConfig {
    /// 分隔符
    pub delimiter: u8,
    /// 要跳過的標題行數
    pub header_rows: usize,
    /// 檔案副檔名（不含點）
    pub extension: String,
}

impl Default for ExportReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            header_rows: 1,
            extension: "csv".to_string(),
        }
    }
}

/// 匯出檔讀取器
#[derive(Debug, Clone, Default)]
pub struct ExportReader {
    config: ExportReaderConfig,
}

impl ExportReader {
    pub fn new(config: ExportReaderConfig) -> Self {
        Self { config }
    }

    /// 列出目錄中符合副檔名的檔案（依檔名排序）
    pub fn discover<P: AsRef<Path>>(&self, directory: P) -> IngestResult<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(directory.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && self.matches_extension(path))
            .collect();
        files.sort();

        debug!(
            directory = %directory.as_ref().display(),
            count = files.len(),
            "找到匯出檔"
        );
        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(&self.config.extension))
            .unwrap_or(false)
    }

    /// 從檔案路徑讀取
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> IngestResult<Vec<RawRecord>> {
        let bytes = fs::read(path.as_ref())?;
        self.read_bytes(&bytes)
    }

    /// 從字節數組讀取（自動處理 BOM 與編碼）
    pub fn read_bytes(&self, data: &[u8]) -> IngestResult<Vec<RawRecord>> {
        let text = decode_export(data)?;
        self.read_str(&text)
    }

    /// 從已解碼的文字讀取
    ///
    /// 欄位過多的行會被跳過；欄位不足時缺少的欄位視為空值。
    pub fn read_str(&self, text: &str) -> IngestResult<Vec<RawRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            if index < self.config.header_rows {
                continue;
            }
            let line = record
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(index + 1);

            if record.len() > EXPORT_FIELDS.len() {
                warn!(line, fields = record.len(), "跳過欄位數不符的行");
                skipped += 1;
                continue;
            }

            let field = |i: usize| record.get(i).filter(|value| !value.is_empty());
            records.push(RawRecord {
                timestamp: field(0).map(str::to_string),
                balance: parse_number(field(1), line, "BALANCE")?,
                equity: parse_number(field(2), line, "EQUITY")?,
                deposit_load: parse_number(field(3), line, "DEPOSIT LOAD")?,
                line: Some(line),
            });
        }

        debug!(records = records.len(), skipped, "匯出檔解析完成");
        Ok(records)
    }
}

fn parse_number(value: Option<&str>, line: usize, field: &'static str) -> IngestResult<Option<f64>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let normalized: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    normalized
        .parse::<f64>()
        .map(Some)
        .map_err(|e| IngestError::parse(line, field, value, e.to_string()))
}

/// 帳戶名稱取自檔名（不含副檔名）
pub fn account_name<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 解碼匯出檔內容
///
/// 先移除 UTF-8 BOM，再依 UTF-16 BOM 或位元組型態判斷是否為 UTF-16。
pub fn decode_export(data: &[u8]) -> IngestResult<String> {
    let data = data.strip_prefix(&UTF8_BOM[..]).unwrap_or(data);

    if let Some(rest) = data.strip_prefix(&UTF16_LE_BOM[..]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = data.strip_prefix(&UTF16_BE_BOM[..]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    if looks_like_utf16_le(data) {
        return decode_utf16(data, u16::from_le_bytes);
    }

    String::from_utf8(data.to_vec()).map_err(|e| IngestError::Decode(e.to_string()))
}

fn looks_like_utf16_le(data: &[u8]) -> bool {
    data.len() >= 2 && data.len() % 2 == 0 && data[0] != 0 && data[1] == 0
}

fn decode_utf16(data: &[u8], to_unit: fn([u8; 2]) -> u16) -> IngestResult<String> {
    if data.len() % 2 != 0 {
        return Err(IngestError::Decode("UTF-16 內容長度不是偶數".to_string()));
    }
    let units = data.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| IngestError::Decode(e.to_string()))
}
