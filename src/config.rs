/// 配置管理模組
///
/// 本模組負責加載與驗證系統配置。
/// 配置依序來自內建預設值、環境對應的 TOML 文件與 `PORTFOLIO__*` 環境變數。
pub mod loader;
pub mod types;
pub mod validation;

// 重新導出常用組件
pub use loader::{ConfigLoadError, ConfigLoader, Environment};
pub use types::*;
pub use validation::{ValidationError, ValidationUtils, Validator};
