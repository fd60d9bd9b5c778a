use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarbonError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Calculation error: {message}")]
    CalculationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Config,
    Data,
    Calculation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CarbonError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CarbonError::IoError(_) | CarbonError::ZipError(_) => ErrorCategory::Io,
            CarbonError::CsvError(_) | CarbonError::SerializationError(_) => ErrorCategory::Data,
            CarbonError::ConfigError { .. }
            | CarbonError::ConfigValidationError { .. }
            | CarbonError::InvalidConfigValueError { .. }
            | CarbonError::MissingConfigError { .. } => ErrorCategory::Config,
            CarbonError::CalculationError { .. } => ErrorCategory::Calculation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Calculation => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CarbonError::IoError(_) => {
                "檢查輸入檔案是否存在，以及輸出目錄是否可寫入".to_string()
            }
            CarbonError::ZipError(_) => "確認輸出目錄有足夠空間後重試".to_string(),
            CarbonError::CsvError(_) | CarbonError::SerializationError(_) => {
                "檢查計算結果中是否含有無法序列化的數值 (NaN/Inf)".to_string()
            }
            CarbonError::ConfigError { .. } => "檢查設定檔格式是否為合法的 TOML".to_string(),
            CarbonError::ConfigValidationError { field, .. }
            | CarbonError::InvalidConfigValueError { field, .. } => {
                format!("修正設定欄位 '{}' 後重試", field)
            }
            CarbonError::MissingConfigError { field } => {
                format!("在設定檔中加入必要欄位 '{}'", field)
            }
            CarbonError::CalculationError { .. } => {
                "檢查燃料、用電及產量數據是否合理".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("讀寫檔案失敗: {}", self),
            ErrorCategory::Config => format!("設定錯誤: {}", self),
            ErrorCategory::Data => format!("輸出數據處理失敗: {}", self),
            ErrorCategory::Calculation => format!("碳排放計算失敗: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CarbonError>;
