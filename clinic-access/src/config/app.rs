use dotenvy::dotenv;
use std::env;

use crate::error::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// ナビゲーション設定(JSON)のパス。未設定なら組み込みのメニューを使う
    pub navigation_config_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid PORT value".to_string()))?;

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            navigation_config_path: env::var("NAVIGATION_CONFIG_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty()),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_test(&self) -> bool {
        self.environment == "test"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            navigation_config_path: None,
        }
    }
}
