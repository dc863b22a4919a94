//! Pipeline configuration pointed at a mock server and a temp directory

use scorecard_dl::{Config, RateLimitConfig};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::MockServer;

use super::fixtures::{API_PATH, TEST_KEY};

/// Config for a mock server, writing into `dir`, without pacing
pub fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        base_url: format!("{}{}", server.uri(), API_PATH),
        api_key: Some(TEST_KEY.to_string()),
        json_output: dir.path().join("college_scorecard.json"),
        csv_output: dir.path().join("college_scorecard_carnegie_basic.csv"),
        rate_limit: RateLimitConfig::None,
        ..Config::default()
    }
}

/// Output paths of a test config
pub fn outputs(config: &Config) -> (PathBuf, PathBuf) {
    (config.json_output.clone(), config.csv_output.clone())
}
