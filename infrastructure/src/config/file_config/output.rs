//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Directory history exports are written to
    pub export_dir: PathBuf,
    /// JSONL conversation log; disabled when unset
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily-rolling diagnostic logs; stderr only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            export_dir: PathBuf::from("."),
            conversation_log: None,
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths_deserialize() {
        let toml_str = r#"
[output]
export_dir = "exports"
conversation_log = "logs/chat.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.export_dir, PathBuf::from("exports"));
        assert_eq!(
            config.output.conversation_log,
            Some(PathBuf::from("logs/chat.jsonl"))
        );
        assert!(config.output.color);
        assert!(config.output.log_dir.is_none());
    }
}
