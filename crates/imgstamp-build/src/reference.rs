//! イメージ参照 (`user/name:tag`)
//!
//! 名前空間・イメージ名・タグの3要素から組み立てる。
//! 文字列表現は常に `/` と `:` をちょうど1つずつ含む。

use crate::error::{BuildError, Result};
use std::fmt;

/// `:latest` エイリアスに使うタグ
pub const LATEST_TAG: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    namespace: String,
    name: String,
    tag: String,
}

impl ImageReference {
    /// 各要素を検証して参照を作成
    pub fn new(namespace: &str, name: &str, tag: &str) -> Result<Self> {
        let reference = format!("{}/{}:{}", namespace, name, tag);

        validate_component(&reference, "namespace", namespace)?;
        validate_component(&reference, "image name", name)?;
        validate_tag(&reference, tag)?;

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }

    /// 同じイメージの `:latest` 参照
    pub fn latest(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            tag: LATEST_TAG.to_string(),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.namespace, self.name, self.tag)
    }
}

/// 名前空間・イメージ名のバリデーション
///
/// Docker リポジトリ名の制約:
/// - 英小文字、数字、ピリオド、ハイフン、アンダースコアのみ
/// - 先頭と末尾は英小文字または数字（`.` や `..` は不可）
fn validate_component(reference: &str, what: &str, value: &str) -> Result<()> {
    let invalid = |reason: String| BuildError::InvalidReference {
        reference: reference.to_string(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid(format!("{} is empty", what)));
    }

    if let Some(c) = value.chars().find(|c| !is_name_char(*c)) {
        return Err(invalid(format!("invalid character {:?} in {}", c, what)));
    }

    let is_lower_alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    if !value.starts_with(is_lower_alnum) || !value.ends_with(is_lower_alnum) {
        return Err(invalid(format!(
            "{} must start and end with a lowercase letter or digit",
            what
        )));
    }

    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-' || c == '_'
}

/// タグのバリデーション
///
/// Docker タグの制約:
/// - 128文字以下
/// - 英数字、ピリオド、ハイフン、アンダースコアのみ
/// - 先頭はピリオドまたはハイフンではない
fn validate_tag(reference: &str, tag: &str) -> Result<()> {
    let invalid = |reason: String| BuildError::InvalidReference {
        reference: reference.to_string(),
        reason,
    };

    if tag.is_empty() {
        return Err(invalid("tag is empty".to_string()));
    }

    if tag.len() > 128 {
        return Err(invalid(format!(
            "tag too long ({} characters, max 128)",
            tag.len()
        )));
    }

    if tag.starts_with('.') || tag.starts_with('-') {
        return Err(invalid("tag must not start with '.' or '-'".to_string()));
    }

    if let Some(c) = tag
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '.' && *c != '-' && *c != '_')
    {
        return Err(invalid(format!("invalid character {:?} in tag", c)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_components() {
        let reference = ImageReference::new("f00d4tehg0dz", "myimage", "v2").unwrap();
        assert_eq!(reference.to_string(), "f00d4tehg0dz/myimage:v2");
    }

    #[test]
    fn test_latest_ignores_original_tag() {
        let reference = ImageReference::new("user", "app", "19102026").unwrap();
        assert_eq!(reference.latest().to_string(), "user/app:latest");
    }

    #[test]
    fn test_components_reject_delimiters() {
        assert!(ImageReference::new("org/team", "app", "v1").is_err());
        assert!(ImageReference::new("user", "app:x", "v1").is_err());
        assert!(ImageReference::new("user", "my app", "v1").is_err());
        assert!(ImageReference::new("", "app", "v1").is_err());
        assert!(ImageReference::new("user", "", "v1").is_err());
    }

    #[test]
    fn test_components_reject_dot_segments() {
        assert!(ImageReference::new("user", ".", "v1").is_err());
        assert!(ImageReference::new("user", "..", "v1").is_err());
        assert!(ImageReference::new("..", "app", "v1").is_err());
        assert!(ImageReference::new("user", ".hidden", "v1").is_err());
        assert!(ImageReference::new("user", "-app", "v1").is_err());
        assert!(ImageReference::new("user", "app_", "v1").is_err());
    }

    #[test]
    fn test_components_follow_repository_name_rules() {
        assert!(ImageReference::new("user", "MyImage", "v1").is_err());
        assert!(ImageReference::new("User", "app", "v1").is_err());
        assert!(ImageReference::new("f00d4tehg0dz", "my-image.v2_x", "v1").is_ok());
    }

    #[test]
    fn test_tag_rules() {
        assert!(ImageReference::new("user", "app", "v1.0_rc-1").is_ok());
        assert!(ImageReference::new("user", "app", "V1").is_ok());
        assert!(ImageReference::new("user", "app", ".hidden").is_err());
        assert!(ImageReference::new("user", "app", "a+b").is_err());
        assert!(ImageReference::new("user", "app", &"x".repeat(129)).is_err());
        assert!(ImageReference::new("user", "app", &"x".repeat(128)).is_ok());
    }
}
