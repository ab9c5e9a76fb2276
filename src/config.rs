//! 构建器配置

use serde::Deserialize;

use crate::error::{PuffError, Result};

/// 未指定 `tag` 时使用的元素类型
pub const DEFAULT_TAG: &str = "div";

/// `propertyName` 写入的保留属性
pub const PROPERTY_ATTRIBUTE: &str = "data-puff-property-name";

/// 属性名中下划线的改写方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnderscorePolicy {
    /// 只替换第一个下划线：`data_id` → `data-id`
    #[default]
    First,
    /// 替换全部下划线：`aria_owns_x` → `aria-owns-x`
    All,
}

impl UnderscorePolicy {
    pub fn attribute_name(self, key: &str) -> String {
        match self {
            Self::First => key.replacen('_', "-", 1),
            Self::All => key.replace('_', "-"),
        }
    }
}

/// 构建器配置，可从 JSON 加载
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    #[serde(default = "default_tag")]
    pub default_tag: String,
    #[serde(default = "default_property_attribute")]
    pub property_attribute: String,
    #[serde(default)]
    pub underscores: UnderscorePolicy,
}

fn default_tag() -> String { DEFAULT_TAG.to_string() }
fn default_property_attribute() -> String { PROPERTY_ATTRIBUTE.to_string() }

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_tag: default_tag(),
            property_attribute: default_property_attribute(),
            underscores: UnderscorePolicy::default(),
        }
    }
}

impl BuilderConfig {
    /// 从 JSON 文本加载并校验
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// 保留属性必须位于 `data-` 命名空间，避免与普通属性冲突
    pub fn validate(&self) -> Result<()> {
        if self.default_tag.trim().is_empty() {
            return Err(PuffError::Config("defaultTag must not be empty".to_string()));
        }

        let attr = &self.property_attribute;
        if !attr.starts_with("data-") || attr.len() <= "data-".len() {
            return Err(PuffError::Config(format!(
                "propertyAttribute `{}` must be a non-empty `data-` attribute",
                attr
            )));
        }
        if attr.chars().any(|c| c.is_whitespace() || c == '=' || c == '"') {
            return Err(PuffError::Config(format!(
                "propertyAttribute `{}` is not a valid attribute name",
                attr
            )));
        }

        Ok(())
    }
}
