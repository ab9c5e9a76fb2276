//! 简单选择器：`tag`、`.class`、`#id`、`[attr]`、`[attr=value]` 及其组合

use super::Node;
use crate::error::{PuffError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        SelectorParser::new(input).parse()
    }

    pub fn matches(&self, node: &Node) -> bool {
        let Some(tag_name) = node.tag_name() else {
            return false;
        };

        if let Some(tag) = &self.tag {
            if !tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        let id = node.id();
        if self.ids.iter().any(|i| *i != id) {
            return false;
        }

        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }

        self.attributes.iter().all(|(name, expected)| match (node.get_attribute(name), expected) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == *expected,
            (None, _) => false,
        })
    }
}

struct SelectorParser {
    source: String,
    input: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        let source = input.trim().to_string();
        Self {
            input: source.chars().collect(),
            source,
            pos: 0,
        }
    }

    fn parse(&mut self) -> Result<Selector> {
        if self.input.is_empty() {
            return Err(self.error());
        }

        let mut selector = Selector::default();

        if self.current_char() == '*' {
            self.advance();
        } else if is_ident_char(self.current_char()) {
            selector.tag = Some(self.parse_ident()?);
        }

        while self.pos < self.input.len() {
            match self.current_char() {
                '.' => {
                    self.advance();
                    selector.classes.push(self.parse_ident()?);
                }
                '#' => {
                    self.advance();
                    selector.ids.push(self.parse_ident()?);
                }
                '[' => {
                    self.advance();
                    let attr = self.parse_attribute()?;
                    selector.attributes.push(attr);
                }
                // 组合符、分组、伪类均不支持
                _ => return Err(self.error()),
            }
        }

        Ok(selector)
    }

    fn parse_ident(&mut self) -> Result<String> {
        let mut name = String::new();
        while self.pos < self.input.len() && is_ident_char(self.current_char()) {
            name.push(self.current_char());
            self.advance();
        }
        if name.is_empty() {
            return Err(self.error());
        }
        Ok(name)
    }

    fn parse_attribute(&mut self) -> Result<(String, Option<String>)> {
        let name = self.parse_ident()?;

        if self.current_char() == ']' {
            self.advance();
            return Ok((name, None));
        }

        self.expect('=')?;

        let quote = self.current_char();
        let value = if quote == '"' || quote == '\'' {
            self.advance();
            let mut value = String::new();
            while self.pos < self.input.len() && self.current_char() != quote {
                value.push(self.current_char());
                self.advance();
            }
            self.expect(quote)?;
            value
        } else {
            self.parse_ident()?
        };

        self.expect(']')?;
        Ok((name, Some(value)))
    }

    fn current_char(&self) -> char {
        if self.pos < self.input.len() {
            self.input[self.pos]
        } else {
            '\0'
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.current_char() == c {
            self.advance();
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn error(&self) -> PuffError {
        PuffError::InvalidSelector(self.source.clone())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

impl Node {
    /// 先序查找第一个匹配的后代
    pub fn query_selector(&self, selector: &str) -> Result<Option<Node>> {
        let selector = Selector::parse(selector)?;
        Ok(self.descendants().into_iter().find(|n| selector.matches(n)))
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Node>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants()
            .into_iter()
            .filter(|n| selector.matches(n))
            .collect())
    }

    /// 自身是否匹配选择器
    pub fn matches(&self, selector: &str) -> Result<bool> {
        Ok(Selector::parse(selector)?.matches(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let selector = Selector::parse("div.a.b#main[data-id=\"1\"]").unwrap();
        assert_eq!(selector.tag.as_deref(), Some("div"));
        assert_eq!(selector.classes, vec!["a", "b"]);
        assert_eq!(selector.ids, vec!["main"]);
        assert_eq!(selector.attributes, vec![("data-id".to_string(), Some("1".to_string()))]);
    }

    #[test]
    fn test_reject_combinators() {
        assert!(Selector::parse("div .a").is_err());
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("a, b").is_err());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("[data-id").is_err());
    }
}
