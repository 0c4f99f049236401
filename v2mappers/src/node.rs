//! The narrow view of a parse tree that rule builders work against.

use std::borrow::Cow;

use eu4txt::EU4TxtParseNode;

/// A configuration node as the rule builders see it.
///
/// The file root and every `key = { ... }` block expose their `key = value`
/// children through [`RuleNode::leaves`]. A `key = value` node exposes the
/// value through [`RuleNode::leaf`], or [`RuleNode::tokens`] for lists of
/// bare values.
pub trait RuleNode {
    /// Key of this node; empty for the file root and bare values.
    fn key(&self) -> Cow<'_, str>;

    /// Scalar value of `key = value`; empty when the value is a block.
    fn leaf(&self) -> Cow<'_, str>;

    /// The bare items of `key = { 1 2 3 }`, or a scalar value split on
    /// whitespace (`key = "1 2 3"`).
    fn tokens(&self) -> Vec<String>;

    /// `key = value` children, in source order.
    fn leaves(&self) -> Vec<&Self>;

    /// Children whose key is `key`, in source order.
    fn values(&self, key: &str) -> Vec<&Self> {
        self.leaves()
            .into_iter()
            .filter(|n| n.key() == key)
            .collect()
    }
}

impl RuleNode for EU4TxtParseNode {
    fn key(&self) -> Cow<'_, str> {
        EU4TxtParseNode::key(self).unwrap_or_default()
    }

    fn leaf(&self) -> Cow<'_, str> {
        self.value().and_then(|v| v.text()).unwrap_or_default()
    }

    fn tokens(&self) -> Vec<String> {
        match self.value() {
            Some(v) if v.is_list() => v.scalars().map(Cow::into_owned).collect(),
            Some(v) => v
                .text()
                .map(|t| t.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            None => self.scalars().map(Cow::into_owned).collect(),
        }
    }

    fn leaves(&self) -> Vec<&Self> {
        self.assignments().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rules;

    #[test]
    fn test_leaf_and_tokens() {
        let root = rules(
            r#"
            link = { v2 = swedish eu4 = swedish }
            literacy_ideas = { literacy = "1 2 3" }
            area = { 1 2 3 }
            "#,
        );
        let top = root.leaves();
        assert_eq!(top.len(), 3);
        assert_eq!(RuleNode::key(top[0]), "link");
        assert_eq!(top[0].values("v2")[0].leaf(), "swedish");

        let literacy = top[1].values("literacy")[0];
        assert_eq!(literacy.tokens(), vec!["1", "2", "3"]);
        assert_eq!(top[2].tokens(), vec!["1", "2", "3"]);
        assert_eq!(top[2].leaf(), "");
    }

    #[test]
    fn test_root_has_no_key() {
        let root = rules("a = b");
        assert_eq!(RuleNode::key(&root), "");
        assert_eq!(root.leaf(), "");
    }
}
