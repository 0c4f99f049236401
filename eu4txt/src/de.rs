//! Serde support: deserialize typed structs straight from a parse tree.
//!
//! Lists whose first child is an assignment read as maps/structs, other lists
//! as sequences. A lone scalar also reads as a one-element sequence, so
//! `files = "a.txt"` and `files = { "a.txt" "b.txt" }` both fill a `Vec`.

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, forward_to_deserialize_any};

use crate::{EU4TxtAstItem, EU4TxtParseNode};
use std::fmt;

pub struct Deserializer<'de> {
    input: &'de EU4TxtParseNode,
}

impl<'de> Deserializer<'de> {
    pub fn from_node(input: &'de EU4TxtParseNode) -> Self {
        Deserializer { input }
    }

    fn integer(&self) -> Result<i64, Error> {
        match &self.input.entry {
            EU4TxtAstItem::IntValue(i) => Ok(i64::from(*i)),
            EU4TxtAstItem::Identifier(s) | EU4TxtAstItem::StringValue(s) => s
                .parse()
                .map_err(|_| Error(format!("expected an integer, got '{}'", s))),
            other => Err(Error(format!("expected an integer, got {:?}", other))),
        }
    }

    fn float(&self) -> Result<f64, Error> {
        match &self.input.entry {
            EU4TxtAstItem::FloatValue(f) => Ok(f64::from(*f)),
            EU4TxtAstItem::IntValue(i) => Ok(f64::from(*i)),
            EU4TxtAstItem::Identifier(s) | EU4TxtAstItem::StringValue(s) => s
                .parse()
                .map_err(|_| Error(format!("expected a number, got '{}'", s))),
            other => Err(Error(format!("expected a number, got {:?}", other))),
        }
    }
}

pub fn from_node<'a, T>(node: &'a EU4TxtParseNode) -> Result<T, Error>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::from_node(node);
    T::deserialize(&mut deserializer)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error(String);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Error {}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error(msg.to_string())
    }
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match &self.input.entry {
            EU4TxtAstItem::Identifier(s) | EU4TxtAstItem::StringValue(s) => visitor.visit_str(s),
            EU4TxtAstItem::IntValue(i) => visitor.visit_i32(*i),
            EU4TxtAstItem::FloatValue(f) => visitor.visit_f32(*f),
            EU4TxtAstItem::AssignmentList => {
                if self
                    .input
                    .children
                    .first()
                    .is_some_and(EU4TxtParseNode::is_assignment)
                {
                    return self.deserialize_map(visitor);
                }
                self.deserialize_seq(visitor)
            }
            EU4TxtAstItem::Assignment => Err(Error(
                "assignment can only be read through its enclosing map".to_string(),
            )),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match &self.input.entry {
            EU4TxtAstItem::Identifier(s) if s == "yes" => visitor.visit_bool(true),
            EU4TxtAstItem::Identifier(s) if s == "no" => visitor.visit_bool(false),
            other => Err(Error(format!("expected yes/no, got {:?}", other))),
        }
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let i = self.integer()?;
        visitor.visit_i32(i32::try_from(i).map_err(|e| Error(e.to_string()))?)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i64(self.integer()?)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let i = self.integer()?;
        visitor.visit_u32(u32::try_from(i).map_err(|e| Error(e.to_string()))?)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let i = self.integer()?;
        visitor.visit_u64(u64::try_from(i).map_err(|e| Error(e.to_string()))?)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f32(self.float()? as f32)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(self.float()?)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match &self.input.entry {
            EU4TxtAstItem::Identifier(s) | EU4TxtAstItem::StringValue(s) => visitor.visit_str(s),
            _ => match self.input.text() {
                Some(text) => visitor.visit_string(text.into_owned()),
                None => Err(Error("expected a string, got a list".to_string())),
            },
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let items = if self.input.is_list() {
            self.input.children.as_slice()
        } else {
            std::slice::from_ref(self.input)
        };
        visitor.visit_seq(Children::new(items))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if !self.input.is_list() {
            return Err(Error(format!(
                "expected a {{ key = value }} block, got {:?}",
                self.input.entry
            )));
        }
        visitor.visit_map(Children::new(&self.input.children))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // Absent keys never reach here; presence means Some.
        visitor.visit_some(self)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i8 i16 u8 u16 char bytes byte_buf unit unit_struct newtype_struct tuple
        tuple_struct enum identifier
    }
}

/// Walks the children of a list, as sequence elements or map entries.
struct Children<'de> {
    iter: std::slice::Iter<'de, EU4TxtParseNode>,
    value: Option<&'de EU4TxtParseNode>,
}

impl<'de> Children<'de> {
    fn new(items: &'de [EU4TxtParseNode]) -> Self {
        Children {
            iter: items.iter(),
            value: None,
        }
    }
}

impl<'de> SeqAccess<'de> for Children<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => {
                let mut de = Deserializer::from_node(node);
                seed.deserialize(&mut de).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl<'de> MapAccess<'de> for Children<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        let Some(node) = self.iter.next() else {
            return Ok(None);
        };
        if !node.is_assignment() {
            return Err(Error(format!(
                "expected key = value, got bare {:?}",
                node.entry
            )));
        }
        let (Some(key_node), Some(val_node)) = (node.children.first(), node.children.get(1)) else {
            return Err(Error("malformed assignment".to_string()));
        };
        self.value = Some(val_node);
        let mut de = Deserializer::from_node(key_node);
        seed.deserialize(&mut de).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let val_node = self.value.take().ok_or(Error(
            "MapAccess::next_value called before next_key".to_string(),
        ))?;
        let mut de = Deserializer::from_node(val_node);
        seed.deserialize(&mut de)
    }
}
