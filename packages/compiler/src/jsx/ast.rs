//! Element AST
//!
//! The immutable markup tree handed to the lowering pass by the parser.

use serde::{Deserialize, Serialize};

use crate::output::output_ast::{Expression, Span};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: TagRef,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub children: Vec<ChildNode>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: TagRef::Identifier(tag.into()),
            attributes: Vec::new(),
            children: Vec::new(),
            span: None,
        }
    }

    /// `<>…</>`, lowered as an element whose tag is the runtime `Fragment`.
    pub fn fragment(children: Vec<ChildNode>) -> Self {
        Element {
            children,
            ..Element::new("Fragment")
        }
    }

    pub fn with_attr(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_child(mut self, child: ChildNode) -> Self {
        self.children.push(child);
        self
    }

    /// Plain `type` attribute value, used to pick the element `v-model` directive.
    pub fn type_attribute(&self) -> Option<Option<&AttributeValue>> {
        self.attributes.iter().find_map(|attribute| match attribute {
            Attribute::Plain { name, value } if name == "type" => Some(value.as_ref()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum TagRef {
    /// `<div>`, `<MyComponent>`
    Identifier(String),
    /// `<Foo.Bar.Baz>`
    Member { object: String, path: Vec<String> },
}

impl TagRef {
    pub fn name(&self) -> String {
        match self {
            TagRef::Identifier(name) => name.clone(),
            TagRef::Member { object, path } => {
                std::iter::once(object.as_str())
                    .chain(path.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(".")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Attribute {
    Plain {
        name: String,
        #[serde(default)]
        value: Option<AttributeValue>,
    },
    Directive {
        raw_name: String,
        #[serde(default)]
        value: Option<AttributeValue>,
    },
    Spread {
        argument: Expression,
    },
}

impl Attribute {
    /// Classify a raw attribute name as written in markup.
    pub fn from_jsx(name: impl Into<String>, value: Option<AttributeValue>) -> Self {
        let name = name.into();
        if is_directive(&name) {
            Attribute::Directive {
                raw_name: name,
                value,
            }
        } else {
            Attribute::Plain { name, value }
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute::from_jsx(name, Some(AttributeValue::Text(value.into())))
    }

    pub fn expr(name: impl Into<String>, value: Expression) -> Self {
        Attribute::from_jsx(name, Some(AttributeValue::Expression(value)))
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Attribute::from_jsx(name, None)
    }

    pub fn spread(argument: Expression) -> Self {
        Attribute::Spread { argument }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AttributeValue {
    /// `name="text"`
    Text(String),
    /// `name={expr}`
    Expression(Expression),
    /// `name=<Other />`
    Element(Box<Element>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ChildNode {
    /// Already whitespace-normalized text; empty text is dropped.
    Text(String),
    Expression(Expression),
    /// `{...items}`
    Spread(Expression),
    Element(Element),
}

/// `v-name…` or `vName…`.
pub fn is_directive(name: &str) -> bool {
    if name.starts_with("v-") {
        return true;
    }
    let mut chars = name.chars();
    chars.next() == Some('v') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// `onClick`, `on-click`, `onUpdate:x`; not `once` or `on`.
pub fn is_on(name: &str) -> bool {
    name.strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !c.is_ascii_lowercase())
}
