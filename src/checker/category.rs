use crate::host::DocumentKind;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// An opaque lexical label attached to a buffer position by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(Cow<'static, str>);

impl Category {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const COMMENT: Category = Category::from_static("comment");
pub const DOC: Category = Category::from_static("doc");
pub const STRING: Category = Category::from_static("string");
pub const KEYWORD: Category = Category::from_static("keyword");
pub const FUNCTION_NAME: Category = Category::from_static("function-name");
pub const VARIABLE_NAME: Category = Category::from_static("variable-name");
pub const TAG: Category = Category::from_static("tag");
pub const ATTRIBUTE: Category = Category::from_static("attribute");
pub const CODE: Category = Category::from_static("code");
pub const HTML: Category = Category::from_static("html");
pub const LINK: Category = Category::from_static("link");
pub const IMAGE: Category = Category::from_static("image");
pub const URL: Category = Category::from_static("url");
pub const FRONT_MATTER: Category = Category::from_static("front-matter");

/// Whatever the host reports for one position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Categories {
    #[default]
    Absent,
    One(Category),
    Many(Vec<Category>),
}

impl Categories {
    pub fn from_vec(mut categories: Vec<Category>) -> Self {
        categories.dedup();
        match categories.len() {
            0 => Self::Absent,
            1 => Self::One(categories.remove(0)),
            _ => Self::Many(categories),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        match self {
            Self::Absent => <&[Category]>::default().iter(),
            Self::One(category) => std::slice::from_ref(category).iter(),
            Self::Many(categories) => categories.iter(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.iter().any(|c| c == category)
    }
}

/// What to do with text the host left unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlainTextPolicy {
    Never,
    /// Only in prose documents (plain text, Markdown, HTML).
    #[default]
    Prose,
    /// Only in programming-language documents.
    Source,
    Always,
}

impl PlainTextPolicy {
    pub fn allows(self, kind: DocumentKind) -> bool {
        match self {
            Self::Never => false,
            Self::Prose => kind == DocumentKind::Prose,
            Self::Source => kind == DocumentKind::Source,
            Self::Always => true,
        }
    }
}

/// Decides whether a position is in scope from its categories alone.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    checkable: HashSet<Category>,
    extension: HashSet<Category>,
    plain_text: PlainTextPolicy,
}

impl CategoryFilter {
    pub fn new<I, J, S, T>(checkable: I, extension: J, plain_text: PlainTextPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            checkable: checkable.into_iter().map(|c| Category::new(c)).collect(),
            extension: extension.into_iter().map(|c| Category::new(c)).collect(),
            plain_text,
        }
    }

    pub fn is_checkable(&self, categories: &Categories, kind: DocumentKind) -> bool {
        if categories.is_absent() {
            return self.plain_text.allows(kind);
        }
        categories
            .iter()
            .any(|c| self.checkable.contains(c) || self.extension.contains(c))
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::new(
            default_checkable_categories(),
            Vec::<String>::new(),
            PlainTextPolicy::default(),
        )
    }
}

pub fn default_checkable_categories() -> Vec<String> {
    [COMMENT, DOC, STRING, FUNCTION_NAME, VARIABLE_NAME, LINK, IMAGE]
        .iter()
        .map(|c| c.as_str().to_string())
        .collect()
}
