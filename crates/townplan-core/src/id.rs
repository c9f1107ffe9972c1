//! Categories, engine handles and port names.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Category under which component and link indices are allocated.
///
/// Generated component names follow `<prefix><category>_<index>`, so the
/// category string is part of the naming contract consumed by
/// visualization and statistics tooling. Categories compare by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(Cow<'static, str>);

impl Category {
    /// Houses inside neighborhoods.
    pub const HOUSE: Category = Category(Cow::Borrowed("house"));
    /// Grocery stores.
    pub const GROCERY_STORE: Category = Category(Cow::Borrowed("grocery store"));
    /// State capitol buildings.
    pub const CAPITOL_BUILDING: Category = Category(Cow::Borrowed("Capitol building"));
    /// Neighborhoods modelled as a single component.
    pub const NEIGHBORHOOD: Category = Category(Cow::Borrowed("neighborhood"));
    /// Gravel roads.
    pub const GRAVEL_ROAD: Category = Category(Cow::Borrowed("gravel road"));
    /// Paved roads.
    pub const PAVED_ROAD: Category = Category(Cow::Borrowed("paved road"));
    /// Engine links. Link names are `link<index>` with no prefix.
    pub const LINK: Category = Category(Cow::Borrowed("link"));

    /// Every category the built-in entities allocate from.
    pub const BUILTIN: [Category; 7] = [
        Category::HOUSE,
        Category::GROCERY_STORE,
        Category::CAPITOL_BUILDING,
        Category::NEIGHBORHOOD,
        Category::GRAVEL_ROAD,
        Category::PAVED_ROAD,
        Category::LINK,
    ];

    /// Create a category with an arbitrary name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The category name as used in generated component names.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Component name for `index` in this category under `prefix`.
    ///
    /// ```
    /// use townplan_core::Category;
    ///
    /// assert_eq!(Category::HOUSE.component_name("n0_", 3), "n0_house_3");
    /// assert_eq!(Category::LINK.component_name("ignored_", 7), "link7");
    /// ```
    pub fn component_name(&self, prefix: &str, index: u32) -> String {
        if *self == Category::LINK {
            format!("link{index}")
        } else {
            format!("{prefix}{}_{index}", self.0)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&'static str> for Category {
    fn from(v: &'static str) -> Self {
        Self(Cow::Borrowed(v))
    }
}

/// Opaque handle to a component registered with a simulation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentHandle(pub u32);

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

impl From<u32> for ComponentHandle {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Opaque handle to a link registered with a simulation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkHandle(pub u32);

impl fmt::Display for LinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

impl From<u32> for LinkHandle {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A named port on a component.
///
/// Buildings expose all four ports. Road edge-components only use
/// [`Port::A`] (towards the "from" building) and [`Port::B`] (towards
/// the "to" building).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Port {
    /// `port_a`
    #[serde(rename = "port_a")]
    A,
    /// `port_b`
    #[serde(rename = "port_b")]
    B,
    /// `port_c`
    #[serde(rename = "port_c")]
    C,
    /// `port_d`
    #[serde(rename = "port_d")]
    D,
}

impl Port {
    /// The engine-facing port name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "port_a",
            Self::B => "port_b",
            Self::C => "port_c",
            Self::D => "port_d",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
